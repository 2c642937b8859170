use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use student_prep::config::PipelineConfig;
use student_prep::pipeline::run_pipeline;
use student_prep::table::load_table;

#[derive(Parser)]
#[command(
    name = "student-prep",
    about = "Clean, encode and scale a student-records extract"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the processed table
    Run {
        /// Raw extract (.csv, .tsv or .txt)
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file for the processed table
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a JSON pipeline configuration (defaults are built in)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load the extract and validate its schema without processing it
    Check {
        /// Raw extract (.csv, .tsv or .txt)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the default configuration as JSON
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            input,
            output,
            config,
        } => handle_run(&input, &output, config.as_deref()),
        Commands::Check { input } => handle_check(&input),
        Commands::Config { output } => handle_config(output.as_deref()),
    }
}

fn handle_run(input: &Path, output: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!(
        "Processing {0} into {1}...",
        input.display(),
        output.display()
    );
    let report = run_pipeline(&config, input, output).context("Pipeline failed")?;

    for unmapped in &report.unmapped {
        println!(
            "  warning: {} value '{}' ({}x) kept unmapped",
            unmapped.column, unmapped.value, unmapped.occurrences
        );
    }
    for column in &report.degenerate_scaled {
        println!("  warning: {column} has zero variance, scaled to 0");
    }
    println!("{}", report.summary());
    Ok(())
}

fn handle_check(input: &Path) -> Result<()> {
    let df = load_table(input)
        .with_context(|| format!("Schema check failed for {}", input.display()))?;
    let missing: usize = df.get_columns().iter().map(|c| c.null_count()).sum();
    println!(
        "{}: schema OK, {} rows, {missing} missing value(s)",
        input.display(),
        df.height()
    );
    Ok(())
}

fn handle_config(output: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::default();
    if let Some(path) = output {
        config
            .to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Default configuration written to {}", path.display());
    } else {
        println!("{}", config.to_json()?);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            println!("Loading config from {}...", path.display());
            PipelineConfig::from_file(path)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}
