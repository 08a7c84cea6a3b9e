use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use republican_coins::logging::init_logging;
use republican_coins::{clean_file, convert, minify_file, PipelineConfig, PipelineError};

#[derive(Parser)]
#[command(name = "republican-coins")]
#[command(about = "Build the Roman Republican coin finds GeoJSON dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the geocoded finds CSV to GeoJSON (default)
    Convert {
        /// TOML file with paths, base URLs and dataset metadata
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Remove null and empty values from every feature
    Clean {
        #[arg(long, default_value = "../data/all_coins.geojson")]
        input: PathBuf,
        #[arg(long, default_value = "../data/cleaned.json")]
        output: PathBuf,
    },
    /// Rewrite a JSON file without whitespace
    Minify {
        #[arg(long, default_value = "../data/cleaned.json")]
        input: PathBuf,
        #[arg(long, default_value = "../data/all_coins.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Convert {
        config: None,
        input: None,
        output: None,
    });

    let outcome = match command {
        Commands::Convert { config, input, output } => run_convert(config, input, output),
        Commands::Clean { input, output } => clean_file(&input, &output).map(|count| {
            println!("✓ Cleaned {} features: '{}' → '{}'", count, input.display(), output.display());
        }),
        Commands::Minify { input, output } => minify_file(&input, &output).map(|bytes| {
            println!("✓ Minified '{}' → '{}' ({} bytes)", input.display(), output.display(), bytes);
        }),
    };

    if let Err(err) = outcome {
        match err {
            PipelineError::SourceNotFound { .. } => eprintln!("❌ Error: {}", err),
            other => eprintln!("❌ An unexpected error occurred: {}", other),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_convert(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), PipelineError> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(&path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = input {
        config = config.with_input(input);
    }
    if let Some(output) = output {
        config = config.with_output(output);
    }

    println!("🗺️  Finds CSV → GeoJSON");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n📂 Reading {}", config.input.display());

    let report = convert(&config)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Rows read:      {}", report.rows_read);
    println!("✓ Rows skipped:   {}", report.skipped.len());
    println!("✓ SHA-256:        {}", report.digest);
    println!("✓ Elapsed:        {} ms", report.elapsed_ms());
    println!(
        "\n🎉 Successfully converted {} valid records to {}",
        report.features_written,
        report.output.display()
    );

    Ok(())
}
