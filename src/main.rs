use acwing_csv::acwing::{write_csv, AcwingExtractorBuilder, Course};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "acwing-csv",
    about = "Export a saved Acwing question-bank page to CSV"
)]
struct Cli {
    /// Saved question-bank page to read
    #[arg(short, long, default_value = "AcwingAdvanced.html")]
    input: PathBuf,
    /// Destination CSV file
    #[arg(short, long, default_value = "Problems_Advanced.csv")]
    output: PathBuf,
    /// Course label stamped into every row
    #[arg(short, long, default_value = "Advanced")]
    course: Course,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let extractor = AcwingExtractorBuilder::default()
        .input(cli.input)
        .course(cli.course)
        .build()?;

    println!("Reading HTML file...");
    let records = extractor.extract()?;

    println!("Writing CSV file: {} ...", cli.output.display());
    write_csv(&records, &cli.output)?;

    println!("Done! Extracted {} problems.", records.len());
    Ok(())
}
