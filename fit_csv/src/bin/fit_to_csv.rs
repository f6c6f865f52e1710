use std::path::PathBuf;

use fit_csv::{BatchOptions, batch};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, clap::Parser)]
pub struct Args {
    /// Directory with .fit files, or a single .fit file
    #[arg(default_value_os_t = std::env::current_dir().unwrap_or_default().join("input"), required = false)]
    pub input: PathBuf,
    /// Directory for .csv files, or the .csv file when `input` is a file. _Note_: will truncate old files
    #[arg(default_value_os_t = std::env::current_dir().unwrap_or_default().join("output"), required = false)]
    pub output: PathBuf,
    /// Convert several files at once
    #[arg(short, long, default_value_t = false, required = false)]
    pub parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let Args {
        input,
        output,
        parallel,
    } = <Args as clap::Parser>::parse();

    if input.is_file() {
        let output = match output.is_dir() {
            true => batch::output_path(&input, &output)
                .ok_or_else(|| format!("Can't derive output name for {}", input.display()))?,
            false => output,
        };

        let rows = fit_csv::convert_file(&input, &output)?;

        println!("Saved {rows} rows to {}", output.to_string_lossy());

        return Ok(());
    }

    let report = fit_csv::convert_dir(&input, &output, &BatchOptions { parallel })?;

    println!(
        "Done! Converted: {} | failed: {}",
        report.converted.len(),
        report.failed.len()
    );

    if !report.is_success() {
        return Err(format!("{} file(s) failed to convert", report.failed.len()).into());
    }

    Ok(())
}
