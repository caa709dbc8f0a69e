use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use property_alerts::{
    InputMode, Locale, ParserConfig, PricePolicy, SheetOptions, extract_directory, write_listings,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Parses property alert emails into an XLSX file.
#[derive(Debug, Parser)]
#[command(name = "property-alerts", version)]
struct Cli {
    /// Directory containing .eml files
    directory: PathBuf,

    /// XLSX file to write the results into (.json writes JSON instead)
    output: PathBuf,

    /// Locale used to read prices
    #[arg(
        long,
        env = "PROPERTY_ALERTS_LOCALE",
        default_value = "en_GB",
        value_parser = parse_option::<Locale>
    )]
    locale: Locale,

    /// What to do with a price that does not parse: fail or skip-property
    #[arg(long = "on-bad-price", default_value = "fail", value_parser = parse_option::<PricePolicy>)]
    price_policy: PricePolicy,

    /// Decode emails as MIME messages instead of scanning the raw text
    #[arg(long)]
    mime: bool,

    /// Prepend a row index column to the spreadsheet
    #[arg(long)]
    index: bool,
}

fn parse_option<T>(value: &str) -> std::result::Result<T, String>
where
    T: FromStr<Err = property_alerts::Error>,
{
    value.parse().map_err(|e: property_alerts::Error| e.to_string())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = ParserConfig::default()
        .with_locale(cli.locale)
        .with_price_policy(cli.price_policy)
        .with_input(if cli.mime {
            InputMode::Mime
        } else {
            InputMode::Raw
        });

    let listings = extract_directory(&cli.directory, &config)
        .with_context(|| format!("Failed to parse emails in {}", cli.directory.display()))?;

    let options = SheetOptions {
        index_column: cli.index,
    };
    write_listings(&cli.output, &listings, &options)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
