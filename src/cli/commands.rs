//! Command implementations for the sofia2hdf5 CLI
//!
//! Loads the layered configuration, sets up logging, runs the conversion and
//! reports the result on the terminal.

use crate::cli::args::Args;
use crate::config::ConverterConfig;
use crate::constants::EXAMPLE_CONFIG_NAME;
use crate::container::DocumentStore;
use crate::models::ConversionSummary;
use crate::processor::Converter;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tracing::{debug, info};

/// Main command runner
///
/// 1. Write the example configuration if asked to, and stop
/// 2. Merge defaults, the YAML file and command-line flags
/// 3. Convert (or plan, for a dry run) and print a summary
pub fn run(args: Args) -> Result<()> {
    if args.print_example {
        return print_example();
    }

    args.validate()?;
    let config = load_configuration(&args)?;
    setup_logging(&args, config.general.verbose)?;

    info!("Starting sofia2hdf5");
    debug!("Command line arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    let converter = Converter::new(config);

    if args.dry_run {
        let summary = converter.plan().context("Failed to lay out the container")?;
        report(&summary);
        return Ok(());
    }

    let store = document_store()?;
    let summary = converter
        .convert(store.as_ref())
        .context("Conversion failed")?;
    report(&summary);
    Ok(())
}

/// Load configuration using a layered approach (defaults -> file -> args)
fn load_configuration(args: &Args) -> Result<ConverterConfig> {
    let mut config = match &args.config_file {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConverterConfig::default(),
    };

    if let Some(input) = args.sofia_input() {
        config.sofia_input = Some(input.to_path_buf());
    }
    if let Some(catalog) = &args.catalog {
        config.sofia_catalog = Some(catalog.clone());
    }
    if let Some(directory) = &args.directory {
        config.general.directory = directory.clone();
    }
    if args.verbose > 0 {
        config.general.verbose = true;
    }

    if config.sofia_input.is_none() {
        anyhow::bail!(
            "No SoFiA parameter file given. Pass it as an argument, with --input, or set \
             sofia_input in a configuration file (see --print-example)."
        );
    }

    Ok(config)
}

fn setup_logging(args: &Args, config_verbose: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level(config_verbose);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sofia2hdf5={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

#[cfg(feature = "hdf5")]
fn document_store() -> Result<Box<dyn DocumentStore>> {
    Ok(Box::new(crate::container::Hdf5Store))
}

#[cfg(not(feature = "hdf5"))]
fn document_store() -> Result<Box<dyn DocumentStore>> {
    anyhow::bail!(
        "sofia2hdf5 was built without HDF5 support; rebuild with `--features hdf5` \
         or use --dry-run to inspect the layout"
    )
}

fn print_example() -> Result<()> {
    let path = Path::new(EXAMPLE_CONFIG_NAME);
    ConverterConfig::write_example(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {}",
        "Example configuration written to".bright_green(),
        path.display().to_string().bright_cyan()
    );
    println!("Edit it and run: sofia2hdf5 --config {}", path.display());
    Ok(())
}

fn report(summary: &ConversionSummary) {
    let heading = if summary.written {
        "Wrote".bright_green().bold()
    } else {
        "Would write".bright_yellow().bold()
    };
    println!(
        "{} {}",
        heading,
        summary.output_path.display().to_string().bright_cyan()
    );

    for section in &summary.sections {
        println!(
            "  {} {} {}",
            section.name.bright_white().bold(),
            section.datasets.join(", "),
            format!("({} attributes)", section.attributes).bright_black()
        );
    }

    if summary.sources_written > 0 {
        let velocity = summary
            .velocity
            .map(|variant| variant.column())
            .unwrap_or("none");
        println!(
            "  {} sources, velocity column {}",
            summary.sources_written.to_string().bright_yellow(),
            velocity.bright_cyan()
        );
    }
}
