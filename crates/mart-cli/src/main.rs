use anyhow::Result;
use clap::{Parser, Subcommand};
use mart_core::{Catalog, KioskConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mart")]
#[command(about = "Astrid Mart kiosk console", version)]
struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "kiosk.json")]
    config: PathBuf,

    /// Path to the product database (overrides the config)
    #[arg(short, long)]
    products: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive scan console (the default)
    Scan {
        /// Start in learning mode instead of retail
        #[arg(long)]
        learning: bool,
    },
    /// Export the product database to CSV
    ExportCsv {
        #[arg(short, long, default_value = "products.csv")]
        output: PathBuf,
    },
    /// Replace the product database from a CSV file
    ImportCsv {
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mart=info".parse()?)
                .add_directive("mart_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load config
    let mut config = match KioskConfig::load(&args.config) {
        Ok(c) => {
            info!("Loaded config from {:?}", args.config);
            c
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            KioskConfig::default()
        }
    };
    if let Some(products) = args.products {
        config.products_path = products;
    }

    // Load the product database; a corrupt file degrades to an empty
    // catalog so the manager tools can still run
    let catalog = match Catalog::load_or_default(&config.products_path) {
        Ok(c) => {
            info!("Loaded {} products from {:?}", c.len(), config.products_path);
            c
        }
        Err(e) => {
            warn!("Failed to load product database: {}, starting empty", e);
            Catalog::new()
        }
    };

    match args.command.unwrap_or(Command::Scan { learning: false }) {
        Command::Scan { learning } => commands::scan::run(catalog, config, learning),
        Command::ExportCsv { output } => commands::catalog::export(&catalog, &output),
        Command::ImportCsv { input } => commands::catalog::import(catalog, &config, &input),
    }
}
