//! # rasterprint CLI
//!
//! Command-line interface for raster printing on thermal receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print an image with the saved settings
//! rasterprint print receipt.png
//!
//! # Print to a different queue over lp
//! rasterprint --transport lp --url M200 print receipt.png
//!
//! # Write the encoded job to a file instead of printing
//! rasterprint encode receipt.png -o receipt.bin
//!
//! # See exactly which dots will print
//! rasterprint preview receipt.png -o preview.png
//!
//! # Run the HTTP print server
//! rasterprint serve --listen 0.0.0.0:8090
//!
//! # Persist settings
//! rasterprint config set --width 384 --url /dev/usb/lp0 --transport device
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rasterprint::{
    PrintError, Settings, TransportKind, job,
    printer::config::DEFAULT_SETTINGS_FILE,
    render::preview,
    server::{self, AppState, ServerConfig},
    source::PixelSource,
    transport,
};

/// rasterprint - Thermal receipt printer raster encoder
#[derive(Parser, Debug)]
#[command(name = "rasterprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Print width in dots (multiple of 8)
    #[arg(long, global = true)]
    width: Option<u16>,

    /// Printer URL, device path, or queue name
    #[arg(long, global = true)]
    url: Option<String>,

    /// Delivery method
    #[arg(long, global = true, value_enum)]
    transport: Option<TransportKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image
    Print {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,
    },

    /// Encode an image and write the printer commands to a file
    Encode {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,

        /// Output file for the raw command bytes
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Save a PNG of the thresholded image
    Preview {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Run the HTTP print server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8090")]
        listen: String,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective settings as JSON
    Show,
    /// Save --width, --url, and --transport to the settings file
    Set,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rasterprint=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli)?;

    match cli.command {
        Commands::Print { image } => {
            let source = PixelSource::open(&image, settings.print_width as u32)?;
            let transport = transport::for_kind(settings.transport)?;

            println!(
                "Printing {} ({}x{}) via {} to {}...",
                image.display(),
                source.width,
                source.height(),
                settings.transport,
                settings.print_url
            );
            let bytes = job::print(
                transport.as_ref(),
                &settings.print_url,
                &source.pixels,
                source.width,
            )
            .await?;
            println!("Printed successfully! ({} bytes)", bytes);
        }

        Commands::Encode { image, output } => {
            let source = PixelSource::open(&image, settings.print_width as u32)?;
            let command = job::encode(&source.pixels, source.width)?;
            std::fs::write(&output, command.as_bytes())?;
            println!("Wrote {} bytes to {}", command.len(), output.display());
        }

        Commands::Preview { image, output } => {
            let source = PixelSource::open(&image, settings.print_width as u32)?;
            let (bitmap, _) = job::encode_with_bitmap(&source.pixels, source.width)?;
            preview::save_png(&output, &bitmap)?;
            println!(
                "Saved {}x{} preview to {}",
                bitmap.width,
                bitmap.height,
                output.display()
            );
        }

        Commands::Serve { listen } => {
            let transport = transport::for_kind(settings.transport)?;
            let config = ServerConfig {
                listen_addr: listen,
                settings_path: Some(cli.config.clone()),
            };
            server::serve(AppState::new(config, settings, Arc::from(transport))).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&settings)
                    .map_err(|e| PrintError::Config(e.to_string()))?;
                println!("{}", json);
            }
            ConfigAction::Set => {
                settings.save(&cli.config)?;
                println!("Saved settings to {}", cli.config.display());
            }
        },
    }

    Ok(())
}

/// Settings file values with command-line overrides applied.
fn effective_settings(cli: &Cli) -> Result<Settings, PrintError> {
    let mut settings = Settings::load(&cli.config)?;
    if let Some(width) = cli.width {
        settings.print_width = width;
    }
    if let Some(url) = &cli.url {
        settings.print_url = url.clone();
    }
    if let Some(kind) = cli.transport {
        settings.transport = kind;
    }
    settings.validate()?;
    Ok(settings)
}
