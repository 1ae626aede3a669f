use clap::{Parser, Subcommand};
use mintari::config::StylizeBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mintari")]
#[command(author, version, about = "Stylize images and publish them for minting")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Stylize a single image and print the output path
    Stylize {
        /// Image to stylize
        #[arg(required = true)]
        input: PathBuf,

        /// Stylization backend (overrides config)
        #[arg(long, value_enum)]
        backend: Option<StylizeBackend>,
    },

    /// Upload a file to the storage gateway and print its locator
    Publish {
        /// File to upload
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
