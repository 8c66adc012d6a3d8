use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the translation HTTP API
    Serve {
        /// Bind address override
        #[arg(short, long)]
        bind: Option<String>,

        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Translate text once from the command line
    Translate {
        /// Text to translate
        text: String,

        /// Source language code
        #[arg(short, long)]
        source: String,

        /// Target language code
        #[arg(short, long)]
        target: String,
    },

    /// List supported languages
    Languages,

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}
