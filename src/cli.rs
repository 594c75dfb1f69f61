// webpbatch/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webpbatch", version, about = "Convert images to WebP and report space savings")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every image under a folder in place, moving originals to Temp<folder>
    Scan {
        /// Folder to scan
        #[arg(default_value = "assets")]
        root: PathBuf,

        /// WebP quality (1-100)
        #[arg(short, long, default_value_t = 75, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Worker threads (1 = sequential)
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,
    },
    /// Convert a batch of files into an output folder, like an upload request
    Convert {
        /// Image files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Folder receiving the WebP files
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Folder receiving moved originals
        #[arg(long, default_value = "temp")]
        holding: PathBuf,

        /// WebP quality; invalid values fall back to 75
        #[arg(short, long)]
        quality: Option<String>,

        /// Move originals into the holding folder after conversion
        #[arg(short, long)]
        move_originals: bool,

        /// Skip files whose WebP output already exists
        #[arg(short, long)]
        skip_existing: bool,

        /// Worker threads (1 = sequential)
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,

        /// Print the JSON batch response instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Copy a previously converted file out of the output folder
    Fetch {
        /// WebP file name, e.g. photo.webp
        name: String,

        /// Folder holding the WebP files
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Where to write the file (defaults to the name in the current folder)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
}
