mod build_index;
mod dataset_info;
mod encode;
mod extract;
mod preprocess;
mod read_chunk;

use build_index::{build_index, BuildIndexCommand};
use clap::{Parser, Subcommand};
use dataset_info::{dataset_info, DatasetInfoCommand};
use encode::{encode, EncodeCommand};
use extract::{extract, ExtractCommand};
use preprocess::{preprocess, PreprocessCommand};
use read_chunk::{read_chunk, ReadChunkCommand};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the games of one chunk of a PGN archive
    ReadChunk(ReadChunkCommand),
    /// Writes the byte offset of every game of a PGN archive
    BuildIndex(BuildIndexCommand),
    /// Splits a PGN archive into chunk files of UCI moves, in parallel
    Preprocess(PreprocessCommand),
    /// Copies the raw PGN text of a range of games
    Extract(ExtractCommand),
    /// Builds the dataset of a chunk file and prints a summary
    DatasetInfo(DatasetInfoCommand),
    /// Prints the tensor planes of a position
    Encode(EncodeCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::ReadChunk(cmd) => read_chunk(cmd),
        Commands::BuildIndex(cmd) => build_index(cmd),
        Commands::Preprocess(cmd) => preprocess(cmd),
        Commands::Extract(cmd) => extract(cmd),
        Commands::DatasetInfo(cmd) => dataset_info(cmd),
        Commands::Encode(cmd) => encode(cmd),
    }
}
