use chessdata::archive::index::GameIndex;
use clap::Args;
use std::error::Error;
use tracing::info;

#[derive(Args)]
pub struct BuildIndexCommand {
    /// Uncompressed .pgn archive to index
    #[arg(long, value_name = "input")]
    input: String,

    /// Output file, one byte offset per line
    #[arg(long, value_name = "output")]
    output: String,
}

pub fn build_index(cmd: BuildIndexCommand) -> Result<(), Box<dyn Error>> {
    let index = GameIndex::build_from_path(&cmd.input)?;
    index.save(&cmd.output)?;

    info!(input = %cmd.input, output = %cmd.output, games = index.len(), "index written");

    Ok(())
}
