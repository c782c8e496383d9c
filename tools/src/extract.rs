use chessdata::archive::index::{extract_games, GameIndex};
use clap::Args;
use std::{error::Error, fs};
use tracing::info;

#[derive(Args)]
pub struct ExtractCommand {
    /// Uncompressed .pgn archive
    #[arg(long, value_name = "input")]
    input: String,

    /// Game index of the archive
    #[arg(long, value_name = "index")]
    index: String,

    /// First game to copy (0-based)
    #[arg(long, value_name = "start")]
    start: usize,

    /// Game to stop before
    #[arg(long, value_name = "end")]
    end: usize,

    /// Output .pgn file
    #[arg(long, value_name = "output")]
    output: String,
}

pub fn extract(cmd: ExtractCommand) -> Result<(), Box<dyn Error>> {
    let index = GameIndex::load(&cmd.index)?;
    let content = extract_games(&cmd.input, &index, cmd.start, cmd.end)?;
    fs::write(&cmd.output, &content)?;

    info!(
        games = cmd.end - cmd.start,
        bytes = content.len(),
        output = %cmd.output,
        "games extracted"
    );

    Ok(())
}
