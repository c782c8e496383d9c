use chessdata::{
    archive::{
        chunk::{self, ChunkRequest},
        index::{read_chunk_indexed, GameIndex},
        PgnArchive,
    },
    dataset::Dataset,
    materialize::Notation,
};
use clap::Args;
use std::error::Error;
use tracing::info;

/// Which chunk of which archive to read
#[derive(Args, Clone)]
pub struct ChunkArgs {
    /// Path of a .pgn or .pgn.zst archive
    #[arg(long, value_name = "input")]
    pub input: String,

    /// Number of games per chunk
    #[arg(long, value_name = "chunk-size")]
    pub chunk_size: usize,

    /// 1-based chunk number
    #[arg(long, value_name = "chunk-number", default_value = "1")]
    pub chunk_number: usize,
}

#[derive(Args)]
pub struct ReadChunkCommand {
    #[clap(flatten)]
    chunk: ChunkArgs,

    /// Game index built with `build-index`, to seek instead of scanning
    #[arg(long, value_name = "index")]
    index: Option<String>,
}

pub fn read_chunk(cmd: ReadChunkCommand) -> Result<(), Box<dyn Error>> {
    let request = ChunkRequest::new(cmd.chunk.chunk_size, cmd.chunk.chunk_number)?;

    let chunk = match &cmd.index {
        Some(index) => {
            let index = GameIndex::load(index)?;
            read_chunk_indexed(&cmd.chunk.input, &index, request)?
        }
        None => chunk::read_chunk(&mut PgnArchive::open(&cmd.chunk.input)?, request),
    };

    let first = request.skip_count();
    for (i, game) in chunk.games.iter().enumerate() {
        println!("{}: {}", first + i, game.tokens.join(" "));
    }

    let dataset = Dataset::from_raw_games(&chunk.games, Notation::San);

    info!(
        input = %cmd.chunk.input,
        chunk_number = request.chunk_number(),
        games = chunk.games.len(),
        failed = chunk.diagnostics.len(),
        pairs = dataset.len(),
        "chunk read"
    );

    Ok(())
}
