use chessdata::{
    archive::{
        chunk::ChunkRequest,
        index::{read_chunk_indexed, GameIndex},
    },
    chunk_file::ChunkFileWriter,
    materialize::{to_uci_tokens, Notation},
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::{error::Error, fs, path::Path};
use tracing::{debug, info};

#[derive(Args)]
pub struct PreprocessCommand {
    /// Uncompressed .pgn archive
    #[arg(long, value_name = "input")]
    input: String,

    /// Game index of the archive
    #[arg(long, value_name = "index")]
    index: String,

    /// Directory to write the chunk files to
    #[arg(long, value_name = "output-dir")]
    output_dir: String,

    /// Number of games per chunk file
    #[arg(long, value_name = "chunk-size", default_value = "10000")]
    chunk_size: usize,

    /// Whether to compress the chunk files with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,
}

/// Counts of one chunk file
#[derive(Default)]
struct ChunkSummary {
    games: usize,
    truncated: usize,
    failed: usize,
}

pub fn preprocess(cmd: PreprocessCommand) -> Result<(), Box<dyn Error>> {
    // validates the chunk size
    ChunkRequest::new(cmd.chunk_size, 1)?;

    let index = GameIndex::load(&cmd.index)?;
    let num_chunks = index.len().div_ceil(cmd.chunk_size);

    fs::create_dir_all(&cmd.output_dir)?;

    info!(
        input = %cmd.input,
        output_dir = %cmd.output_dir,
        games = index.len(),
        chunks = num_chunks,
        compress = cmd.compress,
        "preprocessing"
    );

    let bar = ProgressBar::new(num_chunks as u64).with_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [Elapsed {elapsed_precise}] [Chunks {human_pos}/{human_len} @ {per_sec}] {wide_bar}",
            )
            .unwrap(),
    );

    let summaries = (1..=num_chunks)
        .into_par_iter()
        .map(|chunk_number| {
            let summary = write_chunk(&cmd, &index, chunk_number);
            bar.inc(1);
            summary
        })
        .collect::<Result<Vec<ChunkSummary>, Box<dyn Error + Send + Sync>>>()
        .map_err(|e| e as Box<dyn Error>)?;

    bar.finish();

    let total = summaries
        .iter()
        .fold(ChunkSummary::default(), |acc, s| ChunkSummary {
            games: acc.games + s.games,
            truncated: acc.truncated + s.truncated,
            failed: acc.failed + s.failed,
        });

    info!(
        chunks = summaries.len(),
        games = total.games,
        truncated = total.truncated,
        failed = total.failed,
        "done"
    );

    Ok(())
}

/// Reads one chunk through the index and writes it as `<chunk_number>.txt[.zst]`
fn write_chunk(
    cmd: &PreprocessCommand,
    index: &GameIndex,
    chunk_number: usize,
) -> Result<ChunkSummary, Box<dyn Error + Send + Sync>> {
    let request = ChunkRequest::new(cmd.chunk_size, chunk_number)?;
    let chunk = read_chunk_indexed(&cmd.input, index, request)?;

    let extension = if cmd.compress { "txt.zst" } else { "txt" };
    let path = Path::new(&cmd.output_dir).join(format!("{}.{}", chunk_number, extension));

    let mut writer = ChunkFileWriter::create(&path, cmd.compress)?;
    let mut summary = ChunkSummary {
        failed: chunk.diagnostics.len(),
        ..Default::default()
    };

    for game in &chunk.games {
        // a halted game keeps the moves before the bad token
        let (uci, halted) = to_uci_tokens(&game.tokens, Notation::San);
        if let Some(halt) = halted {
            debug!(chunk_number, ply = halt.ply, error = %halt.error, "game truncated");
            summary.truncated += 1;
        }

        writer.write_game(&uci)?;
    }
    summary.games = writer.games_written();
    writer.finish()?;

    Ok(summary)
}
