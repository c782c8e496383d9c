//! Fixed-size windows of games.
//!
//! Chunk `k` of size `n` holds the games with ordinals `[(k - 1) * n, k * n)`.
//! Reading a chunk opens a fresh session on the archive and scans it from the
//! start, so the cost grows with `k`. [`super::index::read_chunk_indexed`]
//! avoids the scan when a [`super::index::GameIndex`] is available.

use super::{index::IndexError, ArchiveError, GameSource, PgnArchive, RawGame};
use std::{fmt, ops::Range, path::Path};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
    #[error("chunk number must be at least 1 (chunks are 1-indexed)")]
    InvalidChunkNumber,
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// A validated `(chunk_size, chunk_number)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRequest {
    chunk_size: usize,
    chunk_number: usize,
}

impl ChunkRequest {
    pub fn new(chunk_size: usize, chunk_number: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize);
        }
        if chunk_number == 0 {
            return Err(ChunkError::InvalidChunkNumber);
        }

        Ok(ChunkRequest {
            chunk_size,
            chunk_number,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_number(&self) -> usize {
        self.chunk_number
    }

    /// Number of games before the chunk
    pub fn skip_count(&self) -> usize {
        (self.chunk_number - 1).saturating_mul(self.chunk_size)
    }

    /// Game ordinals covered by the chunk
    pub fn range(&self) -> Range<usize> {
        let start = self.skip_count();
        start..start.saturating_add(self.chunk_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Discarding the games before the chunk
    Skip,
    /// Collecting the games of the chunk
    Read,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Skip => write!(f, "skip"),
            ScanPhase::Read => write!(f, "read"),
        }
    }
}

/// A game that could not be read. The scan moves on to the next game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    /// Ordinal of the game slot in the archive
    pub ordinal: usize,
    pub phase: ScanPhase,
    pub message: String,
}

/// Games of a chunk, plus whatever went wrong while reading them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub games: Vec<RawGame>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl Chunk {
    fn report(&mut self, ordinal: usize, phase: ScanPhase, error: &ArchiveError) {
        warn!(ordinal, %phase, %error, "failed to read game");

        self.diagnostics.push(ScanDiagnostic {
            ordinal,
            phase,
            message: error.to_string(),
        });
    }
}

/// Reads the games of a chunk from a source positioned at the first game of
/// the archive.
///
/// A chunk past the end of the archive is empty, and the last chunk may be
/// short. A game that fails to read still takes up its slot.
pub fn read_chunk<S: GameSource>(source: &mut S, request: ChunkRequest) -> Chunk {
    let mut chunk = Chunk::default();

    for ordinal in 0..request.skip_count() {
        match source.next_game() {
            Ok(Some(_)) => {}
            // the chunk is entirely past the end
            Ok(None) => return chunk,
            Err(error) => chunk.report(ordinal, ScanPhase::Skip, &error),
        }
    }

    collect_games(source, request.range(), &mut chunk);
    chunk
}

/// Reads the games in `ordinals` from a source positioned at `ordinals.start`
pub(crate) fn collect_games<S: GameSource>(
    source: &mut S,
    ordinals: Range<usize>,
    chunk: &mut Chunk,
) {
    for ordinal in ordinals {
        match source.next_game() {
            Ok(Some(game)) => chunk.games.push(game),
            Ok(None) => break,
            Err(error) => chunk.report(ordinal, ScanPhase::Read, &error),
        }
    }
}

/// Opens the archive at `path` and reads a chunk from it.
///
/// Arguments are checked before the file is touched.
pub fn read_chunk_from_path<P: AsRef<Path>>(
    path: P,
    chunk_size: usize,
    chunk_number: usize,
) -> Result<Chunk, ChunkError> {
    let request = ChunkRequest::new(chunk_size, chunk_number)?;
    let mut archive = PgnArchive::open(path)?;

    Ok(read_chunk(&mut archive, request))
}
