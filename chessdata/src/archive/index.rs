//! Byte offsets of the games of an uncompressed PGN archive.
//!
//! With an index, a chunk is read by seeking straight to its first game
//! instead of scanning every game before it. The index only sees games that
//! start with a header section, which is what PGN exports always produce.

use super::chunk::{collect_games, Chunk, ChunkError, ChunkRequest};
use super::{is_zstd, ArchiveError, PgnArchive};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: `{value}` is not a byte offset")]
    Parse { line: usize, value: String },
    #[error("line {line}: offset {offset} does not come after the previous one")]
    NotIncreasing { line: usize, offset: u64 },
    #[error("compressed archives can't be indexed or read through an index, decompress first")]
    Compressed,
    #[error("games {start}..{end} are out of bounds for an index of {len} games")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameIndex {
    /// Offset of the first header line of every game
    offsets: Vec<u64>,
}

impl GameIndex {
    /// Scans a PGN stream line by line. A game starts at a `[` line that is not
    /// preceded by another header line. Lines that start inside a `{ }`
    /// comment are movetext, even when they begin with `[` (wrapped
    /// `[%clk ...]` annotations).
    pub fn build<R: BufRead>(mut reader: R) -> Result<Self, IndexError> {
        let mut offsets = Vec::new();
        let mut offset = 0u64;
        let mut in_headers = false;
        let mut in_comment = false;
        let mut line = Vec::with_capacity(256);

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }

            let is_header = !in_comment && line.first() == Some(&b'[');
            if is_header && !in_headers {
                offsets.push(offset);
            }
            in_headers = is_header;

            if !is_header {
                in_comment = comment_open_after(&line, in_comment);
            }

            offset += read as u64;
        }

        Ok(GameIndex { offsets })
    }

    pub fn build_from_path<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if is_zstd(path) {
            return Err(IndexError::Compressed);
        }

        let file = File::open(path)?;
        Self::build(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Byte offset of a game
    pub fn offset(&self, ordinal: usize) -> Option<u64> {
        self.offsets.get(ordinal).copied()
    }

    /// Writes one decimal offset per line
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for offset in &self.offsets {
            writeln!(writer, "{}", offset)?;
        }
        writer.flush()
    }

    /// Offsets must be strictly increasing
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, IndexError> {
        let mut offsets: Vec<u64> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let value = line.trim();
            if value.is_empty() {
                continue;
            }

            let offset = value.parse::<u64>().map_err(|_| IndexError::Parse {
                line: i + 1,
                value: value.to_string(),
            })?;

            if offsets.last().is_some_and(|&last| offset <= last) {
                return Err(IndexError::NotIncreasing {
                    line: i + 1,
                    offset,
                });
            }
            offsets.push(offset);
        }

        Ok(GameIndex { offsets })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IndexError> {
        let file = File::create(path)?;
        Ok(self.write_to(BufWriter::new(file))?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

/// Whether a `{ }` comment is still open at the end of `line`
fn comment_open_after(line: &[u8], mut in_comment: bool) -> bool {
    for &byte in line {
        match (in_comment, byte) {
            (true, b'}') => in_comment = false,
            (false, b'{') => in_comment = true,
            // rest of line comment
            (false, b';') => break,
            _ => {}
        }
    }
    in_comment
}

/// Reads a chunk by seeking to its first game.
///
/// Gives the same games as [`super::chunk::read_chunk`] on the same archive.
pub fn read_chunk_indexed<P: AsRef<Path>>(
    path: P,
    index: &GameIndex,
    request: ChunkRequest,
) -> Result<Chunk, ChunkError> {
    let path = path.as_ref();
    if is_zstd(path) {
        return Err(IndexError::Compressed.into());
    }

    let mut chunk = Chunk::default();

    let Some(offset) = index.offset(request.skip_count()) else {
        // the chunk is entirely past the end
        return Ok(chunk);
    };

    let mut file = File::open(path).map_err(ArchiveError::from)?;
    file.seek(SeekFrom::Start(offset))
        .map_err(ArchiveError::from)?;

    let mut archive = PgnArchive::new(file);
    collect_games(&mut archive, request.range(), &mut chunk);

    Ok(chunk)
}

/// Raw PGN text of the games `start..end`
pub fn extract_games<P: AsRef<Path>>(
    path: P,
    index: &GameIndex,
    start: usize,
    end: usize,
) -> Result<Vec<u8>, IndexError> {
    let path = path.as_ref();
    if is_zstd(path) {
        return Err(IndexError::Compressed);
    }

    if start > end || end > index.len() {
        return Err(IndexError::OutOfBounds {
            start,
            end,
            len: index.len(),
        });
    }

    let mut content = Vec::new();
    let Some(start_offset) = index.offset(start) else {
        // start == end == len
        return Ok(content);
    };

    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start_offset))?;

    match index.offset(end) {
        Some(end_offset) => {
            file.take(end_offset - start_offset)
                .read_to_end(&mut content)?;
        }
        // up to the end of the archive
        None => {
            file.read_to_end(&mut content)?;
        }
    }

    Ok(content)
}
