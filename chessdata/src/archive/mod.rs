//! Reading games out of PGN archives.

pub mod chunk;
pub mod index;
mod visitor;

use pgn_reader::BufferedReader;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};
use thiserror::Error;
use visitor::MovetextVisitor;

/// Moves of a recorded game, in the notation of the archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGame {
    pub tokens: Vec<String>,
}

impl RawGame {
    pub fn new(tokens: Vec<String>) -> Self {
        RawGame { tokens }
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// A stream of games
pub trait GameSource {
    /// Reads the next game. `Ok(None)` marks the end of the archive.
    fn next_game(&mut self) -> Result<Option<RawGame>, ArchiveError>;
}

/// Games of a PGN stream. Variations are skipped, only the mainline is kept.
pub struct PgnArchive<R: Read> {
    reader: BufferedReader<R>,
    visitor: MovetextVisitor,
}

impl PgnArchive<Box<dyn Read>> {
    /// Opens a `.pgn` file, or a `.pgn.zst` file which is decompressed on the fly
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let file = File::open(path)?;

        // decompress if necessary
        let reader: Box<dyn Read> = if is_zstd(path) {
            Box::new(zstd::Decoder::new(file)?)
        } else {
            Box::new(file)
        };

        Ok(PgnArchive::new(reader))
    }
}

impl<R: Read> PgnArchive<R> {
    pub fn new(reader: R) -> Self {
        PgnArchive {
            reader: BufferedReader::new(reader),
            visitor: MovetextVisitor::new(),
        }
    }
}

impl<R: Read> GameSource for PgnArchive<R> {
    fn next_game(&mut self) -> Result<Option<RawGame>, ArchiveError> {
        Ok(self.reader.read_game(&mut self.visitor)?)
    }
}

pub(crate) fn is_zstd(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Moves of the n-th fixture game: a prefix of a Ruy Lopez of 1 to 6 plies
    pub fn game_tokens(n: usize) -> Vec<String> {
        const LINE: [&str; 6] = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"];
        LINE[..n % LINE.len() + 1]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    /// PGN text of `count` games, each with headers
    pub fn archive(count: usize) -> String {
        let mut pgn = String::new();

        for n in 0..count {
            let movetext = game_tokens(n)
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    if i % 2 == 0 {
                        format!("{}. {}", i / 2 + 1, t)
                    } else {
                        t.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            pgn.push_str(&format!(
                "[Event \"Game {}\"]\n[Result \"*\"]\n\n{} *\n\n",
                n, movetext
            ));
        }

        pgn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_mainline_tokens() {
        let pgn = "[Event \"x\"]\n\n1. e4 (1. d4 d5) 1... e5 2. Bb5+ {check} c6 *\n\n";
        let mut archive = PgnArchive::new(pgn.as_bytes());

        let game = archive.next_game().unwrap().unwrap();
        assert_eq!(game.tokens, vec!["e4", "e5", "Bb5+", "c6"]);
        assert!(archive.next_game().unwrap().is_none());
    }

    #[test]
    fn games_are_read_in_order() {
        let pgn = fixtures::archive(7);
        let mut archive = PgnArchive::new(pgn.as_bytes());

        for n in 0..7 {
            let game = archive.next_game().unwrap().unwrap();
            assert_eq!(game.tokens, fixtures::game_tokens(n));
        }
        assert!(archive.next_game().unwrap().is_none());
    }

    #[test]
    fn empty_archive_has_no_games() {
        let mut archive = PgnArchive::new("".as_bytes());
        assert!(archive.next_game().unwrap().is_none());
    }
}
