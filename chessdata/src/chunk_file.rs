//! Preprocessed chunks on disk.
//!
//! One game per line, UCI moves separated by a space. Files ending in `.zst`
//! are zstd compressed.

use crate::archive::{is_zstd, RawGame};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

pub struct ChunkFileWriter<W: Write> {
    writer: W,
    games_written: usize,
}

impl ChunkFileWriter<Box<dyn Write>> {
    /// Creates a chunk file, compressed if asked
    pub fn create<P: AsRef<Path>>(path: P, compress: bool) -> io::Result<Self> {
        let file = File::create(path)?;

        let writer: Box<dyn Write> = if compress {
            // the encoder is buffered internally
            Box::new(zstd::Encoder::new(file, 3)?.auto_finish())
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(ChunkFileWriter::new(writer))
    }
}

impl<W: Write> ChunkFileWriter<W> {
    pub fn new(writer: W) -> Self {
        ChunkFileWriter {
            writer,
            games_written: 0,
        }
    }

    pub fn write_game<S: AsRef<str>>(&mut self, tokens: &[S]) -> io::Result<()> {
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b" ")?;
            }
            self.writer.write_all(token.as_ref().as_bytes())?;
        }
        self.writer.write_all(b"\n")?;

        self.games_written += 1;
        Ok(())
    }

    pub fn games_written(&self) -> usize {
        self.games_written
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads every game of a chunk stream
pub fn read_chunk_games<R: BufRead>(reader: R) -> io::Result<Vec<RawGame>> {
    reader
        .lines()
        .map(|line| {
            let line = line?;
            Ok(RawGame::new(
                line.split_whitespace().map(str::to_string).collect(),
            ))
        })
        .collect()
}

/// Reads every game of a chunk file
pub fn read_chunk_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<RawGame>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let reader: Box<dyn Read> = if is_zstd(path) {
        Box::new(zstd::Decoder::new(file)?)
    } else {
        Box::new(file)
    };

    read_chunk_games(BufReader::new(reader))
}
