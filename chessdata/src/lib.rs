//! Turns PGN game archives into `(position, move)` tensors for training a
//! move-prediction network.
//!
//! The pipeline is: [`archive::chunk::read_chunk`] streams a window of games
//! out of an archive, [`materialize::materialize`] replays each game and
//! encodes every ply, and [`dataset::Dataset`] holds the resulting pairs.

pub mod archive;
pub mod chunk_file;
pub mod dataset;
pub mod encoding;
pub mod materialize;
