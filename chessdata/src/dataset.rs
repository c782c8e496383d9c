use crate::{
    archive::RawGame,
    chunk_file::read_chunk_file,
    encoding::{MOVE_TARGETS, PIECE_CHANNELS},
    materialize::{materialize, Notation, TrainingPair},
};
use ndarray::{Array2, Array4, Axis};
use shakmaty::Chess;
use std::{io, ops::Range, path::Path};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("index {index} is out of range for a dataset of {len} pairs")]
    OutOfRange { index: usize, len: usize },
}

/// Encoded `(position, move)` pairs in (game, ply) order.
///
/// Nothing mutates a dataset once built, so it can be shared between readers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pairs: Vec<TrainingPair>,
}

impl Dataset {
    /// Concatenates the pairs of every game, in order
    pub fn from_games<I>(games: I) -> Self
    where
        I: IntoIterator<Item = Vec<TrainingPair>>,
    {
        Dataset {
            pairs: games.into_iter().flatten().collect(),
        }
    }

    /// Materializes every game from the initial position
    pub fn from_raw_games(games: &[RawGame], notation: Notation) -> Self {
        let mut truncated = 0;

        let dataset = Dataset::from_games(games.iter().map(|game| {
            let materialized = materialize(Chess::default(), &game.tokens, notation);
            if materialized.halted.is_some() {
                truncated += 1;
            }
            materialized.pairs
        }));

        debug!(
            games = games.len(),
            truncated,
            pairs = dataset.len(),
            "dataset built"
        );
        dataset
    }

    /// Loads a preprocessed chunk file (UCI moves)
    pub fn from_chunk_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let games = read_chunk_file(path)?;
        Ok(Dataset::from_raw_games(&games, Notation::Uci))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&TrainingPair, DatasetError> {
        self.pairs.get(index).ok_or(DatasetError::OutOfRange {
            index,
            len: self.pairs.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingPair> {
        self.pairs.iter()
    }

    /// Stacks the pairs in `range` into `[n, 12, 8, 8]` positions and
    /// `[n, 4096]` targets
    pub fn batch(&self, range: Range<usize>) -> Result<(Array4<f32>, Array2<f32>), DatasetError> {
        if range.start > range.end || range.end > self.len() {
            return Err(DatasetError::OutOfRange {
                index: range.end.max(range.start),
                len: self.len(),
            });
        }

        let n = range.len();
        let mut positions = Array4::zeros((n, PIECE_CHANNELS, 8, 8));
        let mut targets = Array2::zeros((n, MOVE_TARGETS));

        for (i, pair) in self.pairs[range].iter().enumerate() {
            positions
                .index_axis_mut(Axis(0), i)
                .assign(pair.position.as_array());
            targets
                .index_axis_mut(Axis(0), i)
                .assign(pair.target.as_array());
        }

        Ok((positions, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::target_index;
    use shakmaty::Square;

    fn tokens(moves: &[&str]) -> RawGame {
        RawGame::new(moves.iter().map(|m| m.to_string()).collect())
    }

    fn sample() -> Dataset {
        Dataset::from_raw_games(
            &[
                tokens(&["e4", "e5", "Nf3"]),
                tokens(&["d4", "??", "c4"]),
                tokens(&[]),
                tokens(&["c4", "e5"]),
            ],
            Notation::San,
        )
    }

    #[test]
    fn pairs_are_flattened_in_game_order() {
        let dataset = sample();

        // 3 + 1 (truncated) + 0 + 2
        assert_eq!(dataset.len(), 6);

        let hot: Vec<usize> = dataset
            .iter()
            .map(|p| p.target.hot_index().unwrap())
            .collect();
        assert_eq!(
            hot,
            vec![
                target_index(Square::E2, Square::E4),
                target_index(Square::E7, Square::E5),
                target_index(Square::G1, Square::F3),
                target_index(Square::D2, Square::D4),
                target_index(Square::C2, Square::C4),
                target_index(Square::E7, Square::E5),
            ]
        );
    }

    #[test]
    fn get_returns_inserted_pair() {
        let first = materialize(Chess::default(), &["e4", "e5"], Notation::San).pairs;
        let second = materialize(Chess::default(), &["d4"], Notation::San).pairs;
        let dataset = Dataset::from_games(vec![first.clone(), second.clone()]);

        assert_eq!(dataset.get(0).unwrap(), &first[0]);
        assert_eq!(dataset.get(1).unwrap(), &first[1]);
        assert_eq!(dataset.get(2).unwrap(), &second[0]);
        assert_eq!(
            dataset.get(3),
            Err(DatasetError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn empty_dataset() {
        let dataset = Dataset::from_games(Vec::new());

        assert!(dataset.is_empty());
        assert!(dataset.get(0).is_err());
    }

    #[test]
    fn batch_stacks_pairs() {
        let dataset = sample();
        let (positions, targets) = dataset.batch(1..4).unwrap();

        assert_eq!(positions.shape(), &[3, 12, 8, 8]);
        assert_eq!(targets.shape(), &[3, 4096]);
        assert_eq!(
            positions.index_axis(Axis(0), 0),
            dataset.get(1).unwrap().position.as_array().view()
        );
        assert_eq!(targets.sum(), 3.0);

        let (positions, _) = dataset.batch(2..2).unwrap();
        assert_eq!(positions.shape(), &[0, 12, 8, 8]);

        assert!(dataset.batch(4..7).is_err());
    }

    #[test]
    fn dataset_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dataset>();
    }
}
