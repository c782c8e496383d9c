use ndarray::Array1;
use shakmaty::{File, Move, Square};

/// Every (source, destination) pair of squares, including the impossible
/// `square → square` ones
pub const MOVE_TARGETS: usize = 64 * 64;

/// One-hot move target of length 4096
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTarget(Array1<f32>);

impl MoveTarget {
    pub fn as_array(&self) -> &Array1<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array1<f32> {
        self.0
    }

    /// Index of the hot entry
    pub fn hot_index(&self) -> Option<usize> {
        self.0.iter().position(|&v| v == 1.0)
    }
}

/// `source * 64 + destination`
pub fn target_index(from: Square, to: Square) -> usize {
    from as usize * 64 + to as usize
}

/// Inverse of [`target_index`]
pub fn decode_index(index: usize) -> Option<(Square, Square)> {
    if index >= MOVE_TARGETS {
        return None;
    }

    Some((Square::new((index / 64) as u32), Square::new((index % 64) as u32)))
}

/// Source and destination squares of a move.
///
/// Castling is given as the king's two-square step (e1g1, e1c1) rather than
/// the king-takes-rook form shakmaty uses internally. Drops have no source
/// square and yield `None`.
pub fn move_squares(m: &Move) -> Option<(Square, Square)> {
    match *m {
        Move::Castle { king, rook } => {
            let king_file = if king < rook {
                // king side
                File::G
            } else {
                // queen side
                File::C
            };
            Some((king, Square::from_coords(king_file, king.rank())))
        }
        _ => Some((m.from()?, m.to())),
    }
}

/// Encodes a move given by its squares. No legality check is done here.
pub fn encode_move(from: Square, to: Square) -> MoveTarget {
    let mut target = Array1::zeros(MOVE_TARGETS);
    target[target_index(from, to)] = 1.0;
    MoveTarget(target)
}
