use ndarray::{Array3, ArrayView2, Axis};
use shakmaty::{Board, Color, Piece, Role, Square};

/// 6 roles × 2 colors
pub const PIECE_CHANNELS: usize = 12;

/// Side length of the board
pub const BOARD_SIZE: usize = 8;

/// Piece occupancy planes of a position, shape `[12, 8, 8]`.
///
/// Only piece placement is encoded: there is no side to move, castling or
/// history plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTensor(Array3<f32>);

impl PositionTensor {
    pub fn as_array(&self) -> &Array3<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array3<f32> {
        self.0
    }

    /// The `[8, 8]` plane of a single channel
    pub fn plane(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.0.index_axis(Axis(0), channel)
    }
}

/// Channel of a piece: White P N B R Q K are 0..6, Black 6..12
pub fn channel(piece: Piece) -> usize {
    let base = match piece.role {
        Role::Pawn => 0,
        Role::Knight => 1,
        Role::Bishop => 2,
        Role::Rook => 3,
        Role::Queen => 4,
        Role::King => 5,
    };

    match piece.color {
        Color::White => base,
        Color::Black => base + 6,
    }
}

/// `(row, col)` of a square, where a1 is `(0, 0)` and h8 is `(7, 7)`
pub fn square_coords(square: Square) -> (usize, usize) {
    let index = square as usize;
    (index / BOARD_SIZE, index % BOARD_SIZE)
}

/// Encodes the piece placement of a board into a one-hot occupancy tensor
pub fn encode_position(board: &Board) -> PositionTensor {
    let mut tensor = Array3::zeros((PIECE_CHANNELS, BOARD_SIZE, BOARD_SIZE));

    for square in Square::ALL {
        if let Some(piece) = board.piece_at(square) {
            let (row, col) = square_coords(square);
            tensor[[channel(piece), row, col]] = 1.0;
        }
    }

    PositionTensor(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

    fn position(fen: &str) -> Chess {
        let fen: Fen = fen.parse().unwrap();
        fen.into_position(CastlingMode::Standard).unwrap()
    }

    /// Every occupied square has exactly one hot channel, empty squares none
    fn check_occupancy(board: &Board) {
        let tensor = encode_position(board);
        assert_eq!(tensor.as_array().shape(), &[12, 8, 8]);

        for square in Square::ALL {
            let (row, col) = square_coords(square);
            let column = tensor.as_array().slice(ndarray::s![.., row, col]);
            let hot: Vec<usize> = column
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v == 1.0)
                .map(|(c, _)| c)
                .collect();

            assert!(column.iter().all(|&v| v == 0.0 || v == 1.0));

            match board.piece_at(square) {
                Some(piece) => assert_eq!(hot, vec![channel(piece)], "square {}", square),
                None => assert!(hot.is_empty(), "square {}", square),
            }
        }
    }

    #[test]
    fn initial_position_planes() {
        let pos = Chess::default();
        let tensor = encode_position(pos.board());

        assert_eq!(tensor.as_array().sum(), 32.0);

        // white pawns on rank 2, black pawns on rank 7
        assert_eq!(tensor.plane(0).row(1).sum(), 8.0);
        assert_eq!(tensor.plane(6).row(6).sum(), 8.0);

        // white king e1, black king e8
        assert_eq!(tensor.as_array()[[5, 0, 4]], 1.0);
        assert_eq!(tensor.as_array()[[11, 7, 4]], 1.0);

        // nothing in the middle of the board
        for row in 2..6 {
            assert_eq!(tensor.as_array().slice(ndarray::s![.., row, ..]).sum(), 0.0);
        }
    }

    #[test]
    fn occupancy_is_one_hot() {
        const FENS: [&str; 3] = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "4nrk1/3q1pp1/2n1p1p1/8/1P2Q3/7P/PB1N1PP1/2R3K1 w - - 5 26",
            "8/5k2/1p5r/p1pPR3/P1P3K1/8/8/8 w - - 2 57",
        ];

        for fen in FENS {
            check_occupancy(position(fen).board());
        }
    }

    #[test]
    fn side_to_move_is_not_encoded() {
        let white = position("8/5k2/1p5r/p1pPR3/P1P3K1/8/8/8 w - - 2 57");
        let black = position("8/5k2/1p5r/p1pPR3/P1P3K1/8/8/8 b - - 2 57");

        assert_eq!(encode_position(white.board()), encode_position(black.board()));
    }

    #[test]
    fn row_and_col_follow_square_index() {
        assert_eq!(square_coords(Square::A1), (0, 0));
        assert_eq!(square_coords(Square::H1), (0, 7));
        assert_eq!(square_coords(Square::E4), (3, 4));
        assert_eq!(square_coords(Square::H8), (7, 7));
    }
}
