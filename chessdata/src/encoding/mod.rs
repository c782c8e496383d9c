pub mod moves;
pub mod position;

pub use moves::{decode_index, encode_move, move_squares, target_index, MoveTarget, MOVE_TARGETS};
pub use position::{channel, encode_position, square_coords, PositionTensor, PIECE_CHANNELS};
