use crate::encoding::{encode_move, encode_position, move_squares, MoveTarget, PositionTensor};
use shakmaty::{
    san::{SanError, SanPlus},
    uci::UciMove,
    CastlingMode, Chess, Move, Position, Square,
};
use thiserror::Error;
use tracing::debug;

/// Notation of the move tokens of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// Standard algebraic notation, as found in PGN movetext (`Nf3`, `exd5`, `O-O`)
    San,
    /// Coordinate notation (`g1f3`, `e4d5`, `e1g1`)
    Uci,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    #[error("can't decode `{token}`: {reason}")]
    Decode { token: String, reason: String },
    #[error("`{token}` is not legal in this position")]
    Illegal { token: String },
    /// A piece drop, which has no source square. Standard chess never
    /// produces one: drop tokens are rejected as [`MaterializeError::Illegal`]
    /// before they get here.
    #[error("`{token}` has no source square")]
    Unencodable { token: String },
}

impl Notation {
    /// Decodes a token against the current position. The same token may
    /// resolve to different moves depending on the position.
    pub fn decode(self, token: &str, position: &Chess) -> Result<Move, MaterializeError> {
        let decode_error = |reason: String| MaterializeError::Decode {
            token: token.to_string(),
            reason,
        };
        let illegal = || MaterializeError::Illegal {
            token: token.to_string(),
        };

        let mov = match self {
            Notation::San => {
                let san_plus = SanPlus::from_ascii(token.as_bytes())
                    .map_err(|e| decode_error(e.to_string()))?;

                match san_plus.san.to_move(position) {
                    Ok(mov) => mov,
                    Err(SanError::AmbiguousSan) => {
                        return Err(decode_error(SanError::AmbiguousSan.to_string()))
                    }
                    Err(_) => return Err(illegal()),
                }
            }
            Notation::Uci => UciMove::from_ascii(token.as_bytes())
                .map_err(|e| decode_error(e.to_string()))?
                .to_move(position)
                .map_err(|_| illegal())?,
        };

        if !position.is_legal(&mov) {
            return Err(illegal());
        }

        Ok(mov)
    }
}

/// Where and why a game stopped being replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    /// Index of the offending token, equal to the number of plies replayed
    pub ply: usize,
    pub error: MaterializeError,
}

/// Replays `tokens` from `position`, calling `on_ply` with the position
/// before each move. Stops at the first token that can't be decoded or is
/// illegal; the rest of the game is not looked at.
pub fn replay<S, F>(
    mut position: Chess,
    tokens: &[S],
    notation: Notation,
    mut on_ply: F,
) -> Option<Halt>
where
    S: AsRef<str>,
    F: FnMut(&Chess, &Move, (Square, Square)),
{
    for (ply, token) in tokens.iter().enumerate() {
        let token = token.as_ref();

        let decoded = notation.decode(token, &position).and_then(|mov| {
            let squares = move_squares(&mov).ok_or_else(|| MaterializeError::Unencodable {
                token: token.to_string(),
            })?;
            Ok((mov, squares))
        });

        match decoded {
            Ok((mov, squares)) => {
                on_ply(&position, &mov, squares);
                position.play_unchecked(&mov);
            }
            Err(error) => {
                debug!(ply, %error, "game truncated");
                return Some(Halt { ply, error });
            }
        }
    }

    None
}

/// Encoded pre-move position and the move played from it
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    pub position: PositionTensor,
    pub target: MoveTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedGame {
    /// One pair per replayed ply, in order
    pub pairs: Vec<TrainingPair>,
    /// Set when the game was cut short
    pub halted: Option<Halt>,
}

/// Replays a game and encodes every ply into a [`TrainingPair`]
pub fn materialize<S: AsRef<str>>(
    position: Chess,
    tokens: &[S],
    notation: Notation,
) -> MaterializedGame {
    let mut pairs = Vec::with_capacity(tokens.len());

    let halted = replay(position, tokens, notation, |pos, _, (from, to)| {
        pairs.push(TrainingPair {
            position: encode_position(pos.board()),
            target: encode_move(from, to),
        });
    });

    MaterializedGame { pairs, halted }
}

/// Rewrites a game in UCI notation, truncated like [`materialize`] would
pub fn to_uci_tokens<S: AsRef<str>>(
    tokens: &[S],
    notation: Notation,
) -> (Vec<String>, Option<Halt>) {
    let mut uci = Vec::with_capacity(tokens.len());

    let halted = replay(Chess::default(), tokens, notation, |_, mov, _| {
        uci.push(UciMove::from_move(mov, CastlingMode::Standard).to_string());
    });

    (uci, halted)
}
