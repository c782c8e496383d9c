use super::RawGame;
use pgn_reader::{SanPlus, Skip, Visitor};
use std::mem;

/// Collects the mainline moves of each game as SAN tokens
pub(crate) struct MovetextVisitor {
    /// Moves of the current game
    tokens: Vec<String>,
}

impl MovetextVisitor {
    pub fn new() -> Self {
        MovetextVisitor { tokens: Vec::new() }
    }
}

impl Visitor for MovetextVisitor {
    type Result = RawGame;

    fn begin_game(&mut self) {
        self.tokens.clear();
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.tokens.push(san_plus.to_string());
    }

    fn end_game(&mut self) -> Self::Result {
        RawGame::new(mem::take(&mut self.tokens))
    }
}
