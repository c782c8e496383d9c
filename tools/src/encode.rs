use chessdata::{
    encoding::{encode_move, encode_position, move_squares, PIECE_CHANNELS},
    materialize::Notation,
};
use clap::Args;
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};
use std::error::Error;

const CHANNEL_SYMBOLS: [char; PIECE_CHANNELS] =
    ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

#[derive(Args)]
pub struct EncodeCommand {
    /// Position to encode
    #[arg(long, value_name = "fen")]
    fen: String,

    /// If provided, it will also print the target index of this move
    #[arg(long, value_name = "uci")]
    uci: Option<String>,
}

pub fn encode(cmd: EncodeCommand) -> Result<(), Box<dyn Error>> {
    let position: Chess = Fen::from_ascii(cmd.fen.as_bytes())?
        .into_position(CastlingMode::Standard)?;

    let tensor = encode_position(position.board());

    for (channel, symbol) in CHANNEL_SYMBOLS.iter().enumerate() {
        println!("{}", symbol);

        let plane = tensor.plane(channel);
        // rank 8 first, like a diagram
        for row in (0..8).rev() {
            let line: Vec<String> = (0..8)
                .map(|col| format!("{}", plane[[row, col]] as u8))
                .collect();
            println!("{}", line.join(" "));
        }
    }

    if let Some(uci) = cmd.uci {
        let mov = Notation::Uci.decode(&uci, &position)?;
        let (from, to) = move_squares(&mov).ok_or("move has no source square")?;

        let target = encode_move(from, to);
        if let Some(index) = target.hot_index() {
            println!("{} -> {}", uci, index);
        }
    }

    Ok(())
}
