use chessdata::{dataset::Dataset, encoding::PIECE_CHANNELS};
use clap::Args;
use ndarray::{Array1, Axis};
use std::error::Error;
use tracing::info;

const CHANNEL_NAMES: [&str; PIECE_CHANNELS] = [
    "white pawn",
    "white knight",
    "white bishop",
    "white rook",
    "white queen",
    "white king",
    "black pawn",
    "black knight",
    "black bishop",
    "black rook",
    "black queen",
    "black king",
];

#[derive(Args)]
pub struct DatasetInfoCommand {
    /// Chunk file written by `preprocess` (.txt or .txt.zst)
    #[arg(long, value_name = "input")]
    input: String,
}

pub fn dataset_info(cmd: DatasetInfoCommand) -> Result<(), Box<dyn Error>> {
    let dataset = Dataset::from_chunk_file(&cmd.input)?;
    info!(input = %cmd.input, pairs = dataset.len(), "dataset loaded");

    println!("Pairs: {}", dataset.len());

    // pieces seen on every channel, over all positions
    let mut occupancy = Array1::<f32>::zeros(PIECE_CHANNELS);
    for pair in dataset.iter() {
        occupancy += &pair
            .position
            .as_array()
            .sum_axis(Axis(2))
            .sum_axis(Axis(1));
    }

    for (name, total) in CHANNEL_NAMES.iter().zip(occupancy.iter()) {
        println!("{:>13}: {}", name, total);
    }

    Ok(())
}
