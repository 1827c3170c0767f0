//! Yut Nori CLI - console front end
//!
//! Commands:
//! - play: interactive console match
//! - demo: fully automated seeded match

mod demo;
mod play;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use yut_core::{BoardShape, GameConfig};

#[derive(Parser)]
#[command(name = "yut")]
#[command(about = "Yut Nori race game on a polygonal board")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive console match
    Play {
        /// Comma-separated player names
        #[arg(long, default_value = "Alice,Bob")]
        players: String,
        /// Pieces per player (2-5)
        #[arg(long, default_value = "4")]
        pieces: u8,
        #[arg(long, value_enum, default_value = "square")]
        shape: ShapeArg,
        /// Seed for the stick throws; random when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// JSON setup file; overrides the flags above
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Watch a fully automated seeded match
    Demo {
        #[arg(long, default_value = "Alice,Bob,Choi,Dana")]
        players: String,
        #[arg(long, default_value = "2")]
        pieces: u8,
        #[arg(long, value_enum, default_value = "square")]
        shape: ShapeArg,
        #[arg(long, default_value = "12345")]
        seed: u64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Square,
    Pentagon,
    Hexagon,
}

impl From<ShapeArg> for BoardShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Square => BoardShape::Square,
            ShapeArg::Pentagon => BoardShape::Pentagon,
            ShapeArg::Hexagon => BoardShape::Hexagon,
        }
    }
}

fn parse_names(players: &str) -> Vec<String> {
    players
        .split(',')
        .map(|name| name.trim().to_string())
        .collect()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            players,
            pieces,
            shape,
            seed,
            config,
        } => {
            let config = match config {
                Some(path) => GameConfig::load(&path)?,
                None => GameConfig::new(parse_names(&players), pieces, shape.into()),
            };
            play::run(&config, seed)
        }
        Commands::Demo {
            players,
            pieces,
            shape,
            seed,
        } => {
            let config = GameConfig::new(parse_names(&players), pieces, shape.into());
            demo::run(&config, seed)
        }
    }
}
