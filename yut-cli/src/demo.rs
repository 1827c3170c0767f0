//! Automated seeded match, useful for eyeballing rule behavior

use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use yut_core::{Game, GameConfig, GameError, PieceState, ThrowResult, TurnPhase};

pub fn run(config: &GameConfig, seed: u64) -> Result<()> {
    let mut game = Game::seeded(config, seed)?;
    // independent stream for piece selection so throws stay reproducible
    let mut picker = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    game.start()?;
    info!(seed, players = config.player_names.len(), "demo match started");

    let mut turns = 0u32;
    while !game.is_over() {
        match game.phase().clone() {
            TurnPhase::AwaitingThrow { .. } | TurnPhase::AwaitingBonusThrow { .. } => {
                let outcome = game.throw_random()?;
                debug!(player = game.current_player().name(), %outcome, "threw");
            }
            TurnPhase::SelectingPiece { queue } => {
                let outcome = *queue.front().expect("selection phase holds outcomes");
                select_and_move(&mut game, &mut picker, outcome)?;
            }
            TurnPhase::TurnComplete => {
                game.advance_turn()?;
                turns += 1;
            }
        }
    }

    println!("Match over after {} turns. Final ranking:", turns);
    for (place, &id) in game.ranking().iter().enumerate() {
        println!("  {}. {}", place + 1, game.player(id).name());
    }
    Ok(())
}

fn select_and_move(game: &mut Game, picker: &mut ChaCha8Rng, outcome: ThrowResult) -> Result<()> {
    let player = game.current_player().id();
    let mut candidates = game.movable_pieces(outcome);
    if candidates.is_empty() {
        // a token at start absorbs a backward throw as a stay-put move
        candidates = game
            .current_player()
            .pieces()
            .iter()
            .copied()
            .filter(|&p| game.pieces().get(p).state() == PieceState::NotStarted)
            .collect();
    }
    if candidates.is_empty() {
        bail!("no piece of {} can take {}", game.player(player).name(), outcome);
    }

    let offset = picker.gen_range(0..candidates.len());
    for i in 0..candidates.len() {
        let piece = candidates[(offset + i) % candidates.len()];
        match game.apply_move(player, outcome, piece) {
            Ok(report) => {
                if !report.captured.is_empty() {
                    info!(
                        player = game.player(player).name(),
                        captured = report.captured.len(),
                        "capture - bonus throw granted"
                    );
                }
                if !report.finished.is_empty() {
                    info!(
                        player = game.player(player).name(),
                        finished = report.finished.len(),
                        "lap complete"
                    );
                }
                return Ok(());
            }
            Err(GameError::NoStepHistory) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    bail!("every candidate refused {}", outcome)
}
