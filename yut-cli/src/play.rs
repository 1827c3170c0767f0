//! Interactive console match

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use tracing::info;
use yut_core::{
    Game, GameConfig, PieceId, PieceState, ThrowResult, TurnPhase,
};

pub fn run(config: &GameConfig, seed: Option<u64>) -> Result<()> {
    let mut game = match seed {
        Some(seed) => Game::seeded(config, seed)?,
        None => Game::new(config)?,
    };
    game.start()?;
    info!(players = config.player_names.len(), "match started");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.is_over() {
        match game.phase().clone() {
            TurnPhase::AwaitingThrow { accumulated } => {
                if accumulated.is_empty() {
                    print_occupancy(&game);
                }
                prompt_throw(&mut game, &mut lines)?;
            }
            TurnPhase::AwaitingBonusThrow { .. } => {
                prompt_throw(&mut game, &mut lines)?;
            }
            TurnPhase::SelectingPiece { queue } => {
                let outcome = *queue.front().expect("selection phase holds outcomes");
                prompt_selection(&mut game, &mut lines, outcome)?;
            }
            TurnPhase::TurnComplete => {
                game.advance_turn()?;
            }
        }
    }

    println!("\nFinal ranking:");
    for (place, &id) in game.ranking().iter().enumerate() {
        println!("  {}. {}", place + 1, game.player(id).name());
    }
    Ok(())
}

fn print_occupancy(game: &Game) {
    let mut entries = Vec::new();
    for (_, cell) in game.board().cells() {
        let holders: Vec<&str> = cell
            .occupants()
            .iter()
            .filter(|&&p| game.pieces().get(p).state() == PieceState::OnBoard)
            .map(|&p| game.player(game.pieces().get(p).owner()).name())
            .collect();
        if !holders.is_empty() {
            entries.push(format!("{} {}", cell.name(), holders.join("+")));
        }
    }
    if entries.is_empty() {
        println!("\nboard: empty");
    } else {
        println!("\nboard: {}", entries.join(" | "));
    }
}

fn prompt_throw(
    game: &mut Game,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    print!(
        "{}: Enter to throw, or type DO/GAE/GEOL/YUT/MO/BACK_DO > ",
        game.current_player().name()
    );
    io::stdout().flush()?;
    let line = next_line(lines)?;

    let outcome = if line.trim().is_empty() {
        game.throw_random()?
    } else {
        game.throw_fixed(parse_outcome(line.trim())?)?
    };
    println!("  threw {}", outcome);
    if outcome.grants_extra_throw() {
        println!("  bonus: throw again!");
    }
    if *game.phase() == TurnPhase::TurnComplete {
        println!("  no piece can move; turn skipped");
    }
    Ok(())
}

fn prompt_selection(
    game: &mut Game,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    outcome: ThrowResult,
) -> Result<()> {
    let player = game.current_player().id();
    let candidates = candidates_for(game, outcome);
    println!(
        "{}: apply {} - choose a piece:",
        game.current_player().name(),
        outcome
    );
    for (i, &piece) in candidates.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe(game, piece));
    }
    print!("> ");
    io::stdout().flush()?;

    let line = next_line(lines)?;
    let choice: usize = match line.trim().parse() {
        Ok(n) if (1..=candidates.len()).contains(&n) => n,
        _ => {
            println!("  pick a number between 1 and {}", candidates.len());
            return Ok(());
        }
    };

    match game.apply_move(player, outcome, candidates[choice - 1]) {
        Ok(report) => {
            if !report.captured.is_empty() {
                println!("  captured {} piece(s) - bonus throw!", report.captured.len());
            }
            if !report.finished.is_empty() {
                println!("  {} piece(s) finished the lap!", report.finished.len());
            }
            if let Some(dest) = report.destination {
                println!("  landed on {}", game.board().cell(dest).name());
            }
        }
        Err(err) => println!("  {}", err),
    }
    Ok(())
}

/// Pieces worth offering for this outcome; a token still at start may
/// absorb a backward throw as a stay-put move when nothing else can act
fn candidates_for(game: &Game, outcome: ThrowResult) -> Vec<PieceId> {
    let movable = game.movable_pieces(outcome);
    if !movable.is_empty() {
        return movable;
    }
    game.current_player()
        .pieces()
        .iter()
        .copied()
        .filter(|&p| game.pieces().get(p).state() == PieceState::NotStarted)
        .collect()
}

fn describe(game: &Game, piece: PieceId) -> String {
    match game.pieces().get(piece).pos() {
        Some(cell) if cell == game.board().start()
            && game.pieces().get(piece).state() == PieceState::NotStarted =>
        {
            "waiting at start".to_string()
        }
        Some(cell) => {
            let carried = game.pieces().unit_members(piece).len();
            if carried > 1 {
                format!("on {} (carrying {})", game.board().cell(cell).name(), carried)
            } else {
                format!("on {}", game.board().cell(cell).name())
            }
        }
        None => "finished".to_string(),
    }
}

fn parse_outcome(text: &str) -> Result<ThrowResult> {
    let outcome = match text.to_ascii_uppercase().as_str() {
        "BACK_DO" | "BACKDO" => ThrowResult::BackDo,
        "DO" => ThrowResult::Do,
        "GAE" => ThrowResult::Gae,
        "GEOL" => ThrowResult::Geol,
        "YUT" => ThrowResult::Yut,
        "MO" => ThrowResult::Mo,
        other => bail!("unknown throw outcome '{}'", other),
    };
    Ok(outcome)
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("input closed"),
    }
}
