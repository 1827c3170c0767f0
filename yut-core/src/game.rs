//! Match state and the turn/throw state machine
//!
//! One turn: accumulate throw outcomes while bonus results chain, then one
//! piece selection per queued outcome in thrown order, then hand the turn
//! to the next unfinished player. A successful capture pauses selection
//! for one extra throw whose outcome is applied before the rest of the
//! queue.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::movement::{self, MoveReport};
use crate::pieces::{PieceId, PieceState, Pieces};
use crate::throw::{ThrowResult, ThrowService};

/// Seat index of a player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// One participant
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    pieces: Vec<PieceId>,
    finished: bool,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    /// True once every owned piece has finished its lap
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ready,
    InProgress,
    Finished,
}

/// Where the current turn stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Collecting throws; bonus outcomes keep this phase open
    AwaitingThrow { accumulated: Vec<ThrowResult> },
    /// A capture earned an extra throw; its outcome (and any bonus chain
    /// it starts) cuts in line ahead of the still-pending outcomes
    AwaitingBonusThrow {
        collected: Vec<ThrowResult>,
        pending: VecDeque<ThrowResult>,
    },
    /// One piece selection per queued outcome, front first
    SelectingPiece { queue: VecDeque<ThrowResult> },
    /// Nothing left to do but advance to the next player
    TurnComplete,
}

/// A full match: players, board, pieces, and the turn machine
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    pieces: Pieces,
    players: Vec<Player>,
    status: GameStatus,
    current: usize,
    /// Players in finishing order; the final ranking
    ranking: Vec<PlayerId>,
    phase: TurnPhase,
    throw_service: ThrowService,
}

impl Game {
    /// Set up a match with a randomly seeded throw service
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Self::with_throw_service(config, ThrowService::new())
    }

    /// Set up a match whose throws replay deterministically for a seed
    pub fn seeded(config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_throw_service(config, ThrowService::seeded(seed))
    }

    pub fn with_throw_service(
        config: &GameConfig,
        throw_service: ThrowService,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let mut board = Board::build(config.shape);
        let mut pieces = Pieces::default();
        let players = config
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = PlayerId(i as u8);
                let owned = (0..config.pieces_per_player)
                    .map(|_| pieces.spawn(&mut board, id))
                    .collect();
                Player {
                    id,
                    name: name.clone(),
                    pieces: owned,
                    finished: false,
                }
            })
            .collect();

        Ok(Self {
            board,
            pieces,
            players,
            status: GameStatus::Ready,
            current: 0,
            ranking: Vec::new(),
            phase: TurnPhase::AwaitingThrow {
                accumulated: Vec::new(),
            },
            throw_service,
        })
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    pub fn start(&mut self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Ready => {
                self.status = GameStatus::InProgress;
                Ok(())
            }
            GameStatus::InProgress => Err(GameError::AlreadyStarted),
            GameStatus::Finished => Err(GameError::GameOver),
        }
    }

    /// Hand the turn to the next player in seat order, skipping anyone
    /// already finished
    pub fn advance_turn(&mut self) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        if self.phase != TurnPhase::TurnComplete {
            return Err(GameError::WrongPhase);
        }
        let n = self.players.len();
        for offset in 1..=n {
            let idx = (self.current + offset) % n;
            if !self.players[idx].finished {
                self.current = idx;
                self.phase = TurnPhase::AwaitingThrow {
                    accumulated: Vec::new(),
                };
                return Ok(());
            }
        }
        // every player finished implies status Finished, caught above
        Err(GameError::GameOver)
    }

    // ========================================================================
    // THROWS
    // ========================================================================

    /// Toss the sticks for the current player
    pub fn throw_random(&mut self) -> Result<ThrowResult, GameError> {
        self.ensure_in_progress()?;
        let outcome = self.throw_service.throw();
        self.record_throw(outcome)
    }

    /// Record an externally supplied outcome (test and override path)
    pub fn throw_fixed(&mut self, desired: ThrowResult) -> Result<ThrowResult, GameError> {
        self.ensure_in_progress()?;
        let outcome = self.throw_service.fixed(desired);
        self.record_throw(outcome)
    }

    fn record_throw(&mut self, outcome: ThrowResult) -> Result<ThrowResult, GameError> {
        let phase = std::mem::replace(&mut self.phase, TurnPhase::TurnComplete);
        self.phase = match phase {
            TurnPhase::AwaitingThrow { mut accumulated } => {
                accumulated.push(outcome);
                if outcome.grants_extra_throw() {
                    TurnPhase::AwaitingThrow { accumulated }
                } else {
                    TurnPhase::SelectingPiece {
                        queue: accumulated.into(),
                    }
                }
            }
            TurnPhase::AwaitingBonusThrow {
                mut collected,
                pending,
            } => {
                collected.push(outcome);
                if outcome.grants_extra_throw() {
                    TurnPhase::AwaitingBonusThrow { collected, pending }
                } else {
                    let mut queue: VecDeque<ThrowResult> = collected.into();
                    queue.extend(pending);
                    TurnPhase::SelectingPiece { queue }
                }
            }
            other => {
                self.phase = other;
                return Err(GameError::WrongPhase);
            }
        };
        self.discard_unusable_backdo();
        Ok(outcome)
    }

    /// A backward outcome at the queue front is forfeited when nothing the
    /// current player owns has a step to retrace. Covers both a lone
    /// backward throw with an empty board and a backward outcome stranded
    /// mid-queue after an earlier outcome finished the last movable piece.
    fn discard_unusable_backdo(&mut self) {
        while let TurnPhase::SelectingPiece { queue } = &self.phase {
            if queue.front() != Some(&ThrowResult::BackDo) || self.current_player_can_back_move()
            {
                break;
            }
            if let TurnPhase::SelectingPiece { queue } = &mut self.phase {
                queue.pop_front();
                if queue.is_empty() {
                    self.phase = TurnPhase::TurnComplete;
                }
            }
        }
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Apply the next queued outcome to `piece` on behalf of `player`.
    /// The outcome argument must match the queue front; this keeps caller
    /// and engine agreed on what is being applied.
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        outcome: ThrowResult,
        piece: PieceId,
    ) -> Result<MoveReport, GameError> {
        self.ensure_in_progress()?;
        if player != self.players[self.current].id {
            return Err(GameError::NotYourTurn);
        }
        let next = match &self.phase {
            TurnPhase::SelectingPiece { queue } => queue.front().copied(),
            _ => None,
        };
        match next {
            None => return Err(GameError::WrongPhase),
            Some(queued) if queued != outcome => return Err(GameError::OutcomeMismatch),
            Some(_) => {}
        }
        if self.pieces.get(piece).owner() != player {
            return Err(GameError::NotYourPiece);
        }

        // Rejected moves leave the outcome queued for another selection.
        let report = movement::apply_move(&mut self.board, &mut self.pieces, piece, outcome)?;

        let remaining = if let TurnPhase::SelectingPiece { queue } = &mut self.phase {
            queue.pop_front();
            queue.len()
        } else {
            0
        };

        if self.players[self.current]
            .pieces
            .iter()
            .all(|&p| self.pieces.get(p).state() == PieceState::Finished)
        {
            // Leftover outcomes mean nothing once every piece is home.
            let id = self.players[self.current].id;
            self.players[self.current].finished = true;
            self.ranking.push(id);
            self.phase = TurnPhase::TurnComplete;
            if self.players.iter().all(|p| p.finished) {
                self.status = GameStatus::Finished;
            }
        } else if !report.captured.is_empty() {
            let pending = if let TurnPhase::SelectingPiece { queue } = &mut self.phase {
                std::mem::take(queue)
            } else {
                VecDeque::new()
            };
            self.phase = TurnPhase::AwaitingBonusThrow {
                collected: Vec::new(),
                pending,
            };
        } else if remaining == 0 {
            self.phase = TurnPhase::TurnComplete;
        } else {
            self.discard_unusable_backdo();
        }

        Ok(report)
    }

    /// Pieces of the current player that could act on `outcome`
    pub fn movable_pieces(&self, outcome: ThrowResult) -> Vec<PieceId> {
        self.players[self.current]
            .pieces
            .iter()
            .copied()
            .filter(|&p| match self.pieces.get(p).state() {
                PieceState::Finished => false,
                PieceState::NotStarted => outcome != ThrowResult::BackDo,
                PieceState::OnBoard => {
                    outcome != ThrowResult::BackDo || self.pieces.unit_path(p).len() >= 2
                }
            })
            .collect()
    }

    fn current_player_can_back_move(&self) -> bool {
        self.players[self.current].pieces.iter().any(|&p| {
            self.pieces.get(p).state() == PieceState::OnBoard
                && self.pieces.unit_path(p).len() >= 2
        })
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Ready => Err(GameError::NotStarted),
            GameStatus::Finished => Err(GameError::GameOver),
            GameStatus::InProgress => Ok(()),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.0 as usize]
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Finishing order so far; the full ranking once the match is over
    pub fn ranking(&self) -> &[PlayerId] {
        &self.ranking
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardShape;

    fn config(players: usize, pieces: u8) -> GameConfig {
        let names = (0..players).map(|i| format!("P{}", i + 1)).collect();
        GameConfig::new(names, pieces, BoardShape::Square)
    }

    fn started(players: usize, pieces: u8) -> Game {
        let mut game = Game::new(&config(players, pieces)).unwrap();
        game.start().unwrap();
        game
    }

    /// Throw, move a single piece through the queue, advance
    fn play_simple_turn(game: &mut Game, outcome: ThrowResult, piece: PieceId) {
        let player = game.current_player().id();
        game.throw_fixed(outcome).unwrap();
        game.apply_move(player, outcome, piece).unwrap();
        game.advance_turn().unwrap();
    }

    /// Throw a lone BackDo to skip a player whose pieces are all home
    fn skip_turn(game: &mut Game) {
        game.throw_fixed(ThrowResult::BackDo).unwrap();
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
        game.advance_turn().unwrap();
    }

    #[test]
    fn test_config_is_validated() {
        assert_eq!(
            Game::new(&config(1, 2)).unwrap_err(),
            GameError::PlayerCount(1)
        );
        assert_eq!(
            Game::new(&config(2, 9)).unwrap_err(),
            GameError::PieceCount(9)
        );
    }

    #[test]
    fn test_lifecycle_guards() {
        let mut game = Game::new(&config(2, 2)).unwrap();
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(
            game.throw_fixed(ThrowResult::Do),
            Err(GameError::NotStarted)
        );
        game.start().unwrap();
        assert_eq!(game.start(), Err(GameError::AlreadyStarted));
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_bonus_outcomes_accumulate_before_movement() {
        let mut game = started(2, 2);
        game.throw_fixed(ThrowResult::Yut).unwrap();
        assert!(matches!(
            game.phase(),
            TurnPhase::AwaitingThrow { accumulated } if accumulated.len() == 1
        ));
        game.throw_fixed(ThrowResult::Mo).unwrap();
        game.throw_fixed(ThrowResult::Do).unwrap();

        let queue = match game.phase() {
            TurnPhase::SelectingPiece { queue } => queue.clone(),
            other => panic!("expected selection phase, got {:?}", other),
        };
        assert_eq!(
            Vec::from(queue),
            vec![ThrowResult::Yut, ThrowResult::Mo, ThrowResult::Do]
        );
    }

    #[test]
    fn test_outcomes_apply_in_thrown_order() {
        let mut game = started(2, 2);
        let alice = game.current_player().id();
        let piece = game.current_player().pieces()[0];

        game.throw_fixed(ThrowResult::Yut).unwrap();
        game.throw_fixed(ThrowResult::Do).unwrap();

        // wrong outcome first is refused
        assert_eq!(
            game.apply_move(alice, ThrowResult::Do, piece),
            Err(GameError::OutcomeMismatch)
        );
        game.apply_move(alice, ThrowResult::Yut, piece).unwrap();
        game.apply_move(alice, ThrowResult::Do, piece).unwrap();

        // V0 + 4 + 1 = V1
        let v1 = game.board().cell_by_name("V1").unwrap();
        assert_eq!(game.pieces().get(piece).pos(), Some(v1));
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
    }

    #[test]
    fn test_turn_passes_to_next_player() {
        let mut game = started(3, 2);
        let first = game.current_player().id();
        let piece = game.current_player().pieces()[0];
        play_simple_turn(&mut game, ThrowResult::Do, piece);
        assert_ne!(game.current_player().id(), first);
        assert_eq!(game.current_player().name(), "P2");
    }

    #[test]
    fn test_backdo_with_nothing_on_board_skips_turn() {
        let mut game = started(2, 2);
        game.throw_fixed(ThrowResult::BackDo).unwrap();
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
        game.advance_turn().unwrap();
        assert_eq!(game.current_player().name(), "P2");
    }

    #[test]
    fn test_ownership_and_turn_guards() {
        let mut game = started(2, 2);
        let alice = game.players()[0].id();
        let bob = game.players()[1].id();
        let bobs_piece = game.players()[1].pieces()[0];

        game.throw_fixed(ThrowResult::Do).unwrap();
        assert_eq!(
            game.apply_move(bob, ThrowResult::Do, bobs_piece),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(
            game.apply_move(alice, ThrowResult::Do, bobs_piece),
            Err(GameError::NotYourPiece)
        );
    }

    #[test]
    fn test_rejected_move_leaves_outcome_queued() {
        let mut game = started(2, 2);
        let alice = game.players()[0].id();
        let a1 = game.players()[0].pieces()[0];
        let a2 = game.players()[0].pieces()[1];

        // a1 ends up on board at start with its history exhausted, a2 one
        // cell out with history to spare
        play_simple_turn(&mut game, ThrowResult::Do, a1);
        skip_turn(&mut game); // P2 has nothing on board
        play_simple_turn(&mut game, ThrowResult::BackDo, a1);
        skip_turn(&mut game);
        play_simple_turn(&mut game, ThrowResult::Do, a2);
        skip_turn(&mut game);

        game.throw_fixed(ThrowResult::BackDo).unwrap();
        assert_eq!(
            game.apply_move(alice, ThrowResult::BackDo, a1),
            Err(GameError::NoStepHistory)
        );
        // the outcome stays queued for another selection
        assert!(matches!(game.phase(), TurnPhase::SelectingPiece { .. }));
        game.apply_move(alice, ThrowResult::BackDo, a2).unwrap();
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
    }

    #[test]
    fn test_capture_grants_bonus_throw_ahead_of_queue() {
        let mut game = started(2, 2);
        let alice = game.players()[0].id();
        let bob = game.players()[1].id();
        let a1 = game.players()[0].pieces()[0];
        let a2 = game.players()[0].pieces()[1];
        let b1 = game.players()[1].pieces()[0];

        // Alice parks a1, Bob lands b1 four cells out
        play_simple_turn(&mut game, ThrowResult::Do, a1);
        play_simple_turn(&mut game, ThrowResult::Yut, b1);
        assert_eq!(game.current_player().id(), alice);

        // Alice accumulates [Yut, Gae]; the Yut move captures b1 on E0_3
        game.throw_fixed(ThrowResult::Yut).unwrap();
        game.throw_fixed(ThrowResult::Gae).unwrap();
        let report = game.apply_move(alice, ThrowResult::Yut, a2).unwrap();
        assert_eq!(report.captured, vec![b1]);

        // bonus throw cuts in line before the pending Gae
        assert!(matches!(
            game.phase(),
            TurnPhase::AwaitingBonusThrow { pending, .. } if pending == &[ThrowResult::Gae]
        ));
        game.throw_fixed(ThrowResult::Do).unwrap();
        let queue = match game.phase() {
            TurnPhase::SelectingPiece { queue } => queue.clone(),
            other => panic!("expected selection phase, got {:?}", other),
        };
        assert_eq!(Vec::from(queue), vec![ThrowResult::Do, ThrowResult::Gae]);

        game.apply_move(alice, ThrowResult::Do, a2).unwrap();
        game.apply_move(alice, ThrowResult::Gae, a1).unwrap();
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
        game.advance_turn().unwrap();
        assert_eq!(game.current_player().id(), bob);
    }

    #[test]
    fn test_finishing_player_joins_ranking_and_discards_queue() {
        let mut game = started(2, 2);
        let alice = game.players()[0].id();
        let a1 = game.players()[0].pieces()[0];
        let a2 = game.players()[0].pieces()[1];

        // group both pieces on E0_1, then carry the group to the center
        play_simple_turn(&mut game, ThrowResult::Gae, a1);
        skip_turn(&mut game);
        play_simple_turn(&mut game, ThrowResult::Gae, a2);
        skip_turn(&mut game);
        play_simple_turn(&mut game, ThrowResult::Geol, a1); // V1
        skip_turn(&mut game);
        play_simple_turn(&mut game, ThrowResult::Geol, a1); // C
        skip_turn(&mut game);

        // [Yut, Geol]: the Yut leg completes the lap, the Geol is moot
        game.throw_fixed(ThrowResult::Yut).unwrap();
        game.throw_fixed(ThrowResult::Geol).unwrap();
        let report = game.apply_move(alice, ThrowResult::Yut, a1).unwrap();
        assert_eq!(report.finished.len(), 2);

        assert_eq!(game.ranking(), &[alice]);
        assert!(game.players()[0].is_finished());
        assert_eq!(*game.phase(), TurnPhase::TurnComplete);
        assert!(!game.is_over());

        // the turn goes on to P2, and P1 is skipped from now on
        game.advance_turn().unwrap();
        assert_eq!(game.current_player().name(), "P2");
        let b1 = game.players()[1].pieces()[0];
        play_simple_turn(&mut game, ThrowResult::Do, b1);
        assert_eq!(game.current_player().name(), "P2");
    }

    #[test]
    fn test_movable_pieces_respects_backdo() {
        let mut game = started(2, 2);
        let a1 = game.players()[0].pieces()[0];
        assert_eq!(game.movable_pieces(ThrowResult::Do).len(), 2);
        assert!(game.movable_pieces(ThrowResult::BackDo).is_empty());

        play_simple_turn(&mut game, ThrowResult::Do, a1);
        skip_turn(&mut game);
        assert_eq!(game.movable_pieces(ThrowResult::BackDo), vec![a1]);
    }
}
