//! Match setup parameters

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::BoardShape;
use crate::error::GameError;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MIN_PIECES: u8 = 2;
pub const MAX_PIECES: u8 = 5;

/// Everything needed to set up a match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_names: Vec<String>,
    pub pieces_per_player: u8,
    pub shape: BoardShape,
}

impl GameConfig {
    pub fn new(player_names: Vec<String>, pieces_per_player: u8, shape: BoardShape) -> Self {
        Self {
            player_names,
            pieces_per_player,
            shape,
        }
    }

    /// Setup validation; fatal, never retried internally
    pub fn validate(&self) -> Result<(), GameError> {
        let count = self.player_names.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::PlayerCount(count));
        }
        if self.player_names.iter().any(|n| n.trim().is_empty()) {
            return Err(GameError::EmptyPlayerName);
        }
        if !(MIN_PIECES..=MAX_PIECES).contains(&self.pieces_per_player) {
            return Err(GameError::PieceCount(self.pieces_per_player));
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
