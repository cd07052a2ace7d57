use serde::{Deserialize, Serialize};

use super::{Entity, GameClock};
use crate::registry::Key;
use crate::schema::catalog::PLAYER_TRACKING;

/// One observed position sample. Ball samples carry the ball sentinel as `player_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTracking {
    pub id: i64,
    pub game_id: String,
    pub frame_id: i64,
    pub timestamp: GameClock,
    pub period_id: i64,
    pub player_id: String,
    pub x: f64,
    pub y: f64,
}

impl PlayerTracking {
    pub fn is_ball(&self, sentinel: &str) -> bool {
        self.player_id == sentinel
    }
}

impl Entity for PlayerTracking {
    const NAME: &'static str = PLAYER_TRACKING;

    fn key(&self) -> Key {
        Key::single(self.id)
    }
}
