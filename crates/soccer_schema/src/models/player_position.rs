use serde::{Deserialize, Serialize};

use super::{Entity, GameClock};
use crate::position::PositionType;
use crate::registry::{Key, KeyPart};
use crate::schema::catalog::PLAYER_POSITION;

/// Position a player held from `timestamp` onwards within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub match_id: String,
    pub player_id: String,
    pub timestamp: GameClock,
    pub period_id: i64,
    pub position: String,
}

impl PlayerPosition {
    /// `None` for codes outside the canonical enumeration (custom configs).
    pub fn position_type(&self) -> Option<PositionType> {
        PositionType::from_code(&self.position)
    }
}

impl Entity for PlayerPosition {
    const NAME: &'static str = PLAYER_POSITION;

    fn key(&self) -> Key {
        Key(vec![
            KeyPart::from(self.match_id.as_str()),
            KeyPart::from(self.player_id.as_str()),
            KeyPart::Int(self.timestamp.millis()),
            KeyPart::Int(self.period_id),
        ])
    }
}
