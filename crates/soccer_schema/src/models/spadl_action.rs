use serde::{Deserialize, Serialize};

use super::Entity;
use crate::registry::Key;
use crate::schema::catalog::SPADL_ACTION;
use crate::spadl::{SpadlActionType, SpadlBodyPart, SpadlResult};

/// An on-ball action in SPADL form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpadlAction {
    pub id: i64,
    pub game_id: String,
    pub period_id: i64,
    pub seconds: f64,
    pub player_id: String,
    pub team_id: String,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub action_type: SpadlActionType,
    pub result: SpadlResult,
    pub bodypart: SpadlBodyPart,
}

impl SpadlAction {
    pub fn is_successful(&self) -> bool {
        self.result == SpadlResult::Success
    }

    /// Straight-line distance between start and end location.
    pub fn distance(&self) -> f64 {
        (self.end_x - self.start_x).hypot(self.end_y - self.start_y)
    }
}

impl Entity for SpadlAction {
    const NAME: &'static str = SPADL_ACTION;

    fn key(&self) -> Key {
        Key::single(self.id)
    }
}
