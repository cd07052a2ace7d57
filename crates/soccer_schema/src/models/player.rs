use serde::{Deserialize, Serialize};

use super::Entity;
use crate::registry::Key;
use crate::schema::catalog::PLAYER;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub player_name: String,
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<i64>,
}

impl Entity for Player {
    const NAME: &'static str = PLAYER;

    fn key(&self) -> Key {
        Key::single(self.player_id.as_str())
    }
}
