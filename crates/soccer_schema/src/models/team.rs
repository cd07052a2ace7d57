use serde::{Deserialize, Serialize};

use super::Entity;
use crate::registry::Key;
use crate::schema::catalog::TEAM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
}

impl Team {
    /// Case-insensitive substring match on the team name.
    pub fn name_matches(&self, fragment: &str) -> bool {
        self.team_name
            .to_lowercase()
            .contains(&fragment.to_lowercase())
    }
}

impl Entity for Team {
    const NAME: &'static str = TEAM;

    fn key(&self) -> Key {
        Key::single(self.team_id.as_str())
    }
}
