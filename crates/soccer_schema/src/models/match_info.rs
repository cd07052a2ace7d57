use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::registry::Key;
use crate::schema::catalog::MATCH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    #[serde(deserialize_with = "super::lenient_date::deserialize")]
    pub match_date: NaiveDate,
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i64>,
}

impl Match {
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if team_id == self.home_team_id {
            Some(Side::Home)
        } else if team_id == self.away_team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn team_id(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team_id,
            Side::Away => &self.away_team_id,
        }
    }

    pub fn opponent_of(&self, team_id: &str) -> Option<&str> {
        match self.side_of(team_id)? {
            Side::Home => Some(&self.away_team_id),
            Side::Away => Some(&self.home_team_id),
        }
    }
}

impl Entity for Match {
    const NAME: &'static str = MATCH;

    fn key(&self) -> Key {
        Key::single(self.match_id.as_str())
    }
}
