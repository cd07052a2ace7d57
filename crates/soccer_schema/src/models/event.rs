use serde::{Deserialize, Serialize};

use super::{Entity, GameClock};
use crate::registry::{Key, KeyPart};
use crate::schema::catalog::{EVENT_TYPE, MATCH_EVENT, QUALIFIER, QUALIFIER_TYPE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub eventtype_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for EventType {
    const NAME: &'static str = EVENT_TYPE;

    fn key(&self) -> Key {
        Key::single(self.eventtype_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifierType {
    pub qualifier_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for QualifierType {
    const NAME: &'static str = QUALIFIER_TYPE;

    fn key(&self) -> Key {
        Key::single(self.qualifier_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub match_id: String,
    pub event_id: String,
    pub eventtype_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub period_id: i64,
    pub timestamp: GameClock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<GameClock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_owning_team: Option<String>,
    /// Team of the performing player
    pub team_id: String,
    /// Performer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_coordinates_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_coordinates_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_player_id: Option<String>,
}

impl MatchEvent {
    pub fn start(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }

    pub fn end(&self) -> Option<(f64, f64)> {
        Some((self.end_coordinates_x?, self.end_coordinates_y?))
    }

    pub fn is_ball_alive(&self) -> Option<bool> {
        self.ball_state.as_deref().map(|s| s == "alive")
    }
}

impl Entity for MatchEvent {
    const NAME: &'static str = MATCH_EVENT;

    fn key(&self) -> Key {
        Key(vec![
            KeyPart::from(self.match_id.as_str()),
            KeyPart::from(self.event_id.as_str()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub match_id: String,
    pub event_id: String,
    pub qualifier_type_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier_value: Option<String>,
}

impl Qualifier {
    /// Key of the event this qualifier annotates.
    pub fn event_key(&self) -> Key {
        Key(vec![
            KeyPart::from(self.match_id.as_str()),
            KeyPart::from(self.event_id.as_str()),
        ])
    }
}

impl Entity for Qualifier {
    const NAME: &'static str = QUALIFIER;

    fn key(&self) -> Key {
        Key(vec![
            KeyPart::from(self.match_id.as_str()),
            KeyPart::from(self.event_id.as_str()),
            KeyPart::Int(self.qualifier_type_id),
        ])
    }
}
