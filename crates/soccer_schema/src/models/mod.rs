//! Typed views of validated records.

pub mod clock;
pub mod event;
pub mod match_info;
pub mod player;
pub mod player_position;
pub mod spadl_action;
pub mod team;
pub mod tracking;

pub use clock::GameClock;
pub use event::{EventType, MatchEvent, Qualifier, QualifierType};
pub use match_info::{Match, Side};
pub use player::Player;
pub use player_position::PlayerPosition;
pub use spadl_action::SpadlAction;
pub use team::Team;
pub use tracking::PlayerTracking;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::registry::{Key, Record};

/// A typed record of one catalog entity.
pub trait Entity: Serialize + DeserializeOwned {
    /// Registry name of the entity
    const NAME: &'static str;

    fn key(&self) -> Key;

    fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record.clone()))
    }

    fn to_record(&self) -> Result<Record, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "{} serialized to a non-object: {other}",
                Self::NAME
            ))),
        }
    }
}

pub(crate) mod lenient_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    use crate::schema::field::parse_date;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}
