use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::schema::field::parse_duration_value;

/// Time since the start of a period, millisecond resolution.
///
/// Deserializes from seconds (`83.4`) or clock text (`"00:01:23.400"`,
/// `"0 days 00:01:23.4"`); serializes as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GameClock(pub i64);

impl GameClock {
    pub fn from_millis(ms: i64) -> Self {
        GameClock(ms)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        GameClock((secs * 1000.0).round() as i64)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0 / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60,
            self.0 % 1000
        )
    }
}

impl Serialize for GameClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for GameClock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_duration_value(&value)
            .map(GameClock)
            .ok_or_else(|| de::Error::custom(format!("invalid game clock value: {value}")))
    }
}
