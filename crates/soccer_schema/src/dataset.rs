//! Typed accessors over a registry's accepted records.
//!
//! These are the lookups downstream consumers run against the loaded data:
//! a team's fixtures, a match's ordered event stream, tracking windows.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::models::{
    Entity, EventType, GameClock, Match, MatchEvent, Player, PlayerPosition, PlayerTracking,
    Qualifier, Side, Team,
};
use crate::registry::{Key, Record, SchemaRegistry};

/// A match involving a searched team, with both team names resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMatch {
    #[serde(flatten)]
    pub match_info: Match,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Whether the searched name matched the home side
    pub home: bool,
}

/// A match event joined with its type name and the receiver's team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRow {
    #[serde(flatten)]
    pub event: MatchEvent,
    pub eventtype_name: Option<String>,
    pub receiver_team_id: Option<String>,
}

/// A tracking sample joined with the tracked player, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingRow {
    #[serde(flatten)]
    pub sample: PlayerTracking,
    pub jersey_number: Option<i64>,
    pub player_name: Option<String>,
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingWindow {
    pub rows: Vec<TrackingRow>,
    /// Holes in the (sorted, distinct) frame-id sequence
    pub frame_gaps: usize,
}

/// A game's samples partitioned into ball, home side and away side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackingSplit {
    pub ball: Vec<PlayerTracking>,
    pub home: Vec<PlayerTracking>,
    pub away: Vec<PlayerTracking>,
}

pub struct Dataset<'a> {
    registry: &'a SchemaRegistry,
}

fn decode<T: Entity>(record: &Record) -> Result<T> {
    T::from_record(record).map_err(|source| SchemaError::Decode {
        entity: T::NAME.to_string(),
        source,
    })
}

impl<'a> Dataset<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn all<T: Entity>(&self) -> Result<Vec<T>> {
        self.registry.records(T::NAME).iter().map(decode::<T>).collect()
    }

    pub fn get<T: Entity>(&self, key: &Key) -> Result<Option<T>> {
        self.registry.get(T::NAME, key).map(decode::<T>).transpose()
    }

    pub fn count<T: Entity>(&self) -> usize {
        self.registry.records(T::NAME).len()
    }

    fn filtered<T: Entity>(&self, mut keep: impl FnMut(&Record) -> bool) -> Result<Vec<T>> {
        self.registry
            .records(T::NAME)
            .iter()
            .filter(|r| keep(*r))
            .map(decode::<T>)
            .collect()
    }

    fn players_by_id(&self) -> Result<FxHashMap<String, Player>> {
        Ok(self
            .all::<Player>()?
            .into_iter()
            .map(|p| (p.player_id.clone(), p))
            .collect())
    }

    /// Matches where either team's name contains `name_fragment` (case-insensitive).
    pub fn matches_for_team(&self, name_fragment: &str) -> Result<Vec<TeamMatch>> {
        let teams: FxHashMap<String, Team> = self
            .all::<Team>()?
            .into_iter()
            .map(|t| (t.team_id.clone(), t))
            .collect();

        let mut out = Vec::new();
        for m in self.all::<Match>()? {
            let (Some(home), Some(away)) = (teams.get(&m.home_team_id), teams.get(&m.away_team_id))
            else {
                continue;
            };
            let home_hit = home.name_matches(name_fragment);
            if !home_hit && !away.name_matches(name_fragment) {
                continue;
            }
            out.push(TeamMatch {
                home_team_name: home.team_name.clone(),
                away_team_name: away.team_name.clone(),
                home: home_hit,
                match_info: m,
            });
        }
        Ok(out)
    }

    /// A match's events ordered by period, then timestamp.
    pub fn events_for_match(&self, match_id: &str) -> Result<Vec<EventRow>> {
        let type_names: FxHashMap<i64, String> = self
            .all::<EventType>()?
            .into_iter()
            .map(|t| (t.eventtype_id, t.name))
            .collect();
        let players = self.players_by_id()?;

        let mut events: Vec<MatchEvent> =
            self.filtered(|r| r.get("match_id").and_then(|v| v.as_str()) == Some(match_id))?;
        events.sort_by_key(|e| (e.period_id, e.timestamp));

        Ok(events
            .into_iter()
            .map(|event| EventRow {
                eventtype_name: type_names.get(&event.eventtype_id).cloned(),
                receiver_team_id: event
                    .receiver_player_id
                    .as_ref()
                    .and_then(|id| players.get(id))
                    .map(|p| p.team_id.clone()),
                event,
            })
            .collect())
    }

    pub fn qualifiers_for_event(&self, match_id: &str, event_id: &str) -> Result<Vec<Qualifier>> {
        self.filtered(|r| {
            r.get("match_id").and_then(|v| v.as_str()) == Some(match_id)
                && r.get("event_id").and_then(|v| v.as_str()) == Some(event_id)
        })
    }

    fn tracking_rows(&self, samples: Vec<PlayerTracking>) -> Result<Vec<TrackingRow>> {
        let players = self.players_by_id()?;
        Ok(samples
            .into_iter()
            .map(|sample| {
                let player = players.get(&sample.player_id);
                TrackingRow {
                    jersey_number: player.and_then(|p| p.jersey_number),
                    player_name: player.map(|p| p.player_name.clone()),
                    team_id: player.map(|p| p.team_id.clone()),
                    sample,
                }
            })
            .collect())
    }

    fn samples_for_game(&self, game_id: &str) -> Result<Vec<PlayerTracking>> {
        self.filtered(|r| r.get("game_id").and_then(|v| v.as_str()) == Some(game_id))
    }

    /// Player samples of a game joined with jersey, name and team.
    ///
    /// Ball samples have no player and are left out.
    pub fn tracking_for_game(&self, game_id: &str) -> Result<Vec<TrackingRow>> {
        let rows = self.tracking_rows(self.samples_for_game(game_id)?)?;
        Ok(rows.into_iter().filter(|r| r.team_id.is_some()).collect())
    }

    /// Samples with `start <= timestamp < end`, optionally restricted to one
    /// period, ordered by timestamp then frame.
    pub fn tracking_window(
        &self,
        game_id: &str,
        start: GameClock,
        end: GameClock,
        period_id: Option<i64>,
    ) -> Result<TrackingWindow> {
        let mut samples: Vec<PlayerTracking> = self
            .samples_for_game(game_id)?
            .into_iter()
            .filter(|s| s.timestamp >= start && s.timestamp < end)
            .filter(|s| period_id.map_or(true, |p| s.period_id == p))
            .collect();
        samples.sort_by_key(|s| (s.timestamp, s.frame_id));

        let frame_gaps = count_frame_gaps(samples.iter().map(|s| s.frame_id));
        if frame_gaps > 0 {
            warn!(
                "game {}: {} gap(s) in frame ids between {} and {}",
                game_id, frame_gaps, start, end
            );
        }

        Ok(TrackingWindow {
            rows: self.tracking_rows(samples)?,
            frame_gaps,
        })
    }

    /// Ball, home and away samples of a game; `None` if the match is not loaded.
    pub fn split_tracking(&self, game_id: &str) -> Result<Option<TrackingSplit>> {
        let Some(m) = self.get::<Match>(&Key::single(game_id))? else {
            return Ok(None);
        };
        let sentinel = self.registry.config().ball_sentinel.as_str();
        let players = self.players_by_id()?;

        let mut split = TrackingSplit::default();
        for sample in self.samples_for_game(game_id)? {
            if sample.is_ball(sentinel) {
                split.ball.push(sample);
                continue;
            }
            let side = players
                .get(&sample.player_id)
                .and_then(|p| m.side_of(&p.team_id));
            match side {
                Some(Side::Home) => split.home.push(sample),
                Some(Side::Away) => split.away.push(sample),
                None => {}
            }
        }
        Ok(Some(split))
    }

    /// A player's position assignments in a match, in period/time order.
    pub fn positions_for_player(&self, match_id: &str, player_id: &str) -> Result<Vec<PlayerPosition>> {
        let mut positions: Vec<PlayerPosition> = self.filtered(|r| {
            r.get("match_id").and_then(|v| v.as_str()) == Some(match_id)
                && r.get("player_id").and_then(|v| v.as_str()) == Some(player_id)
        })?;
        positions.sort_by_key(|p| (p.period_id, p.timestamp));
        Ok(positions)
    }
}

fn count_frame_gaps(frames: impl Iterator<Item = i64>) -> usize {
    let mut frames: Vec<i64> = frames.collect();
    frames.sort_unstable();
    frames.dedup();
    frames.windows(2).filter(|w| w[1].abs_diff(w[0]) > 1).count()
}
