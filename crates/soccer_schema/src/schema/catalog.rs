//! Canonical soccer data model.
//!
//! Entities are listed in dependency order: every foreign key points at an
//! entity that appears earlier, so the list can be registered (and batches
//! loaded) front to back.

use once_cell::sync::Lazy;

use super::entity::{EntitySpec, ForeignKey, RowCheck};
use super::field::{Axis, FieldSpec};
use crate::config::ValidatorConfig;
use crate::spadl::{SPADL_ACTION_TYPES, SPADL_BODYPARTS, SPADL_RESULTS};

pub const TEAM: &str = "Team";
pub const MATCH: &str = "Match";
pub const PLAYER: &str = "Player";
pub const PLAYER_TRACKING: &str = "PlayerTracking";
pub const EVENT_TYPE: &str = "EventType";
pub const QUALIFIER_TYPE: &str = "QualifierType";
pub const MATCH_EVENT: &str = "MatchEvent";
pub const QUALIFIER: &str = "Qualifier";
pub const SPADL_ACTION: &str = "SpadlAction";
pub const PLAYER_POSITION: &str = "PlayerPosition";

/// Ball state values recorded on match events.
pub const BALL_STATES: &[&str] = &["alive", "dead"];

fn match_side_check(field: &str) -> RowCheck {
    RowCheck::OneOfReferenced {
        field: field.to_string(),
        via: MATCH.to_string(),
        candidates: vec!["home_team_id".to_string(), "away_team_id".to_string()],
    }
}

pub fn team() -> EntitySpec {
    EntitySpec::new(TEAM, "teams")
        .field(FieldSpec::text("team_id"))
        .field(FieldSpec::text("team_name"))
        .key(&["team_id"])
}

pub fn match_info() -> EntitySpec {
    EntitySpec::new(MATCH, "matches")
        .field(FieldSpec::text("match_id"))
        .field(FieldSpec::date("match_date"))
        .field(FieldSpec::text("home_team_id"))
        .field(FieldSpec::text("away_team_id"))
        .field(FieldSpec::integer("home_score").optional())
        .field(FieldSpec::integer("away_score").optional())
        .key(&["match_id"])
        .references(ForeignKey::new("home_team_id", TEAM))
        .references(ForeignKey::new("away_team_id", TEAM))
        .check(RowCheck::Distinct {
            left: "home_team_id".to_string(),
            right: "away_team_id".to_string(),
        })
}

pub fn player() -> EntitySpec {
    EntitySpec::new(PLAYER, "players")
        .field(FieldSpec::text("player_id"))
        .field(FieldSpec::text("player_name"))
        .field(FieldSpec::text("team_id"))
        .field(FieldSpec::integer("jersey_number").optional())
        .key(&["player_id"])
        .references(ForeignKey::new("team_id", TEAM))
}

pub fn player_tracking(config: &ValidatorConfig) -> EntitySpec {
    EntitySpec::new(PLAYER_TRACKING, "player_tracking")
        .field(FieldSpec::integer("id"))
        .field(FieldSpec::text("game_id"))
        .field(FieldSpec::integer("frame_id"))
        .field(FieldSpec::duration("timestamp"))
        .field(FieldSpec::integer("period_id"))
        .field(FieldSpec::text("player_id"))
        .field(FieldSpec::float("x").coordinate(Axis::X))
        .field(FieldSpec::float("y").coordinate(Axis::Y))
        .key(&["id"])
        .references(ForeignKey::new("game_id", MATCH))
        .references(ForeignKey::new("player_id", PLAYER).exempt(config.ball_sentinel.clone()))
}

pub fn event_type() -> EntitySpec {
    EntitySpec::new(EVENT_TYPE, "eventtypes")
        .field(FieldSpec::integer("eventtype_id"))
        .field(FieldSpec::text("name"))
        .field(FieldSpec::text("description").optional())
        .key(&["eventtype_id"])
}

pub fn qualifier_type() -> EntitySpec {
    EntitySpec::new(QUALIFIER_TYPE, "qualifiertypes")
        .field(FieldSpec::integer("qualifier_id"))
        .field(FieldSpec::text("name"))
        .field(FieldSpec::text("description").optional())
        .key(&["qualifier_id"])
}

pub fn match_event() -> EntitySpec {
    EntitySpec::new(MATCH_EVENT, "matchevents")
        .field(FieldSpec::text("match_id"))
        .field(FieldSpec::text("event_id"))
        .field(FieldSpec::integer("eventtype_id"))
        .field(FieldSpec::text("result").optional())
        .field(FieldSpec::boolean("success").optional())
        .field(FieldSpec::integer("period_id"))
        .field(FieldSpec::duration("timestamp"))
        .field(FieldSpec::duration("end_timestamp").optional())
        .field(FieldSpec::text("ball_state").optional().one_of(BALL_STATES))
        .field(FieldSpec::text("ball_owning_team").optional())
        .field(FieldSpec::text("team_id"))
        .field(FieldSpec::text("player_id").optional())
        .field(FieldSpec::float("x").optional().coordinate(Axis::X))
        .field(FieldSpec::float("y").optional().coordinate(Axis::Y))
        .field(FieldSpec::float("end_coordinates_x").optional().coordinate(Axis::X))
        .field(FieldSpec::float("end_coordinates_y").optional().coordinate(Axis::Y))
        .field(FieldSpec::text("receiver_player_id").optional())
        .key(&["match_id", "event_id"])
        .references(ForeignKey::new("match_id", MATCH))
        .references(ForeignKey::new("eventtype_id", EVENT_TYPE))
        .references(ForeignKey::new("team_id", TEAM))
        .references(ForeignKey::new("ball_owning_team", TEAM))
        .references(ForeignKey::new("player_id", PLAYER))
        .references(ForeignKey::new("receiver_player_id", PLAYER))
        .check(match_side_check("team_id"))
        .check(match_side_check("ball_owning_team"))
}

pub fn qualifier() -> EntitySpec {
    EntitySpec::new(QUALIFIER, "qualifiers")
        .field(FieldSpec::text("match_id"))
        .field(FieldSpec::text("event_id"))
        .field(FieldSpec::integer("qualifier_type_id"))
        .field(FieldSpec::text("qualifier_value").optional())
        .key(&["match_id", "event_id", "qualifier_type_id"])
        .references(ForeignKey::composite(&["match_id", "event_id"], MATCH_EVENT))
        .references(ForeignKey::new("qualifier_type_id", QUALIFIER_TYPE))
}

pub fn spadl_action() -> EntitySpec {
    EntitySpec::new(SPADL_ACTION, "spadl_actions")
        .field(FieldSpec::integer("id"))
        .field(FieldSpec::text("game_id"))
        .field(FieldSpec::integer("period_id"))
        .field(FieldSpec::float("seconds"))
        .field(FieldSpec::text("player_id"))
        .field(FieldSpec::text("team_id"))
        .field(FieldSpec::float("start_x").coordinate(Axis::X))
        .field(FieldSpec::float("start_y").coordinate(Axis::Y))
        .field(FieldSpec::float("end_x").coordinate(Axis::X))
        .field(FieldSpec::float("end_y").coordinate(Axis::Y))
        .field(FieldSpec::text("action_type").one_of(SPADL_ACTION_TYPES))
        .field(FieldSpec::text("result").one_of(SPADL_RESULTS))
        .field(FieldSpec::text("bodypart").one_of(SPADL_BODYPARTS))
        .key(&["id"])
        .references(ForeignKey::new("game_id", MATCH))
        .references(ForeignKey::new("player_id", PLAYER))
        .references(ForeignKey::new("team_id", TEAM))
        .check(match_side_check("team_id"))
}

pub fn player_position(config: &ValidatorConfig) -> EntitySpec {
    EntitySpec::new(PLAYER_POSITION, "player_positions")
        .field(FieldSpec::text("match_id"))
        .field(FieldSpec::text("player_id"))
        .field(FieldSpec::duration("timestamp"))
        .field(FieldSpec::integer("period_id"))
        .field(FieldSpec::text("position").one_of(config.position_codes().as_slice()))
        .key(&["match_id", "player_id", "timestamp", "period_id"])
        .references(ForeignKey::new("match_id", MATCH))
        .references(ForeignKey::new("player_id", PLAYER))
}

static DEFAULT_CATALOG: Lazy<Vec<EntitySpec>> =
    Lazy::new(|| soccer_catalog(&ValidatorConfig::default()));

/// The catalog under the default configuration, built once.
pub fn default_catalog() -> &'static [EntitySpec] {
    &DEFAULT_CATALOG
}

/// All canonical entities in registration order.
pub fn soccer_catalog(config: &ValidatorConfig) -> Vec<EntitySpec> {
    vec![
        team(),
        match_info(),
        player(),
        player_tracking(config),
        event_type(),
        qualifier_type(),
        match_event(),
        qualifier(),
        spadl_action(),
        player_position(config),
    ]
}
