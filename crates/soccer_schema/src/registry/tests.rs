//! Integration tests for the registry
//!
//! Loads a small two-team fixture and exercises validation, batch loading
//! and the typed dataset views on top of it.

use serde_json::{json, Value};

use super::*;
use crate::config::PitchBounds;
use crate::models::{GameClock, Match, Team};
use crate::schema::catalog::{
    MATCH, MATCH_EVENT, PLAYER, PLAYER_POSITION, PLAYER_TRACKING, QUALIFIER, SPADL_ACTION, TEAM,
};
use crate::schema::{FieldSpec, ForeignKey};

fn rec(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {other}"),
    }
}

fn fixture_with(config: ValidatorConfig) -> SchemaRegistry {
    let mut registry = SchemaRegistry::with_catalog(config).unwrap();
    for (id, name) in [("t1", "Home FC"), ("t2", "Away United"), ("t3", "Bystanders")] {
        registry
            .load(TEAM, rec(json!({"team_id": id, "team_name": name})))
            .unwrap();
    }
    registry
        .load(
            MATCH,
            rec(json!({
                "match_id": "m1", "match_date": "2024-03-09",
                "home_team_id": "t1", "away_team_id": "t2",
                "home_score": 2, "away_score": 1
            })),
        )
        .unwrap();
    for (id, name, team, jersey) in [
        ("p1", "Alice", "t1", 9),
        ("p2", "Bea", "t2", 4),
        ("p3", "Cleo", "t3", 1),
    ] {
        registry
            .load(
                PLAYER,
                rec(json!({"player_id": id, "player_name": name, "team_id": team, "jersey_number": jersey})),
            )
            .unwrap();
    }
    registry
        .load("EventType", rec(json!({"eventtype_id": 1, "name": "pass"})))
        .unwrap();
    registry
        .load("QualifierType", rec(json!({"qualifier_id": 107, "name": "long_ball"})))
        .unwrap();
    registry
}

fn fixture() -> SchemaRegistry {
    fixture_with(ValidatorConfig::default())
}

fn event(event_id: &str, period: i64, timestamp: f64, team: &str) -> Record {
    rec(json!({
        "match_id": "m1", "event_id": event_id, "eventtype_id": 1,
        "period_id": period, "timestamp": timestamp, "team_id": team,
        "player_id": "p1", "ball_state": "alive"
    }))
}

fn sample(id: i64, frame: i64, timestamp: f64, player: &str) -> Record {
    rec(json!({
        "id": id, "game_id": "m1", "frame_id": frame, "timestamp": timestamp,
        "period_id": 1, "player_id": player, "x": 50.0, "y": 30.0
    }))
}

#[test]
fn test_valid_record_returned_unchanged() {
    let registry = fixture();
    let position = rec(json!({
        "match_id": "m1", "player_id": "p1", "timestamp": "00:00:00",
        "period_id": 1, "position": "GK"
    }));

    let validated = registry.validate(PLAYER_POSITION, position.clone()).unwrap();
    assert_eq!(validated, position);
    // validate never stores
    assert!(registry.records(PLAYER_POSITION).is_empty());
}

#[test]
fn test_missing_field_is_named() {
    let registry = fixture();
    let err = registry
        .validate(TEAM, rec(json!({"team_id": "t9"})))
        .unwrap_err();

    match err {
        SchemaError::Validation(e) => {
            assert_eq!(e.entity, TEAM);
            assert!(e.names_field("team_name"));
            assert_eq!(e.violations.len(), 1);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_dangling_match_reference() {
    let registry = fixture();
    let mut tracking = sample(1, 1, 0.0, "p1");
    tracking.insert("game_id".to_string(), json!("m9"));

    let err = registry.validate(PLAYER_TRACKING, tracking).unwrap_err();
    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert!(violations[0].is_dangling_reference());
    assert_eq!(violations[0].field(), Some("game_id"));
}

#[test]
fn test_position_outside_enumeration() {
    let registry = fixture();
    let err = registry
        .validate(
            PLAYER_POSITION,
            rec(json!({
                "match_id": "m1", "player_id": "p1", "timestamp": 0,
                "period_id": 1, "position": "FWD"
            })),
        )
        .unwrap_err();

    assert!(err.violations().iter().any(|v| v.is_enum_violation()));
}

#[test]
fn test_all_violations_reported_together() {
    let registry = fixture();
    let err = registry
        .validate(
            MATCH_EVENT,
            rec(json!({
                "match_id": "m9", "event_id": "e1", "eventtype_id": "pass",
                "timestamp": 1.0, "team_id": "t1", "ball_state": "paused"
            })),
        )
        .unwrap_err();

    let kinds: Vec<Value> = err
        .violations()
        .iter()
        .map(|v| serde_json::to_value(v).unwrap()["kind"].clone())
        .collect();
    assert!(kinds.contains(&json!("missing_field")));
    assert!(kinds.contains(&json!("type_mismatch")));
    assert!(kinds.contains(&json!("enum_violation")));
    assert!(kinds.contains(&json!("dangling_reference")));
}

#[test]
fn test_reload_identical_record_is_noop() {
    let mut registry = fixture();
    let team = rec(json!({"team_id": "t1", "team_name": "Home FC"}));

    let key = registry.load(TEAM, team.clone()).unwrap();
    assert_eq!(key, Key::single("t1"));
    assert_eq!(registry.records(TEAM).len(), 3);
    assert_eq!(registry.validate(TEAM, team.clone()).unwrap(), team);
}

#[test]
fn test_conflicting_key() {
    let mut registry = fixture();
    let err = registry
        .load(TEAM, rec(json!({"team_id": "t1", "team_name": "Renamed FC"})))
        .unwrap_err();

    assert!(matches!(
        err.violations(),
        [Violation::ConflictingKey { .. }]
    ));
    let stored = registry.get(TEAM, &Key::single("t1")).unwrap();
    assert_eq!(stored["team_name"], json!("Home FC"));
}

#[test]
fn test_ball_samples_skip_player_reference() {
    let mut registry = fixture();
    registry.load(PLAYER_TRACKING, sample(1, 1, 0.0, "ball")).unwrap();

    let err = registry
        .load(PLAYER_TRACKING, sample(2, 1, 0.0, "p404"))
        .unwrap_err();
    assert!(err.violations()[0].is_dangling_reference());
}

#[test]
fn test_custom_ball_sentinel() {
    let config = ValidatorConfig {
        ball_sentinel: "-1".to_string(),
        ..ValidatorConfig::default()
    };
    let mut registry = fixture_with(config);

    registry.load(PLAYER_TRACKING, sample(1, 1, 0.0, "-1")).unwrap();
    assert!(registry
        .load(PLAYER_TRACKING, sample(2, 1, 0.0, "ball"))
        .is_err());
}

#[test]
fn test_event_team_must_play_in_match() {
    let registry = fixture();
    registry.validate(MATCH_EVENT, event("e1", 1, 1.0, "t2")).unwrap();

    let err = registry
        .validate(MATCH_EVENT, event("e2", 1, 1.0, "t3"))
        .unwrap_err();
    match err.violations() {
        [Violation::Constraint { check, .. }] => assert!(check.contains("team_id")),
        other => panic!("expected one constraint violation, got {other:?}"),
    }
}

#[test]
fn test_match_needs_distinct_teams() {
    let registry = fixture();
    let err = registry
        .validate(
            MATCH,
            rec(json!({
                "match_id": "m2", "match_date": "2024-03-16",
                "home_team_id": "t1", "away_team_id": "t1"
            })),
        )
        .unwrap_err();
    assert!(matches!(err.violations(), [Violation::Constraint { .. }]));
}

#[test]
fn test_qualifier_composite_reference() {
    let mut registry = fixture();
    registry.load(MATCH_EVENT, event("e1", 1, 1.0, "t1")).unwrap();

    let ok = rec(json!({"match_id": "m1", "event_id": "e1", "qualifier_type_id": 107}));
    registry.load(QUALIFIER, ok).unwrap();

    let err = registry
        .validate(
            QUALIFIER,
            rec(json!({"match_id": "m1", "event_id": "e2", "qualifier_type_id": 107})),
        )
        .unwrap_err();
    match err.violations() {
        [Violation::DanglingReference { fields, entity, .. }] => {
            assert_eq!(fields, &["match_id".to_string(), "event_id".to_string()]);
            assert_eq!(entity, MATCH_EVENT);
        }
        other => panic!("unexpected violations: {other:?}"),
    }
}

fn dangling_fields(err: &SchemaError) -> Vec<(Vec<String>, String)> {
    err.violations()
        .iter()
        .filter_map(|v| match v {
            Violation::DanglingReference { fields, entity, .. } => {
                Some((fields.clone(), entity.clone()))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_unknown_event_type_is_dangling() {
    let registry = fixture();
    let mut unknown = event("e1", 1, 1.0, "t1");
    unknown.insert("eventtype_id".to_string(), json!(99));

    let err = registry.validate(MATCH_EVENT, unknown).unwrap_err();
    assert_eq!(
        dangling_fields(&err),
        vec![(vec!["eventtype_id".to_string()], "EventType".to_string())]
    );
    assert_eq!(err.violations().len(), 1);
}

#[test]
fn test_unknown_qualifier_type_is_dangling() {
    let mut registry = fixture();
    registry.load(MATCH_EVENT, event("e1", 1, 1.0, "t1")).unwrap();

    let err = registry
        .validate(
            QUALIFIER,
            rec(json!({"match_id": "m1", "event_id": "e1", "qualifier_type_id": 999})),
        )
        .unwrap_err();
    assert_eq!(
        dangling_fields(&err),
        vec![(vec!["qualifier_type_id".to_string()], "QualifierType".to_string())]
    );
    assert_eq!(err.violations().len(), 1);
}

#[test]
fn test_player_team_must_exist() {
    let registry = fixture();
    let err = registry
        .validate(
            PLAYER,
            rec(json!({"player_id": "p9", "player_name": "Dora", "team_id": "t9"})),
        )
        .unwrap_err();
    assert_eq!(
        dangling_fields(&err),
        vec![(vec!["team_id".to_string()], TEAM.to_string())]
    );
    assert!(err.violations()[0].is_dangling_reference());
}

#[test]
fn test_spadl_vocabulary_enforced() {
    let registry = fixture();
    let action = rec(json!({
        "id": 1, "game_id": "m1", "period_id": 1, "seconds": 12.0,
        "player_id": "p1", "team_id": "t1",
        "start_x": 10.0, "start_y": 10.0, "end_x": 20.0, "end_y": 12.0,
        "action_type": "pass", "result": "success", "bodypart": "foot"
    }));
    registry.validate(SPADL_ACTION, action.clone()).unwrap();

    let mut bad = action;
    bad.insert("action_type".to_string(), json!("backheel_flick"));
    bad.insert("result".to_string(), json!("maybe"));
    bad.insert("bodypart".to_string(), json!("knee"));

    let err = registry.validate(SPADL_ACTION, bad).unwrap_err();
    let mut fields: Vec<&str> = err
        .violations()
        .iter()
        .filter(|v| v.is_enum_violation())
        .filter_map(Violation::field)
        .collect();
    fields.sort_unstable();
    assert_eq!(fields, vec!["action_type", "bodypart", "result"]);
    assert_eq!(err.violations().len(), 3);
}

#[test]
fn test_oversized_clock_text_is_type_mismatch() {
    let registry = fixture();
    for clock in [
        "9999999999999:00:00",
        "999999999999999 days 00:00:00",
        "-0:00:01",
        "+1:00:00",
    ] {
        let mut e = event("e1", 1, 0.0, "t1");
        e.insert("timestamp".to_string(), json!(clock));

        let err = registry.validate(MATCH_EVENT, e).unwrap_err();
        assert!(
            matches!(err.violations(), [Violation::TypeMismatch { field, .. }] if field == "timestamp"),
            "{clock}: {:?}",
            err.violations()
        );
    }

    let mut position = rec(json!({
        "match_id": "m1", "player_id": "p1", "timestamp": "9999999999999:00:00",
        "period_id": 1, "position": "GK"
    }));
    let err = registry.validate(PLAYER_POSITION, position.clone()).unwrap_err();
    assert!(matches!(err.violations(), [Violation::TypeMismatch { .. }]));

    position.insert("timestamp".to_string(), json!("00:00:00"));
    registry.validate(PLAYER_POSITION, position).unwrap();
}

#[test]
fn test_register_duplicate_and_invalid_entities() {
    let mut registry = fixture();
    let err = registry.register_entity(crate::schema::catalog::team()).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateEntity { .. }));

    let orphan = EntitySpec::new("Referee", "referees")
        .field(FieldSpec::text("referee_id"))
        .field(FieldSpec::text("league_id"))
        .key(&["referee_id"])
        .references(ForeignKey::new("league_id", "League"));
    let err = registry.register_entity(orphan).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidSchema { .. }));

    let keyless = EntitySpec::new("Stadium", "stadiums").field(FieldSpec::text("name"));
    assert!(matches!(
        registry.register_entity(keyless),
        Err(SchemaError::InvalidSchema { .. })
    ));
}

#[test]
fn test_describe_lists_catalog() {
    let registry = fixture();
    let described = registry.describe().unwrap();
    let entities = described.as_array().unwrap();
    assert_eq!(entities.len(), 10);
    assert_eq!(entities[0]["name"], json!(TEAM));
    assert_eq!(entities[0]["primary_key"], json!(["team_id"]));
    assert!(registry.entity(QUALIFIER).is_some());
}

#[test]
fn test_catalog_rejects_invalid_config() {
    let no_positions = ValidatorConfig {
        allowed_positions: Some(Vec::new()),
        ..ValidatorConfig::default()
    };
    assert!(matches!(
        SchemaRegistry::with_catalog(no_positions),
        Err(SchemaError::Config(_))
    ));

    let blank_sentinel = ValidatorConfig {
        ball_sentinel: "  ".to_string(),
        ..ValidatorConfig::default()
    };
    assert!(matches!(
        SchemaRegistry::with_catalog(blank_sentinel),
        Err(SchemaError::Config(_))
    ));
}

#[test]
fn test_unknown_entity() {
    let mut registry = fixture();
    let err = registry
        .validate("Referee", rec(json!({"referee_id": "r1"})))
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownEntity { .. }));

    assert!(registry.load_batch("Referee", Vec::new()).is_err());
}

#[test]
fn test_batch_failures_are_isolated() {
    let mut registry = fixture();
    let report = registry
        .load_batch(
            MATCH_EVENT,
            vec![
                event("e1", 1, 1.0, "t1"),
                event("e2", 1, 2.0, "t3"),
                event("e3", 1, 3.0, "t2"),
            ],
        )
        .unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].row, 1);
    assert_eq!(registry.records(MATCH_EVENT).len(), 2);
}

#[test]
fn test_repeated_rows_in_batch_are_idempotent() {
    let mut registry = SchemaRegistry::with_catalog(ValidatorConfig::default()).unwrap();
    let report = registry
        .load_batch(
            TEAM,
            vec![
                rec(json!({"team_id": "a", "team_name": "A"})),
                rec(json!({"team_id": "a", "team_name": "A"})),
            ],
        )
        .unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(registry.records(TEAM).len(), 1);
}

#[test]
fn test_match_file_loads_in_dependency_order() {
    let mut registry = SchemaRegistry::with_catalog(ValidatorConfig::default()).unwrap();
    // BTreeMap order would put Match and Player before Team
    let batch = MatchBatch::new()
        .with(
            PLAYER,
            vec![rec(json!({"player_id": "p1", "player_name": "Alice", "team_id": "t1"}))],
        )
        .with(
            MATCH,
            vec![rec(json!({
                "match_id": "m1", "match_date": "2024-03-09",
                "home_team_id": "t1", "away_team_id": "t2"
            }))],
        )
        .with(
            TEAM,
            vec![
                rec(json!({"team_id": "t1", "team_name": "Home FC"})),
                rec(json!({"team_id": "t2", "team_name": "Away United"})),
            ],
        );

    let reports = registry.load_match_file(batch).unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(names, vec![TEAM, MATCH, PLAYER]);
    assert!(reports.iter().all(BatchReport::is_clean));
}

#[test]
fn test_match_file_with_unknown_entity_loads_nothing() {
    let mut registry = SchemaRegistry::with_catalog(ValidatorConfig::default()).unwrap();
    let batch = MatchBatch::new()
        .with(TEAM, vec![rec(json!({"team_id": "t1", "team_name": "Home FC"}))])
        .with("Referee", vec![rec(json!({"referee_id": "r1"}))]);

    assert!(matches!(
        registry.load_match_file(batch),
        Err(SchemaError::UnknownEntity { .. })
    ));
    assert_eq!(registry.index().total_len(), 0);
}

#[test]
fn test_strict_config() {
    let registry = fixture_with(ValidatorConfig::strict());

    let mut extra = rec(json!({"team_id": "t8", "team_name": "Extra"}));
    extra.insert("founded".to_string(), json!(1901));
    let err = registry.validate(TEAM, extra).unwrap_err();
    assert!(matches!(err.violations(), [Violation::UnknownField { field }] if field == "founded"));

    let mut off_pitch = sample(1, 1, 0.0, "p1");
    off_pitch.insert("x".to_string(), json!(120.0));
    let err = registry.validate(PLAYER_TRACKING, off_pitch).unwrap_err();
    assert!(matches!(err.violations(), [Violation::OutOfBounds { field, .. }] if field == "x"));
}

#[test]
fn test_default_config_ignores_extras_and_bounds() {
    let registry = fixture();
    let mut off_pitch = sample(1, 1, 0.0, "p1");
    off_pitch.insert("x".to_string(), json!(120.0));
    off_pitch.insert("speed".to_string(), json!(7.5));
    registry.validate(PLAYER_TRACKING, off_pitch).unwrap();
}

#[test]
fn test_normalized_bounds() {
    let config = ValidatorConfig {
        pitch_bounds: Some(PitchBounds::normalized()),
        ..ValidatorConfig::default()
    };
    let registry = fixture_with(config);
    let mut inside = sample(1, 1, 0.0, "p1");
    inside.insert("x".to_string(), json!(0.5));
    inside.insert("y".to_string(), json!(1.0));
    registry.validate(PLAYER_TRACKING, inside).unwrap();
}

// Dataset views

#[test]
fn test_matches_for_team() {
    let registry = fixture();
    let dataset = registry.dataset();

    let found = dataset.matches_for_team("united").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].home_team_name, "Home FC");
    assert_eq!(found[0].away_team_name, "Away United");
    assert!(!found[0].home);

    assert!(dataset.matches_for_team("bystand").unwrap().is_empty());
    assert_eq!(dataset.count::<Team>(), 3);
}

#[test]
fn test_events_ordered_by_period_then_time() {
    let mut registry = fixture();
    let mut pass = event("e1", 2, 1.0, "t1");
    pass.insert("receiver_player_id".to_string(), json!("p2"));
    registry
        .load_batch(
            MATCH_EVENT,
            vec![pass, event("e2", 1, 30.0, "t2"), event("e3", 1, 5.0, "t1")],
        )
        .unwrap();

    let rows = registry.dataset().events_for_match("m1").unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.event.event_id.as_str()).collect();
    assert_eq!(ids, vec!["e3", "e2", "e1"]);
    assert_eq!(rows[2].eventtype_name.as_deref(), Some("pass"));
    assert_eq!(rows[2].receiver_team_id.as_deref(), Some("t2"));
    assert_eq!(rows[0].receiver_team_id, None);
}

#[test]
fn test_tracking_views() {
    let mut registry = fixture();
    registry
        .load_batch(
            PLAYER_TRACKING,
            vec![
                sample(1, 1, 0.00, "ball"),
                sample(2, 1, 0.00, "p1"),
                sample(3, 1, 0.00, "p2"),
                sample(4, 2, 0.04, "p1"),
                sample(5, 5, 0.16, "p1"),
            ],
        )
        .unwrap();
    let dataset = registry.dataset();

    let joined = dataset.tracking_for_game("m1").unwrap();
    assert_eq!(joined.len(), 4);
    assert!(joined.iter().all(|r| r.sample.player_id != "ball"));
    assert_eq!(joined[0].jersey_number, Some(9));

    let window = dataset
        .tracking_window("m1", GameClock::from_millis(0), GameClock::from_millis(160), Some(1))
        .unwrap();
    assert_eq!(window.rows.len(), 4);
    assert_eq!(window.frame_gaps, 0);
    // ball sample kept, with no player data
    assert_eq!(window.rows[0].player_name, None);

    let wide = dataset
        .tracking_window("m1", GameClock::from_millis(0), GameClock::from_millis(1000), None)
        .unwrap();
    assert_eq!(wide.frame_gaps, 1);

    let split = dataset.split_tracking("m1").unwrap().unwrap();
    assert_eq!(split.ball.len(), 1);
    assert_eq!(split.home.len(), 3);
    assert_eq!(split.away.len(), 1);
    assert!(dataset.split_tracking("m9").unwrap().is_none());
}

#[test]
fn test_typed_lookup_and_positions() {
    let mut registry = fixture();
    for (ts, pos) in [(2700.0, "CB"), (0.0, "LB")] {
        registry
            .load(
                PLAYER_POSITION,
                rec(json!({
                    "match_id": "m1", "player_id": "p1", "timestamp": ts,
                    "period_id": 1, "position": pos
                })),
            )
            .unwrap();
    }
    let dataset = registry.dataset();

    let m: Match = dataset.get(&Key::single("m1")).unwrap().unwrap();
    assert_eq!(m.home_score, Some(2));
    assert!(dataset.get::<Match>(&Key::single("m2")).unwrap().is_none());

    let positions = dataset.positions_for_player("m1", "p1").unwrap();
    let codes: Vec<&str> = positions.iter().map(|p| p.position.as_str()).collect();
    assert_eq!(codes, vec!["LB", "CB"]);
    assert!(positions[1]
        .position_type()
        .is_some_and(|p| p.line() == crate::position::PositionType::Defender));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        /// Property: one stored record per distinct key, first write wins
        #[test]
        fn prop_team_keys_unique(
            teams in proptest::collection::vec(("[a-e]{1,2}", "[A-Z][a-z]{0,8}"), 1..30)
        ) {
            let mut registry = SchemaRegistry::with_catalog(ValidatorConfig::default()).unwrap();
            let report = registry
                .load_batch(
                    TEAM,
                    teams
                        .iter()
                        .map(|(id, name)| rec(json!({"team_id": id, "team_name": name}))),
                )
                .unwrap();

            let distinct: BTreeSet<&String> = teams.iter().map(|(id, _)| id).collect();
            prop_assert_eq!(registry.records(TEAM).len(), distinct.len());
            prop_assert_eq!(report.total(), teams.len());

            for id in distinct {
                let first = teams.iter().find(|(t, _)| t == id).map(|(_, n)| n).unwrap();
                let stored = registry.get(TEAM, &Key::single(id.as_str())).unwrap();
                prop_assert_eq!(&stored["team_name"], &json!(first));
            }
        }

        /// Property: every accepted record validates again unchanged
        #[test]
        fn prop_accepted_records_revalidate(
            frames in proptest::collection::vec((0i64..500, 0.0f64..105.0, 0.0f64..68.0), 1..20)
        ) {
            let mut registry = fixture_with(ValidatorConfig::strict());
            for (i, (frame, x, y)) in frames.iter().enumerate() {
                let mut s = sample(i as i64, *frame, *frame as f64 * 0.04, "p1");
                s.insert("x".to_string(), json!(x));
                s.insert("y".to_string(), json!(y));
                registry.load(PLAYER_TRACKING, s).unwrap();
            }

            for record in registry.records(PLAYER_TRACKING).to_vec() {
                prop_assert_eq!(registry.validate(PLAYER_TRACKING, record.clone()).unwrap(), record);
            }
        }
    }
}
