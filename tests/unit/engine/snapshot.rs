use super::*;
use crate::animation::ease::Ease;
use crate::foundation::core::{PerformerId, Point};

const PROJECT: &str = r#"{
    "beats": [0.0, 0.5, 1.0, 1.5, 2.0, 2.5],
    "groups": [
        { "startBeat": 0, "length": 3 },
        { "startBeat": 3, "length": 3, "transitionLength": 1 }
    ],
    "formations": [
        { "keyframes": { "a": { "path": [{ "x": 5, "y": 5 }, { "x": 15, "y": 5 }] } } },
        { "defaultEase": "easeIn", "keyframes": {} }
    ],
    "performers": [
        { "id": "a", "initialPosition": { "x": 0, "y": 0 } },
        { "id": "b", "name": "Bea", "shape": "square", "initialPosition": { "x": 1, "y": 2 } }
    ]
}"#;

#[test]
fn loads_and_resolves_a_project() {
    let choreo = Choreography::from_json_str(PROJECT).unwrap();
    assert_eq!(choreo.grid().len(), 6);
    assert_eq!(choreo.store().groups().len(), 2);
    assert_eq!(choreo.settings(), EngineSettings::default());

    let a = PerformerId::new("a");
    assert_eq!(
        choreo.store().actual_end(&a, 0),
        Some(Point::new(10.0, 0.0))
    );
    let engine = choreo.engine();
    assert_eq!(engine.resolve_position(&a, 2.0), Some(Point::new(10.0, 0.0)));
    assert_eq!(
        engine.resolve_position(&PerformerId::new("b"), 0.5),
        Some(Point::new(1.0, 2.0))
    );
    assert_eq!(
        choreo.store().formation(1).and_then(|f| f.default_ease),
        Some(Ease::InQuad)
    );
}

#[test]
fn missing_formations_are_padded() {
    let json = r#"{
        "beats": [0.0, 1.0, 2.0],
        "groups": [{ "startBeat": 0, "length": 1 }, { "startBeat": 1, "length": 2 }],
        "performers": []
    }"#;
    let choreo = Choreography::from_json_str(json).unwrap();
    assert_eq!(choreo.store().formations().len(), 2);
}

#[test]
fn mismatched_formations_are_rejected() {
    let json = r#"{
        "beats": [0.0, 1.0],
        "groups": [{ "startBeat": 0, "length": 1 }, { "startBeat": 1, "length": 1 }],
        "formations": [{}]
    }"#;
    let err = Choreography::from_json_str(json).unwrap_err();
    assert!(matches!(err, BlockingError::Validation(_)), "{err}");
}

#[test]
fn decreasing_beats_are_rejected() {
    let json = r#"{ "beats": [0.0, 2.0, 1.0] }"#;
    assert!(Choreography::from_json_str(json).is_err());
}

#[test]
fn negative_epsilon_is_rejected() {
    let json = r#"{ "settings": { "transitionEpsilon": -1.0 } }"#;
    let err = Choreography::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("transitionEpsilon"));
}

#[test]
fn malformed_json_maps_to_serde_error() {
    let err = ChoreographySnapshot::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, BlockingError::Serde(_)));
}

#[test]
fn snapshot_survives_a_save_load_cycle() {
    let choreo = Choreography::from_json_str(PROJECT).unwrap();
    let json = choreo.to_snapshot().to_json_pretty().unwrap();
    let reloaded = Choreography::from_json_str(&json).unwrap();
    assert_eq!(reloaded.to_snapshot(), choreo.to_snapshot());
}

#[test]
fn edits_through_store_mut_reach_the_engine() {
    let mut choreo = Choreography::from_json_str(PROJECT).unwrap();
    let a = PerformerId::new("a");
    choreo.store_mut().clear_path(0, &a).unwrap();
    assert_eq!(
        choreo.engine().resolve_position(&a, 2.0),
        Some(Point::new(0.0, 0.0))
    );
}
