#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_values() {
    let cfg = ViewConfig::default();
    assert_eq!(cfg.surface_width, 800.0);
    assert_eq!(cfg.surface_height, 600.0);
    assert_eq!(cfg.margin, 50.0);
    assert_eq!(cfg.initial_scale, 100.0);
    assert_eq!(cfg.default_ticks, 5);
}

#[test]
fn from_json_empty_object_is_default() {
    let cfg = ViewConfig::from_json("{}").unwrap();
    assert_eq!(cfg, ViewConfig::default());
}

#[test]
fn from_json_partial_overrides() {
    let cfg = ViewConfig::from_json(r#"{"initial_scale": 40, "margin": 30}"#).unwrap();
    assert_eq!(cfg.initial_scale, 40.0);
    assert_eq!(cfg.margin, 30.0);
    assert_eq!(cfg.surface_width, 800.0);
}

#[test]
fn from_json_rejects_wrong_type() {
    assert!(ViewConfig::from_json(r#"{"margin": "wide"}"#).is_err());
}
