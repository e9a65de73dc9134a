//! Configuration loading and validation.

use rtlblocks_core::blocks::arbiter::ArbiterKind;
use rtlblocks_core::common::error::ConfigError;
use rtlblocks_core::config::{Config, FifoConfig, PipelineConfig};

#[test]
fn defaults_are_valid() {
    let cfg = Config::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.fifo.depth, 2);
    assert_eq!(cfg.fifo.width, 8);
    assert_eq!(cfg.fifo.afull_threshold(), 1);
    assert_eq!(cfg.fifo.aempty_threshold(), 1);
    assert_eq!(cfg.pipeline.num_stages, 1);
    assert_eq!(cfg.arbiter.kind, ArbiterKind::Priority);
}

#[test]
fn thresholds_default_to_half_depth() {
    let cfg = FifoConfig::new(9, 8);
    assert_eq!(cfg.afull_threshold(), 4);
    assert_eq!(cfg.aempty_threshold(), 4);

    let cfg = FifoConfig {
        afull_th: Some(1),
        aempty_th: Some(7),
        ..FifoConfig::new(9, 8)
    };
    assert_eq!(cfg.afull_threshold(), 1);
    assert_eq!(cfg.aempty_threshold(), 7);
}

#[test]
fn impossible_geometry_is_rejected() {
    assert!(matches!(
        FifoConfig::new(0, 8).validate(),
        Err(ConfigError::ZeroDepth)
    ));
    assert!(matches!(
        FifoConfig::new(4, 65).validate(),
        Err(ConfigError::WidthTooWide { width: 65 })
    ));
    assert!(matches!(
        PipelineConfig { num_stages: 0 }.validate(),
        Err(ConfigError::ZeroStages)
    ));
}

#[test]
fn zero_width_is_a_token_fifo() {
    FifoConfig::new(4, 0).validate().unwrap();
}

#[test]
fn loads_from_json() {
    let cfg = Config::from_json(
        r#"{
            "fifo": { "depth": 16, "width": 32, "afull_th": 2 },
            "pipeline": { "num_stages": 5 },
            "arbiter": { "kind": "roundrobin", "requests": 4 }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.fifo.depth, 16);
    assert_eq!(cfg.fifo.afull_threshold(), 2);
    assert_eq!(cfg.fifo.aempty_threshold(), 8);
    assert_eq!(cfg.pipeline.num_stages, 5);
    assert_eq!(cfg.arbiter.kind, ArbiterKind::RoundRobin);
    assert_eq!(cfg.arbiter.requests, 4);
}

#[test]
fn json_with_bad_geometry_is_rejected() {
    let err = Config::from_json(r#"{ "fifo": { "depth": 0 } }"#);
    assert!(matches!(err, Err(ConfigError::ZeroDepth)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json("{ not json");
    assert!(matches!(err, Err(ConfigError::Parse(_))));

    let err = Config::from_json(r#"{ "fifo": { "dpeth": 4 } }"#);
    assert!(matches!(err, Err(ConfigError::Parse(_))), "unknown fields rejected");
}

#[test]
fn unknown_arbiter_kind_is_rejected_everywhere() {
    let err = Config::from_json(r#"{ "arbiter": { "kind": "weighted" } }"#);
    assert!(matches!(err, Err(ConfigError::Parse(_))));

    let err = "weighted".parse::<ArbiterKind>();
    assert!(matches!(err, Err(ConfigError::UnknownArbiter { name }) if name == "weighted"));
}
