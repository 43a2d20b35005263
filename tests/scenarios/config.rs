//! TOML-configured policies

use photon::{Graph, GraphConfig, HistoryPolicy, Limits, RevertPolicy, Value};

#[test]
fn default_toml_parses_to_defaults() {
    let config = GraphConfig::from_toml_str(GraphConfig::default_toml()).unwrap();
    assert_eq!(config, GraphConfig::default());
}

#[test]
fn propagated_revert_rolls_back_peers() {
    let config = GraphConfig::from_toml_str(
        r#"
        [propagation]
        revert = "propagate"
        "#,
    )
    .unwrap();
    assert_eq!(config.propagation.revert, RevertPolicy::Propagate);

    let mut g = Graph::with_config(config);
    let a = g.create_node_with("a0");
    let b = g.create_node_with("b0");
    g.connect_mirror(a, b).unwrap();
    g.commit(a, "shared").unwrap();

    let report = g.revert(a).unwrap();
    assert_eq!(report.written, vec![b]);
    assert_eq!(g.read(a).unwrap(), &Value::from("a0"));
    assert_eq!(g.read(b).unwrap(), &Value::from("b0"));
}

#[test]
fn origin_only_history() {
    let config = GraphConfig::from_toml_str(
        r#"
        [history]
        policy = "origin_only"
        "#,
    )
    .unwrap();
    assert_eq!(config.history.policy, HistoryPolicy::OriginOnly);

    let mut g = Graph::with_config(config);
    let a = g.create_node();
    let b = g.create_node();
    g.gate_into(a, b).unwrap();
    g.commit(a, 1i64).unwrap();
    assert_eq!(g.history_depth(a).unwrap(), 1);
    assert_eq!(g.history_depth(b).unwrap(), 0);
}

#[test]
fn limits_from_toml_bound_absorb() {
    let config = GraphConfig::from_toml_str(
        r#"
        [limits]
        max_text_bytes = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.limits.max_text_bytes, 4);
    assert_eq!(config.limits.max_count, Limits::default().max_count);

    let mut g = Graph::with_config(config);
    assert!(matches!(
        photon::absorb(&mut g, "Nt5:hello~0"),
        Err(photon::Error::LimitExceeded(_))
    ));
}

#[test]
fn unknown_policy_is_invalid_config() {
    assert!(matches!(
        GraphConfig::from_toml_str("[history]\npolicy = \"sometimes\"\n"),
        Err(photon::Error::InvalidConfig(_))
    ));
}
