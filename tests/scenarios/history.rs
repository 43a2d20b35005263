//! Commit and revert scenarios

use crate::init_tracing;
use photon::{Error, Graph, GraphConfig, Value};

#[test]
fn commit_then_revert_restores_original() {
    init_tracing();
    let mut g = Graph::new();
    let node = g.create_node_with("Original Value");

    g.commit(node, "Changed Value").unwrap();
    assert_eq!(g.read(node).unwrap(), &Value::from("Changed Value"));

    g.revert(node).unwrap();
    assert_eq!(g.read(node).unwrap(), &Value::from("Original Value"));
}

#[test]
fn revert_on_empty_history_leaves_value() {
    let mut g = Graph::new();
    let node = g.create_node_with(7i64);
    assert_eq!(g.revert(node).unwrap_err(), Error::EmptyHistory { node });
    assert_eq!(g.read(node).unwrap(), &Value::Int(7));
}

#[test]
fn n_commits_n_reverts_then_empty() {
    let mut g = Graph::new();
    let node = g.create_node();
    let n = 10;
    for i in 0..n {
        g.commit(node, format!("v{}", i)).unwrap();
    }
    for _ in 0..n {
        g.revert(node).unwrap();
    }
    assert_eq!(g.read(node).unwrap(), &Value::Null);
    assert!(g.revert(node).unwrap_err().is_non_fatal());
}

#[test]
fn fluent_handle_chain() {
    let mut g = Graph::new();
    let node = g.create_node_with("Original Value");
    let value = g
        .node_mut(node)
        .unwrap()
        .commit("Changed Value")
        .unwrap()
        .revert()
        .unwrap()
        .read()
        .clone();
    assert_eq!(value, Value::from("Original Value"));
}

#[test]
fn history_limit_drops_oldest() {
    let mut g = Graph::with_config(GraphConfig::default().with_history_limit(2));
    let node = g.create_node_with("a");
    for v in ["b", "c", "d"] {
        g.commit(node, v).unwrap();
    }
    let kept: Vec<&Value> = g.history(node).unwrap().iter().collect();
    assert_eq!(kept, vec![&Value::from("b"), &Value::from("c")]);

    g.revert(node).unwrap();
    g.revert(node).unwrap();
    assert_eq!(g.read(node).unwrap(), &Value::from("b"));
    assert!(g.revert(node).is_err());
}

#[test]
fn clear_history_forgets_prior_values() {
    let mut g = Graph::new();
    let node = g.create_node_with(1i64);
    g.commit(node, 2i64).unwrap();
    g.clear_history(node).unwrap();
    assert_eq!(g.history_depth(node).unwrap(), 0);
    assert_eq!(g.read(node).unwrap(), &Value::Int(2));
}
