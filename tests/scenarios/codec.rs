//! Emit/absorb scenarios

use crate::init_tracing;
use photon::{absorb, absorb_all, emit, emit_batch, Error, Graph, Member, Photon, Value};

fn build_profile(g: &mut Graph) -> photon::ContainerId {
    let profile = g.create_assembly();
    let name = g.create_node_with("Ada");
    let display = g.create_node_with("Ada");
    let tags = g.create_cluster();
    let tag = g.create_node_with(Value::List(vec!["x".into(), 1i64.into()]));
    g.set_field(profile, "name", name).unwrap();
    g.set_field(profile, "display", display).unwrap();
    g.set_field(profile, "tags", tags).unwrap();
    g.push(tags, tag).unwrap();
    g.gate_into(name, display).unwrap();
    profile
}

#[test]
fn composed_graph_round_trips() {
    init_tracing();
    let mut g = Graph::new();
    let profile = build_profile(&mut g);
    let text = emit(&g, profile).unwrap();
    assert_eq!(
        text,
        "A3t4:nameNt3:Adat7:displayNt3:Adat4:tagsC1Nl2Nt1:xNi1~1 0>1G+"
    );

    let mut other = Graph::new();
    let (copy, cursor) = absorb(&mut other, &text).unwrap();
    assert_eq!(cursor, text.len());
    assert_eq!(
        Photon::capture(&other, copy).unwrap(),
        Photon::capture(&g, profile).unwrap()
    );

    let asm = copy.as_container().unwrap();
    let name = other.field(asm, "name").unwrap().unwrap().as_node().unwrap();
    let display = other.field(asm, "display").unwrap().unwrap().as_node().unwrap();
    other.commit(name, "Grace").unwrap();
    assert_eq!(other.read(display).unwrap(), &Value::from("Grace"));
}

#[test]
fn batch_transmission() {
    let mut g = Graph::new();
    let first = build_profile(&mut g);
    let second = g.create_node_with(2.5);
    let text = emit_batch(&g, &[Member::Container(first), Member::Node(second)]).unwrap();

    let mut other = Graph::new();
    let roots = absorb_all(&mut other, &text).unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(
        other.read(roots[1].as_node().unwrap()).unwrap(),
        &Value::Float(2.5)
    );
    assert_eq!(other.node_count(), 4);
}

#[test]
fn malformed_stream_leaves_graph_untouched() {
    let mut g = Graph::new();
    let existing = g.create_node();
    let err = absorb(&mut g, "A1t4:nameNz~1 0>5M").unwrap_err();
    assert_eq!(
        err,
        Error::UnknownLinkTarget {
            index: 5,
            node_count: 1
        }
    );
    assert_eq!(g.node_count(), 1);
    assert!(g.contains_node(existing));
}
