//! Link topology scenarios

use crate::init_tracing;
use photon::{Graph, PulseEvent, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn three_way_mirror() {
    init_tracing();
    let mut g = Graph::new();
    let a = g.create_node();
    let b = g.create_node();
    let c = g.create_node();
    g.connect_mirror(a, b).unwrap();
    g.connect_mirror(b, c).unwrap();
    g.connect_mirror(a, c).unwrap();

    g.commit(a, "X").unwrap();
    assert_eq!(g.read(b).unwrap(), &Value::from("X"));
    assert_eq!(g.read(c).unwrap(), &Value::from("X"));
}

#[test]
fn gate_from_chain_flows_upstream_to_downstream() {
    let mut g = Graph::new();
    let source = g.create_node_with("source");
    let middle = g.create_node_with("middle");
    let target = g.create_node_with("target");
    g.node_mut(source)
        .unwrap()
        .gate_from(middle)
        .unwrap()
        .gate_from(target)
        .unwrap();

    g.commit(target, "TARGET_CHANGED").unwrap();
    assert_eq!(g.read(middle).unwrap(), &Value::from("TARGET_CHANGED"));
    assert_eq!(g.read(source).unwrap(), &Value::from("TARGET_CHANGED"));

    g.commit(middle, "MIDDLE_CHANGED").unwrap();
    assert_eq!(g.read(source).unwrap(), &Value::from("MIDDLE_CHANGED"));
    assert_eq!(g.read(target).unwrap(), &Value::from("TARGET_CHANGED"));
}

#[test]
fn gate_into_is_one_way() {
    let mut g = Graph::new();
    let a = g.create_node_with("a");
    let b = g.create_node_with("b");
    g.gate_into(a, b).unwrap();

    g.commit(b, "from b").unwrap();
    assert_eq!(g.read(a).unwrap(), &Value::from("a"));
    g.commit(a, "from a").unwrap();
    assert_eq!(g.read(b).unwrap(), &Value::from("from a"));
}

#[test]
fn diode_ring_terminates() {
    let mut g = Graph::new();
    let a = g.create_node();
    let b = g.create_node();
    let c = g.create_node();
    g.node_mut(a).unwrap().gate_into(b).unwrap();
    g.gate_into(b, c).unwrap();
    g.gate_into(c, a).unwrap();

    let report = g.commit(a, "CIRCULAR_UPDATE").unwrap();
    assert_eq!(report.written, vec![b, c]);
    for n in [a, b, c] {
        assert_eq!(g.read(n).unwrap(), &Value::from("CIRCULAR_UPDATE"));
    }
}

#[test]
fn pulse_notifies_without_writing() {
    let mut g = Graph::new();
    let a = g.create_node();
    let b = g.create_node_with("quiet");
    g.pulse_to(a, b).unwrap();

    let seen: Rc<RefCell<Vec<PulseEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let sub = g
        .subscribe(b, move |event| sink.borrow_mut().push(event.clone()))
        .unwrap();

    g.commit(a, 1i64).unwrap();
    g.commit(a, 2i64).unwrap();
    assert_eq!(g.read(b).unwrap(), &Value::from("quiet"));
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[1].value, Value::Int(2));

    assert!(g.unsubscribe(b, sub));
    g.commit(a, 3i64).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn disconnect_stops_propagation() {
    let mut g = Graph::new();
    let a = g.create_node();
    let b = g.create_node();
    g.connect_mirror(a, b).unwrap();
    assert_eq!(g.disconnect(a, b).unwrap(), 2);

    g.commit(a, "alone").unwrap();
    assert_eq!(g.read(b).unwrap(), &Value::Null);
}
