//! Structural snapshot of a graph
//!
//! A `Photon` is the intermediate tree between a live [`Graph`] and its
//! textual stream. Nodes are numbered by pre-order position, starting at 0,
//! and the edge table refers to those positions instead of arena handles, so
//! a photon is self-contained and can be materialized into any graph.
//!
//! Two graphs are structurally equal iff their captured photons are equal.

use photon_core::{Error, LinkKind, Limits, Member, NodeId, Result, Value};
use photon_graph::{ContainerKind, Graph};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// One position in the photon tree
#[derive(Debug, Clone, PartialEq)]
pub enum PhotonGraph {
    /// A node and its current value
    Node(Value),
    /// Ordered members of a cluster
    Cluster(Vec<PhotonGraph>),
    /// Named members of an assembly, in insertion order
    Assembly(Vec<(String, PhotonGraph)>),
}

impl PhotonGraph {
    /// Number of nodes at or below this position
    pub fn node_count(&self) -> usize {
        match self {
            PhotonGraph::Node(_) => 1,
            PhotonGraph::Cluster(items) => items.iter().map(PhotonGraph::node_count).sum(),
            PhotonGraph::Assembly(fields) => fields.iter().map(|(_, g)| g.node_count()).sum(),
        }
    }
}

/// Edge between two node positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotonEdge {
    /// Pre-order position of the source node
    pub source: usize,
    /// Pre-order position of the target node
    pub target: usize,
    /// Propagation kind
    pub kind: LinkKind,
}

/// A captured graph together with the edges internal to it
#[derive(Debug, Clone, PartialEq)]
pub struct Photon {
    /// Root of the tree
    pub root: PhotonGraph,
    /// Edges whose endpoints both lie in the tree, in creation order
    pub edges: Vec<PhotonEdge>,
}

impl Photon {
    /// Snapshot the subgraph rooted at `root`
    ///
    /// Fails with `LimitExceeded` when containers or values nest deeper than
    /// the graph's configured limits, so that everything captured can be
    /// absorbed again under the same limits.
    pub fn capture(graph: &Graph, root: impl Into<Member>) -> Result<Photon> {
        let limits = &graph.config().limits;
        let mut positions = FxHashMap::default();
        let tree = capture_member(graph, root.into(), 0, limits, &mut positions)?;

        let edges: Vec<PhotonEdge> = graph
            .edges()
            .filter_map(|edge| {
                let source = *positions.get(&edge.source)?;
                let target = *positions.get(&edge.target)?;
                Some(PhotonEdge {
                    source,
                    target,
                    kind: edge.kind,
                })
            })
            .collect();

        debug!(
            target: "photon::codec",
            nodes = positions.len(),
            edges = edges.len(),
            "Captured photon"
        );
        Ok(Photon { root: tree, edges })
    }

    /// Number of node positions
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Check structural constraints without touching a graph
    ///
    /// Photons produced by the decoder already satisfy these; hand-built ones
    /// may not.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        validate_tree(&self.root, 0, limits)?;
        limits.check_count(self.edges.len())?;
        let node_count = self.node_count();
        for edge in &self.edges {
            for index in [edge.source, edge.target] {
                if index >= node_count {
                    return Err(Error::UnknownLinkTarget { index, node_count });
                }
            }
        }
        Ok(())
    }

    /// Allocate fresh nodes and containers matching the tree, then replay the edges
    ///
    /// Validation runs first, so on error the graph is left untouched.
    pub fn materialize(&self, graph: &mut Graph) -> Result<Member> {
        self.validate(&graph.config().limits)?;

        let mut nodes = Vec::with_capacity(self.node_count());
        let root = materialize_tree(graph, &self.root, &mut nodes)?;
        for edge in &self.edges {
            graph.add_edge(nodes[edge.source], nodes[edge.target], edge.kind)?;
        }

        debug!(
            target: "photon::codec",
            root = %root,
            nodes = nodes.len(),
            edges = self.edges.len(),
            "Materialized photon"
        );
        Ok(root)
    }
}

fn capture_member(
    graph: &Graph,
    member: Member,
    depth: usize,
    limits: &Limits,
    positions: &mut FxHashMap<NodeId, usize>,
) -> Result<PhotonGraph> {
    limits.check_depth(depth)?;
    match member {
        Member::Node(id) => {
            let value = graph.read(id)?;
            limits.validate_value(value, depth)?;
            let position = positions.len();
            positions.insert(id, position);
            Ok(PhotonGraph::Node(value.clone()))
        }
        Member::Container(id) => {
            let kind = graph.container_kind(id)?;
            let members = graph.members(id)?;
            match kind {
                ContainerKind::Cluster => {
                    let mut items = Vec::with_capacity(members.len());
                    for (_, child) in members {
                        items.push(capture_member(graph, child, depth + 1, limits, positions)?);
                    }
                    Ok(PhotonGraph::Cluster(items))
                }
                ContainerKind::Assembly => {
                    let mut fields = Vec::with_capacity(members.len());
                    for (name, child) in members {
                        let name = name.unwrap_or_default().to_string();
                        let sub = capture_member(graph, child, depth + 1, limits, positions)?;
                        fields.push((name, sub));
                    }
                    Ok(PhotonGraph::Assembly(fields))
                }
            }
        }
    }
}

fn validate_tree(tree: &PhotonGraph, depth: usize, limits: &Limits) -> Result<()> {
    limits.check_depth(depth)?;
    match tree {
        PhotonGraph::Node(value) => limits.validate_value(value, depth)?,
        PhotonGraph::Cluster(items) => {
            limits.check_count(items.len())?;
            for item in items {
                validate_tree(item, depth + 1, limits)?;
            }
        }
        PhotonGraph::Assembly(fields) => {
            limits.check_count(fields.len())?;
            let mut seen = FxHashSet::default();
            for (name, sub) in fields {
                limits.check_text(name.len())?;
                if !seen.insert(name.as_str()) {
                    return Err(Error::DuplicateField {
                        field: name.clone(),
                    });
                }
                validate_tree(sub, depth + 1, limits)?;
            }
        }
    }
    Ok(())
}

fn materialize_tree(
    graph: &mut Graph,
    tree: &PhotonGraph,
    nodes: &mut Vec<NodeId>,
) -> Result<Member> {
    match tree {
        PhotonGraph::Node(value) => {
            let id = graph.create_node_with(value.clone());
            nodes.push(id);
            Ok(Member::Node(id))
        }
        PhotonGraph::Cluster(items) => {
            let cluster = graph.create_cluster();
            for item in items {
                let child = materialize_tree(graph, item, nodes)?;
                graph.push(cluster, child)?;
            }
            Ok(Member::Container(cluster))
        }
        PhotonGraph::Assembly(fields) => {
            let assembly = graph.create_assembly();
            for (name, sub) in fields {
                let child = materialize_tree(graph, sub, nodes)?;
                graph.set_field(assembly, name.as_str(), child)?;
            }
            Ok(Member::Container(assembly))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::{GateDirection, LimitError};

    #[test]
    fn test_capture_numbers_nodes_in_preorder() {
        let mut g = Graph::new();
        let root = g.create_cluster();
        let a = g.create_node_with(1i64);
        let inner = g.create_assembly();
        let b = g.create_node_with("b");
        let c = g.create_node_with(true);
        g.push(root, a).unwrap();
        g.push(root, inner).unwrap();
        g.set_field(inner, "b", b).unwrap();
        g.push(root, c).unwrap();
        g.gate_into(c, a).unwrap();
        g.connect_mirror(a, b).unwrap();

        let photon = Photon::capture(&g, root).unwrap();
        assert_eq!(photon.node_count(), 3);
        assert_eq!(
            photon.root,
            PhotonGraph::Cluster(vec![
                PhotonGraph::Node(Value::Int(1)),
                PhotonGraph::Assembly(vec![("b".to_string(), PhotonGraph::Node("b".into()))]),
                PhotonGraph::Node(Value::Bool(true)),
            ])
        );
        // creation order: c>a first, then the mirror pair
        assert_eq!(
            photon.edges,
            vec![
                PhotonEdge {
                    source: 2,
                    target: 0,
                    kind: LinkKind::Gate(GateDirection::Forward)
                },
                PhotonEdge {
                    source: 0,
                    target: 1,
                    kind: LinkKind::Mirror
                },
                PhotonEdge {
                    source: 1,
                    target: 0,
                    kind: LinkKind::Mirror
                },
            ]
        );
    }

    #[test]
    fn test_capture_drops_edges_leaving_the_subgraph() {
        let mut g = Graph::new();
        let root = g.create_cluster();
        let inside = g.create_node();
        let outside = g.create_node();
        g.push(root, inside).unwrap();
        g.gate_into(inside, outside).unwrap();
        g.pulse_to(inside, inside).unwrap();

        let photon = Photon::capture(&g, root).unwrap();
        assert_eq!(
            photon.edges,
            vec![PhotonEdge {
                source: 0,
                target: 0,
                kind: LinkKind::Pulse
            }]
        );
    }

    #[test]
    fn test_capture_single_node() {
        let mut g = Graph::new();
        let n = g.create_node_with(2.5);
        let photon = Photon::capture(&g, n).unwrap();
        assert_eq!(photon.root, PhotonGraph::Node(Value::Float(2.5)));
        assert!(photon.edges.is_empty());
    }

    #[test]
    fn test_capture_respects_depth_limit() {
        let config = photon_graph::GraphConfig::default().with_limits(Limits::with_small_limits());
        let mut g = Graph::with_config(config);
        let mut outer = g.create_cluster();
        let top = outer;
        for _ in 0..5 {
            let next = g.create_cluster();
            g.push(outer, next).unwrap();
            outer = next;
        }
        assert!(matches!(
            Photon::capture(&g, top),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_capture_counts_value_levels_like_decode() {
        let config = photon_graph::GraphConfig::default().with_limits(Limits::with_small_limits());
        let mut g = Graph::with_config(config);
        let top = g.create_cluster();
        let mut outer = top;
        for _ in 0..3 {
            let next = g.create_cluster();
            g.push(outer, next).unwrap();
            outer = next;
        }
        // node sits at the deepest allowed level
        let leaf = g.create_node_with(Value::List(vec![]));
        g.push(outer, leaf).unwrap();

        let photon = Photon::capture(&g, top).unwrap();
        let text = photon.encode().unwrap();
        let (decoded, _) = Photon::decode(&text, &Limits::with_small_limits()).unwrap();
        assert_eq!(decoded, photon);

        g.commit(leaf, Value::List(vec![Value::List(vec![])])).unwrap();
        assert!(matches!(
            Photon::capture(&g, top),
            Err(Error::LimitExceeded(LimitError::NestingTooDeep { actual: 5, max: 4 }))
        ));
    }

    #[test]
    fn test_materialize_rebuilds_structure() {
        let mut src = Graph::new();
        let root = src.create_assembly();
        let x = src.create_node_with("x");
        let y = src.create_node_with("y");
        src.set_field(root, "x", x).unwrap();
        src.set_field(root, "y", y).unwrap();
        src.gate_from(x, y).unwrap();
        let photon = Photon::capture(&src, root).unwrap();

        let mut dst = Graph::new();
        let rebuilt = photon.materialize(&mut dst).unwrap();
        assert_eq!(Photon::capture(&dst, rebuilt).unwrap(), photon);

        let rx = dst.field(rebuilt.as_container().unwrap(), "x").unwrap().unwrap();
        let ry = dst.field(rebuilt.as_container().unwrap(), "y").unwrap().unwrap();
        dst.commit(ry.as_node().unwrap(), "flow").unwrap();
        assert_eq!(dst.read(rx.as_node().unwrap()).unwrap(), &Value::from("flow"));
    }

    #[test]
    fn test_materialize_rejects_out_of_range_edge_without_side_effects() {
        let photon = Photon {
            root: PhotonGraph::Cluster(vec![PhotonGraph::Node(Value::Null)]),
            edges: vec![PhotonEdge {
                source: 0,
                target: 3,
                kind: LinkKind::Mirror,
            }],
        };
        let mut g = Graph::new();
        assert_eq!(
            photon.materialize(&mut g).unwrap_err(),
            Error::UnknownLinkTarget {
                index: 3,
                node_count: 1
            }
        );
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.container_count(), 0);
    }

    #[test]
    fn test_materialize_rejects_duplicate_fields() {
        let photon = Photon {
            root: PhotonGraph::Assembly(vec![
                ("k".to_string(), PhotonGraph::Node(Value::Null)),
                ("k".to_string(), PhotonGraph::Node(Value::Null)),
            ]),
            edges: vec![],
        };
        let mut g = Graph::new();
        assert!(matches!(
            photon.materialize(&mut g),
            Err(Error::DuplicateField { .. })
        ));
        assert_eq!(g.node_count(), 0);
    }
}
