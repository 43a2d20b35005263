//! Graph-level emit and absorb
//!
//! These pair a [`Photon`] snapshot with its text form. Absorb never leaves a
//! partial graph behind: input is parsed and validated in full before the
//! first node is allocated.

use crate::decode::at_end;
use crate::photon::Photon;
use photon_core::{Member, Result};
use photon_graph::Graph;
use tracing::debug;

/// Encode the subgraph rooted at `root`
pub fn emit(graph: &Graph, root: impl Into<Member>) -> Result<String> {
    let root = root.into();
    let text = Photon::capture(graph, root)?.encode()?;
    debug!(target: "photon::codec", root = %root, bytes = text.len(), "Emitted photon");
    Ok(text)
}

/// Encode several roots back to back into one buffer
pub fn emit_batch(graph: &Graph, roots: &[Member]) -> Result<String> {
    let mut out = String::new();
    for root in roots {
        Photon::capture(graph, *root)?.encode_into(&mut out)?;
    }
    debug!(
        target: "photon::codec",
        photons = roots.len(),
        bytes = out.len(),
        "Emitted photon batch"
    );
    Ok(out)
}

/// Decode one photon from the start of `input` into fresh graph members
///
/// Returns the new root and the byte offset just past the photon, so a
/// caller holding a batch can continue from there with [`absorb_at`].
pub fn absorb(graph: &mut Graph, input: &str) -> Result<(Member, usize)> {
    absorb_at(graph, input, 0)
}

/// Decode one photon starting at byte `offset` of `input`
pub fn absorb_at(graph: &mut Graph, input: &str, offset: usize) -> Result<(Member, usize)> {
    let (photon, cursor) = Photon::decode_at(input, offset, &graph.config().limits)?;
    let root = photon.materialize(graph)?;
    debug!(
        target: "photon::codec",
        root = %root,
        offset,
        cursor,
        "Absorbed photon"
    );
    Ok((root, cursor))
}

/// Decode every photon in `input`
///
/// All photons are parsed before any is materialized; a single malformed
/// photon fails the whole batch and leaves the graph untouched. Trailing
/// whitespace is allowed.
pub fn absorb_all(graph: &mut Graph, input: &str) -> Result<Vec<Member>> {
    let limits = graph.config().limits.clone();
    let mut photons = Vec::new();
    let mut cursor = 0;
    while !at_end(input, cursor) {
        let (photon, next) = Photon::decode_at(input, cursor, &limits)?;
        photons.push(photon);
        cursor = next;
    }

    let roots = photons
        .iter()
        .map(|photon| photon.materialize(graph))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        target: "photon::codec",
        photons = roots.len(),
        bytes = input.len(),
        "Absorbed photon batch"
    );
    Ok(roots)
}
