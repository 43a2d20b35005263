//! Photon → PhotonStream text
//!
//! Output is compact: tags and payloads are written back to back. Every token
//! is self-delimiting (fixed tag, length prefix or the next tag), so
//! concatenated photons need no separator. The one exception is the edge
//! count, which is followed by a space when entries follow, since the first
//! source position is also a digit run.
//!
//! # Token layout
//!
//! ```text
//! N<value>            node
//! C<count><graph>*    cluster
//! A<count>(t<len>:<name><graph>)*
//! ~<count> (<src>><dst><kind>)*
//! ```
//!
//! List items and map values sit in graph position, so each is written as a
//! node production (`N<value>`). They are not numbered and take no part in the
//! edge table.

use crate::photon::{Photon, PhotonGraph};
use photon_core::{Error, Result, Value, ValueTag};
use std::fmt::Write;

pub(crate) const NODE: char = 'N';
pub(crate) const CLUSTER: char = 'C';
pub(crate) const ASSEMBLY: char = 'A';
pub(crate) const EDGES: char = '~';
pub(crate) const ARROW: char = '>';
pub(crate) const TEXT_SEP: char = ':';

impl Photon {
    /// Render the photon as a PhotonStream
    ///
    /// Fails with `UnsupportedValueType` for NaN or infinite floats.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Append the stream to `out`; on error `out` may hold a partial photon
    pub fn encode_into(&self, out: &mut String) -> Result<()> {
        encode_graph(out, &self.root)?;
        let _ = write!(out, "{}{}", EDGES, self.edges.len());
        if !self.edges.is_empty() {
            out.push(' ');
        }
        for edge in &self.edges {
            let _ = write!(out, "{}{}{}{}", edge.source, ARROW, edge.target, edge.kind);
        }
        Ok(())
    }
}

fn encode_graph(out: &mut String, graph: &PhotonGraph) -> Result<()> {
    match graph {
        PhotonGraph::Node(value) => {
            out.push(NODE);
            encode_value(out, value)
        }
        PhotonGraph::Cluster(items) => {
            let _ = write!(out, "{}{}", CLUSTER, items.len());
            for item in items {
                encode_graph(out, item)?;
            }
            Ok(())
        }
        PhotonGraph::Assembly(fields) => {
            let _ = write!(out, "{}{}", ASSEMBLY, fields.len());
            for (name, sub) in fields {
                encode_text(out, name);
                encode_graph(out, sub)?;
            }
            Ok(())
        }
    }
}

/// Append one `value` production
pub fn encode_value(out: &mut String, value: &Value) -> Result<()> {
    out.push(char::from(value.tag().token()));
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push(if *b { '1' } else { '0' }),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) => out.push_str(&format_float(*f)?),
        Value::Text(s) => encode_text_payload(out, s),
        Value::List(items) => {
            let _ = write!(out, "{}", items.len());
            for item in items {
                encode_item(out, item)?;
            }
        }
        Value::Map(map) => {
            let _ = write!(out, "{}", map.len());
            for (key, item) in map {
                encode_text(out, key);
                encode_item(out, item)?;
            }
        }
    }
    Ok(())
}

/// A list item or map value, tagged like a node
fn encode_item(out: &mut String, value: &Value) -> Result<()> {
    out.push(NODE);
    encode_value(out, value)
}

/// Decimal rendering with a mandatory fractional part
///
/// `Display` for `f64` gives the shortest string that parses back to the
/// same bits and never uses an exponent.
fn format_float(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(Error::UnsupportedValueType {
            detail: format!("non-finite float {}", f),
        });
    }
    let mut s = f.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    Ok(s)
}

fn encode_text(out: &mut String, s: &str) {
    out.push(char::from(ValueTag::Text.token()));
    encode_text_payload(out, s);
}

fn encode_text_payload(out: &mut String, s: &str) {
    let _ = write!(out, "{}{}{}", s.len(), TEXT_SEP, s);
}
