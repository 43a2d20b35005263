//! PhotonStream text → Photon
//!
//! A strict recursive-descent parser over the raw bytes. Whitespace may
//! separate tokens but never splits a digit run or a text payload. Every
//! failure carries the byte offset where parsing stopped.
//!
//! Counts and lengths are checked against [`Limits`] before anything is
//! allocated, and nesting depth is checked on entry to each level.

use crate::encode::{ARROW, ASSEMBLY, CLUSTER, EDGES, NODE, TEXT_SEP};
use crate::photon::{Photon, PhotonEdge, PhotonGraph};
use photon_core::{Error, GateDirection, Limits, LinkKind, Result, Value, ValueTag};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Pre-allocation ceiling for wire-declared counts
const MAX_PREALLOC: usize = 1024;

impl Photon {
    /// Parse one photon from the start of `input`
    ///
    /// Returns the photon and the byte offset just past its last token.
    pub fn decode(input: &str, limits: &Limits) -> Result<(Photon, usize)> {
        Photon::decode_at(input, 0, limits)
    }

    /// Parse one photon starting at byte `offset` of `input`
    pub fn decode_at(input: &str, offset: usize, limits: &Limits) -> Result<(Photon, usize)> {
        let mut parser = Parser::new(input.as_bytes(), offset, limits);
        let photon = parser.photon()?;
        Ok((photon, parser.pos))
    }
}

/// Whether only whitespace remains from `offset` on
pub(crate) fn at_end(input: &str, offset: usize) -> bool {
    input.as_bytes()[offset.min(input.len())..]
        .iter()
        .all(u8::is_ascii_whitespace)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    limits: &'a Limits,
    node_count: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], pos: usize, limits: &'a Limits) -> Self {
        Parser {
            input,
            pos,
            limits,
            node_count: 0,
        }
    }

    fn photon(&mut self) -> Result<Photon> {
        let root = self.graph(0)?;
        let edges = self.edges()?;
        Ok(Photon { root, edges })
    }

    // ------------------------------------------------------------------
    // Graph productions
    // ------------------------------------------------------------------

    fn graph(&mut self, depth: usize) -> Result<PhotonGraph> {
        self.limits.check_depth(depth)?;
        let at = self.token_start()?;
        match char::from(self.bump()) {
            NODE => {
                self.node_count += 1;
                Ok(PhotonGraph::Node(self.value(depth)?))
            }
            CLUSTER => {
                let count = self.count()?;
                let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    items.push(self.graph(depth + 1)?);
                }
                Ok(PhotonGraph::Cluster(items))
            }
            ASSEMBLY => {
                let count = self.count()?;
                let mut fields = Vec::with_capacity(count.min(MAX_PREALLOC));
                let mut seen = FxHashSet::default();
                for _ in 0..count {
                    let name_at = self.pos;
                    let name = self.key()?;
                    if !seen.insert(name.clone()) {
                        return Err(Error::malformed(
                            name_at,
                            format!("duplicate assembly field {:?}", name),
                        ));
                    }
                    let sub = self.graph(depth + 1)?;
                    fields.push((name, sub));
                }
                Ok(PhotonGraph::Assembly(fields))
            }
            other => Err(Error::malformed(
                at,
                format!("expected graph tag N, C or A, found {:?}", other),
            )),
        }
    }

    fn edges(&mut self) -> Result<Vec<PhotonEdge>> {
        self.expect(EDGES as u8, "edge table")?;
        let count = self.count()?;
        let mut edges = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let source = self.position()?;
            self.expect(ARROW as u8, "'>' between edge endpoints")?;
            let target = self.position()?;
            let kind = self.kind()?;
            edges.push(PhotonEdge {
                source,
                target,
                kind,
            });
        }
        Ok(edges)
    }

    fn position(&mut self) -> Result<usize> {
        let index = self.unsigned("node position")?;
        if index >= self.node_count {
            return Err(Error::UnknownLinkTarget {
                index,
                node_count: self.node_count,
            });
        }
        Ok(index)
    }

    fn kind(&mut self) -> Result<LinkKind> {
        let at = self.token_start()?;
        match self.bump() {
            b'M' => Ok(LinkKind::Mirror),
            b'P' => Ok(LinkKind::Pulse),
            b'G' => match self.input.get(self.pos) {
                Some(b'+') => {
                    self.pos += 1;
                    Ok(LinkKind::Gate(GateDirection::Forward))
                }
                Some(b'-') => {
                    self.pos += 1;
                    Ok(LinkKind::Gate(GateDirection::Backward))
                }
                _ => Err(Error::malformed(self.pos, "gate kind needs '+' or '-'")),
            },
            other => Err(Error::malformed(
                at,
                format!("expected link kind M, G+, G- or P, found {:?}", char::from(other)),
            )),
        }
    }

    // ------------------------------------------------------------------
    // Value productions
    // ------------------------------------------------------------------

    fn value(&mut self, depth: usize) -> Result<Value> {
        self.limits.check_depth(depth)?;
        let at = self.token_start()?;
        let byte = self.bump();
        let tag = ValueTag::from_token(byte).ok_or_else(|| {
            Error::malformed(
                at,
                format!("expected value tag, found {:?}", char::from(byte)),
            )
        })?;
        match tag {
            ValueTag::Null => Ok(Value::Null),
            ValueTag::Bool => match self.input.get(self.pos) {
                Some(b'0') => {
                    self.pos += 1;
                    Ok(Value::Bool(false))
                }
                Some(b'1') => {
                    self.pos += 1;
                    Ok(Value::Bool(true))
                }
                _ => Err(Error::malformed(self.pos, "bool must be '0' or '1'")),
            },
            ValueTag::Int => self.int().map(Value::Int),
            ValueTag::Float => self.float().map(Value::Float),
            ValueTag::Text => self.text_payload().map(Value::Text),
            ValueTag::List => {
                let count = self.count()?;
                let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    items.push(self.item(depth + 1)?);
                }
                Ok(Value::List(items))
            }
            ValueTag::Map => {
                let count = self.count()?;
                let mut map = BTreeMap::new();
                for _ in 0..count {
                    let key_at = self.pos;
                    let key = self.key()?;
                    if map.contains_key(&key) {
                        return Err(Error::malformed(
                            key_at,
                            format!("duplicate map key {:?}", key),
                        ));
                    }
                    let item = self.item(depth + 1)?;
                    map.insert(key, item);
                }
                Ok(Value::Map(map))
            }
        }
    }

    /// A list item or map value: `N` then a value, without a node position
    fn item(&mut self, depth: usize) -> Result<Value> {
        self.expect(NODE as u8, "value item tag N")?;
        self.value(depth)
    }

    fn int(&mut self) -> Result<i64> {
        let start = self.pos;
        self.sign();
        self.digits("integer")?;
        let text = self.slice(start)?;
        text.parse::<i64>()
            .map_err(|_| Error::malformed(start, format!("integer {} out of range", text)))
    }

    fn float(&mut self) -> Result<f64> {
        let start = self.pos;
        self.sign();
        self.digits("float integer part")?;
        if self.input.get(self.pos) != Some(&b'.') {
            return Err(Error::malformed(self.pos, "float needs '.'"));
        }
        self.pos += 1;
        self.digits("float fraction")?;
        let text = self.slice(start)?;
        text.parse::<f64>()
            .map_err(|_| Error::malformed(start, format!("invalid float {}", text)))
    }

    /// `t` token used for map keys and assembly field names
    fn key(&mut self) -> Result<String> {
        let at = self.token_start()?;
        if self.bump() != ValueTag::Text.token() {
            return Err(Error::malformed(at, "expected text key"));
        }
        self.text_payload()
    }

    fn text_payload(&mut self) -> Result<String> {
        let len = self.unsigned("text length")?;
        self.limits.check_text(len)?;
        self.expect(TEXT_SEP as u8, "':' after text length")?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| Error::malformed(start, "text payload runs past end of input"))?;
        let text = std::str::from_utf8(&self.input[start..end])
            .map_err(|e| Error::malformed(start + e.valid_up_to(), "text is not valid UTF-8"))?;
        self.pos = end;
        Ok(text.to_string())
    }

    // ------------------------------------------------------------------
    // Lexical helpers
    // ------------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        while self
            .input
            .get(self.pos)
            .map_or(false, u8::is_ascii_whitespace)
        {
            self.pos += 1;
        }
    }

    /// Skip whitespace and require another byte; returns its offset
    fn token_start(&mut self) -> Result<usize> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return Err(Error::malformed(self.pos, "unexpected end of input"));
        }
        Ok(self.pos)
    }

    /// Consume the byte at the cursor; callers check bounds first
    fn bump(&mut self) -> u8 {
        let byte = self.input[self.pos];
        self.pos += 1;
        byte
    }

    fn expect(&mut self, byte: u8, what: &str) -> Result<()> {
        let at = self.token_start()?;
        if self.input[at] != byte {
            return Err(Error::malformed(
                at,
                format!("expected {}, found {:?}", what, char::from(self.input[at])),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn sign(&mut self) {
        if self.input.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
    }

    fn digits(&mut self, what: &str) -> Result<()> {
        let start = self.pos;
        while self.input.get(self.pos).map_or(false, u8::is_ascii_digit) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(Error::malformed(start, format!("expected digits for {}", what)));
        }
        Ok(())
    }

    fn unsigned(&mut self, what: &str) -> Result<usize> {
        let start = self.token_start()?;
        self.digits(what)?;
        let text = self.slice(start)?;
        text.parse::<usize>()
            .map_err(|_| Error::malformed(start, format!("{} {} out of range", what, text)))
    }

    fn count(&mut self) -> Result<usize> {
        let count = self.unsigned("count")?;
        self.limits.check_count(count)?;
        Ok(count)
    }

    fn slice(&self, start: usize) -> Result<&'a str> {
        let input: &'a [u8] = self.input;
        std::str::from_utf8(&input[start..self.pos])
            .map_err(|_| Error::malformed(start, "invalid bytes in numeric token"))
    }
}
