//! PhotonStream codec
//!
//! Converts between an in-memory [`photon_graph::Graph`] and its compact text
//! form:
//! - `Photon`: structural snapshot with pre-order node positions
//! - Encoding: tag/length-prefixed tokens, no separators between photons
//! - Decoding: strict parser with byte offsets and size limits
//! - Streams: `emit`/`absorb` plus batch variants over concatenated photons
//!
//! # Example
//!
//! ```ignore
//! let text = photon_codec::emit(&graph, root)?;
//! let (copy, cursor) = photon_codec::absorb(&mut other, &text)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod photon;
pub mod stream;

pub use encode::encode_value;
pub use photon::{Photon, PhotonEdge, PhotonGraph};
pub use stream::{absorb, absorb_all, absorb_at, emit, emit_batch};
