//! Scenario Tests
//!
//! End-to-end behavior through the `photon` facade, organized by concern:
//! - History: commit/revert and bounded history
//! - Links: mirror, gate and pulse topologies, including cycles
//! - Codec: emit/absorb of composed graphs
//! - Config: TOML-driven policies

use std::sync::Once;

mod codec;
mod config;
mod history;
mod links;

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness capture
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}
