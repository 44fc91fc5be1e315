//! surface-link - bidirectional sync core between a touch control surface
//! and a DAW
//!
//! The crate mirrors DAW parameter state over a persistent TCP link and
//! reconciles it with local touch input:
//! - **codec/protocol**: asymmetric wire format (length-prefixed outbound
//!   frames, newline-delimited inbound lines, comma-separated fields)
//! - **outbound**: single FIFO queue decoupling state changes from the
//!   socket writer; survives reconnects
//! - **link**: session lifecycle with reconnect-forever and fixed backoff
//! - **state**: per-control reconciliation (local edit vs. remote push vs.
//!   touch-hold suppression) and the per-device metadata mirror
//! - **dispatch**: routes inbound lines into the state registry
//!
//! A UI sits on top of this crate: it reads the observable state (watch
//! channels or polling accessors) and calls the intent entry points
//! (`apply_local_edit`, `set_touched`, `focus`, page navigation). Link
//! failures are invisible to it except as staleness.

pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod link;
pub mod logging;
pub mod outbound;
pub mod protocol;
pub mod state;

pub use error::{Result, SurfaceError};
