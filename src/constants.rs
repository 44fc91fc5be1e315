//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default DAW host to connect to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port of the DAW controller extension
pub const DEFAULT_PORT: u16 = 60123;

// =============================================================================
// Surface layout
// =============================================================================

/// Default number of device slots mirrored from the DAW (two pages of ten)
pub const DEFAULT_DEVICE_COUNT: usize = 20;

/// Default number of controls (knobs) per device
pub const DEFAULT_CONTROLS_PER_DEVICE: usize = 8;

// =============================================================================
// Timing
// =============================================================================

/// Delay between reconnection attempts (milliseconds)
pub const RECONNECT_DELAY_MS: u64 = 1000;

/// Timeout for a single TCP connect attempt (milliseconds)
pub const CONNECT_TIMEOUT_MS: u64 = 5000;

/// Interval for shutdown flag polling in the session loop (milliseconds)
pub const SHUTDOWN_POLL_INTERVAL_MS: u64 = 100;

/// TCP keepalive idle time before probes start (seconds)
pub const KEEPALIVE_TIME_SECS: u64 = 10;

/// TCP keepalive probe interval (seconds)
pub const KEEPALIVE_INTERVAL_SECS: u64 = 5;

// =============================================================================
// Buffers
// =============================================================================

/// Outbound queue depth; messages past this are dropped with a warning
pub const OUTBOUND_QUEUE_CAPACITY: usize = 1024;
