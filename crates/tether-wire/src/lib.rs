//! Core wire types for the tether broadcast.
//!
//! Every agent broadcasts one [`Payload`] per tick. Framing, checksums and
//! scheduling belong to the radio; this crate only packs and unpacks the
//! payload bytes.

mod error;
mod payload;

pub use error::{Result, WireError};
pub use payload::{Payload, FLAG_GATE, FLAG_ROLE_MASK};

/// Encoded payload size in bytes.
pub const PAYLOAD_LEN: usize = 5;

/// Largest payload the radio frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 9;

const _: () = assert!(PAYLOAD_LEN <= MAX_PAYLOAD_LEN);
