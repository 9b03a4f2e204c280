//! APRS text packet model for the aprsroute digipeater kernel.
//!
//! This crate handles the text wire format `SOURCE>DEST,PATH:PAYLOAD`:
//! callsigns, path entries with their used markers, and limit enforcement.
//! It does not know about routing rules, only the structure of packets.
//!
//! # Design Principles
//!
//! - **Lossless round trips** - Canonical packets format back byte for byte.
//! - **Bounded parsing** - Path length and payload size are checked against limits.
//! - **Opaque payload** - The information field is never inspected.
//! - **Explicit errors** - Malformed input is a structured error, never a panic.

mod callsign;
mod error;
mod limits;
mod packet;

pub use callsign::{Callsign, SsidRange, MAX_BASE_LEN, MAX_SSID};
pub use error::{CallsignReason, LimitKind, PacketReason, ParseError, ParseResult};
pub use limits::{Limits, MAX_PATH_LEN, MAX_PAYLOAD_BYTES};
pub use packet::{Packet, PathEntry, USED_MARKER};
