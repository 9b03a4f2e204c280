//! APRS digipeater routing for the aprsroute kernel.
//!
//! Given a received packet and the identity of the relaying station, decides
//! whether to digipeat and produces the packet with its path rewritten.
//! Both routing paradigms are supported: explicit callsign entries and
//! generic `NAMEn-N` aliases.
//!
//! # Features
//!
//! - Loop prevention ahead of every other rule
//! - Explicit routing with optional SSID ranges and callsign substitution
//! - Generic trace and legacy aliases, fixed aliases, hop ceilings
//! - Preemptive explicit routing strategies, optionally from an alias hop
//! - Packets we originated are refused unless explicitly routed
//! - Per-edit diagnostics for every routed packet
//! - Caller-owned output buffers with capacity negotiation
//! - A time-windowed duplicate filter for stateful callers
//!
//! # Design Principles
//!
//! - **Pure core** - [`route`] has no state, no I/O and no locks.
//! - **Refusals are values** - "do not digipeat" is a [`NotRouted`], never an error.
//! - **No truncation** - Paths that would grow past the limit are rejected.
//! - **Deterministic** - Same packet and config always produce the same result.

mod boundary;
mod classify;
mod config;
mod dedupe;
mod diagnostics;
mod engine;
mod error;

pub use boundary::{required_len, route_into, route_into_as, route_text, TERMINATOR};
pub use classify::{classify, AliasHop, ElementKind, PathElement, MAX_ALIAS_HOPS};
pub use config::{ActiveHop, AliasKind, AliasRule, ExcessiveHops, Preempt, RouterConfig};
pub use dedupe::{DuplicateFilter, DEFAULT_DEDUPE_WINDOW};
pub use diagnostics::RoutingAction;
pub use engine::{active_hop, route, MatchKind, NotEligibleReason, NotRouted, Routed, Routing};
pub use error::{BoundaryError, ErrorKind, RouteError, RouteResult};
pub use packet::{Callsign, Limits, Packet, ParseError, PathEntry, SsidRange};
