//! Error types for packet parsing.

use std::fmt;

/// Result type for packet parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// High-level parse errors for APRS text packets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A standalone callsign token failed validation.
    MalformedCallsign {
        token: String,
        reason: CallsignReason,
    },

    /// The packet text is not a valid `SOURCE>DEST,PATH:PAYLOAD` string.
    MalformedPacket { reason: PacketReason },
}

/// Why a callsign token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallsignReason {
    EmptyBase,
    BaseTooLong { len: usize, max: usize },
    InvalidCharacter { ch: char },
    EmptySsid,
    NonNumericSsid,
    SsidOutOfRange { value: u32 },
}

/// Why a packet string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketReason {
    /// No `>` between source and destination.
    MissingSourceDelimiter,
    /// No `:` between header and payload.
    MissingPayloadDelimiter,
    InvalidSource(CallsignReason),
    InvalidDestination(CallsignReason),
    EmptyPathElement { index: usize },
    InvalidPathElement {
        index: usize,
        token: String,
        reason: CallsignReason,
    },
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific packet limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PathLength,
    PayloadBytes,
}

impl ParseError {
    pub(crate) fn packet(reason: PacketReason) -> Self {
        Self::MalformedPacket { reason }
    }

    /// Returns `true` for callsign-level failures.
    #[must_use]
    pub const fn is_callsign(&self) -> bool {
        matches!(self, Self::MalformedCallsign { .. })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCallsign { token, reason } => {
                write!(f, "malformed callsign \"{token}\": {reason}")
            }
            Self::MalformedPacket { reason } => write!(f, "malformed packet: {reason}"),
        }
    }
}

impl fmt::Display for CallsignReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBase => write!(f, "empty base"),
            Self::BaseTooLong { len, max } => {
                write!(f, "base is {len} characters, at most {max} allowed")
            }
            Self::InvalidCharacter { ch } => write!(f, "invalid character {ch:?}"),
            Self::EmptySsid => write!(f, "empty ssid"),
            Self::NonNumericSsid => write!(f, "ssid is not numeric"),
            Self::SsidOutOfRange { value } => write!(f, "ssid {value} outside 0-15"),
        }
    }
}

impl fmt::Display for PacketReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceDelimiter => write!(f, "missing '>' after source"),
            Self::MissingPayloadDelimiter => write!(f, "missing ':' before payload"),
            Self::InvalidSource(reason) => write!(f, "invalid source: {reason}"),
            Self::InvalidDestination(reason) => write!(f, "invalid destination: {reason}"),
            Self::EmptyPathElement { index } => write!(f, "empty path element at {index}"),
            Self::InvalidPathElement {
                index,
                token,
                reason,
            } => {
                write!(f, "invalid path element {index} \"{token}\": {reason}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PathLength => "path length",
            Self::PayloadBytes => "payload bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for ParseError {}
