//! Packet parsing and formatting.
//!
//! Wire form: `SOURCE>DESTINATION[,PATH_1,...,PATH_n]:PAYLOAD`.

use std::fmt;
use std::str::FromStr;

use crate::callsign::Callsign;
use crate::error::{LimitKind, PacketReason, ParseError, ParseResult};
use crate::limits::Limits;

/// Marker appended to a path entry that has already been repeated.
pub const USED_MARKER: char = '*';

/// A single address in the digipeater path.
///
/// Alias tokens such as `WIDE2-1` are syntactically callsigns (base `WIDE2`,
/// SSID 1); classifying them is the router's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEntry {
    pub address: Callsign,
    /// The `*` marker: this hop already repeated the packet.
    pub used: bool,
}

impl PathEntry {
    #[must_use]
    pub const fn new(address: Callsign, used: bool) -> Self {
        Self { address, used }
    }

    /// Creates an entry that has not been repeated yet.
    #[must_use]
    pub const fn unused(address: Callsign) -> Self {
        Self::new(address, false)
    }

    /// Creates an entry carrying the used marker.
    #[must_use]
    pub const fn used(address: Callsign) -> Self {
        Self::new(address, true)
    }

    /// Parses a path token, with an optional trailing `*`.
    pub fn parse(token: &str) -> ParseResult<Self> {
        let (address, used) = match token.strip_suffix(USED_MARKER) {
            Some(address) => (address, true),
            None => (token, false),
        };
        Ok(Self {
            address: Callsign::parse(address)?,
            used,
        })
    }

    /// Number of bytes in the wire form.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.address.encoded_len() + usize::from(self.used)
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        if self.used {
            write!(f, "{USED_MARKER}")?;
        }
        Ok(())
    }
}

/// A parsed APRS packet.
///
/// The payload is opaque: it is carried and written back verbatim.
///
/// # Examples
///
/// ```
/// use packet::Packet;
///
/// let packet = Packet::parse("N0CALL>APRS,WIDE1-1,WIDE2-2:data").unwrap();
/// assert_eq!(packet.source.to_string(), "N0CALL");
/// assert_eq!(packet.path.len(), 2);
/// assert_eq!(packet.to_string(), "N0CALL>APRS,WIDE1-1,WIDE2-2:data");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Packet {
    pub source: Callsign,
    pub destination: Callsign,
    pub path: Vec<PathEntry>,
    pub payload: String,
}

impl Packet {
    #[must_use]
    pub fn new(
        source: Callsign,
        destination: Callsign,
        path: Vec<PathEntry>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            source,
            destination,
            path,
            payload: payload.into(),
        }
    }

    /// Parses a packet with the default limits.
    pub fn parse(text: &str) -> ParseResult<Self> {
        Self::parse_with_limits(text, &Limits::default())
    }

    /// Parses a packet, enforcing `limits` on the path and payload.
    pub fn parse_with_limits(text: &str, limits: &Limits) -> ParseResult<Self> {
        let (source, rest) = text
            .split_once('>')
            .ok_or(ParseError::packet(PacketReason::MissingSourceDelimiter))?;
        let (header, payload) = rest
            .split_once(':')
            .ok_or(ParseError::packet(PacketReason::MissingPayloadDelimiter))?;

        let source = Callsign::parse_token(source)
            .map_err(|reason| ParseError::packet(PacketReason::InvalidSource(reason)))?;

        let mut tokens = header.split(',');
        // `split` always yields at least one item.
        let destination = tokens.next().unwrap_or_default();
        let destination = Callsign::parse_token(destination)
            .map_err(|reason| ParseError::packet(PacketReason::InvalidDestination(reason)))?;

        let mut path = Vec::new();
        for (index, token) in tokens.enumerate() {
            if path.len() >= limits.max_path_len {
                return Err(ParseError::packet(PacketReason::LimitsExceeded {
                    kind: LimitKind::PathLength,
                    limit: limits.max_path_len,
                    actual: header.split(',').count() - 1,
                }));
            }
            path.push(parse_path_token(index, token)?);
        }

        if payload.len() > limits.max_payload_bytes {
            return Err(ParseError::packet(PacketReason::LimitsExceeded {
                kind: LimitKind::PayloadBytes,
                limit: limits.max_payload_bytes,
                actual: payload.len(),
            }));
        }

        Ok(Self {
            source,
            destination,
            path,
            payload: payload.to_string(),
        })
    }

    /// Index of the first entry without the used marker.
    #[must_use]
    pub fn first_unused(&self) -> Option<usize> {
        self.path.iter().position(|entry| !entry.used)
    }

    /// Index of the last entry carrying the used marker.
    #[must_use]
    pub fn last_used(&self) -> Option<usize> {
        self.path.iter().rposition(|entry| entry.used)
    }

    /// Exact number of bytes `to_string()` produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let path: usize = self.path.iter().map(|entry| 1 + entry.encoded_len()).sum();
        self.source.encoded_len() + 1 + self.destination.encoded_len() + path + 1 + self.payload.len()
    }
}

fn parse_path_token(index: usize, token: &str) -> ParseResult<PathEntry> {
    if token.is_empty() {
        return Err(ParseError::packet(PacketReason::EmptyPathElement { index }));
    }
    PathEntry::parse(token).map_err(|err| match err {
        ParseError::MalformedCallsign { token, reason } => {
            ParseError::packet(PacketReason::InvalidPathElement {
                index,
                token,
                reason,
            })
        }
        other => other,
    })
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)?;
        for entry in &self.path {
            write!(f, ",{entry}")?;
        }
        write!(f, ":{}", self.payload)
    }
}

impl FromStr for Packet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
