//! Configurable limits for bounded parsing and routing.

/// Maximum number of digipeater addresses an AX.25 header can carry.
pub const MAX_PATH_LEN: usize = 8;

/// Maximum length of the APRS information field in bytes.
///
/// Only enforced by [`Limits::strict`]; the payload is opaque by default.
pub const MAX_PAYLOAD_BYTES: usize = 256;

/// Packet-level limits.
///
/// The path limit is also the ceiling the router enforces when it inserts
/// its own callsign. The payload is unbounded unless a caller opts in with
/// [`Limits::strict`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum number of path entries.
    pub max_path_len: usize,

    /// Maximum payload size in bytes.
    pub max_payload_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
            max_payload_bytes: usize::MAX,
        }
    }
}

impl Limits {
    /// Creates limits that also reject payloads longer than the APRS
    /// information field.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        }
    }

    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_path_len: 4,
            max_payload_bytes: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_path_len: usize::MAX,
            max_payload_bytes: usize::MAX,
        }
    }
}
