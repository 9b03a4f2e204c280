//! Station callsigns with an optional SSID.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CallsignReason, ParseError, ParseResult};

/// Maximum number of characters in a callsign base.
pub const MAX_BASE_LEN: usize = 6;

/// Largest secondary station identifier.
pub const MAX_SSID: u8 = 15;

/// Inclusive SSID range used for wildcard matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SsidRange {
    min: u8,
    max: u8,
}

impl SsidRange {
    /// Matches every SSID.
    pub const ALL: Self = Self {
        min: 0,
        max: MAX_SSID,
    };

    /// Creates a range, or `None` if `min > max` or `max` exceeds 15.
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Option<Self> {
        if min > max || max > MAX_SSID {
            None
        } else {
            Some(Self { min, max })
        }
    }

    #[must_use]
    pub const fn min(self) -> u8 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u8 {
        self.max
    }

    /// Returns `true` if `ssid` falls inside the range.
    #[must_use]
    pub const fn contains(self, ssid: u8) -> bool {
        self.min <= ssid && ssid <= self.max
    }
}

// Deserialization goes through `new` so config files cannot hold an
// inverted or out-of-range span.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SsidRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            min: u8,
            max: u8,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.min, raw.max).ok_or_else(|| {
            serde::de::Error::custom(format_args!(
                "invalid SSID range {}..={}, expected min <= max <= {MAX_SSID}",
                raw.min, raw.max
            ))
        })
    }
}

/// An amateur radio station identifier, `BASE` or `BASE-SSID`.
///
/// Equality and hashing look at the base and the numeric SSID only. Whether
/// the SSID was written out is remembered so that `N0CALL` and `N0CALL-0`
/// both format back to what was parsed.
///
/// # Examples
///
/// ```
/// use packet::Callsign;
///
/// let call: Callsign = "n0call-7".parse().unwrap();
/// assert_eq!(call.base(), "N0CALL");
/// assert_eq!(call.ssid(), 7);
/// assert_eq!(call.to_string(), "N0CALL-7");
/// ```
#[derive(Debug, Clone, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Callsign {
    base: String,
    ssid: u8,
    has_ssid: bool,
}

impl Callsign {
    /// Parses a `BASE` or `BASE-SSID` token.
    ///
    /// Lowercase letters are accepted and stored uppercase.
    pub fn parse(token: &str) -> ParseResult<Self> {
        Self::parse_token(token).map_err(|reason| ParseError::MalformedCallsign {
            token: token.to_string(),
            reason,
        })
    }

    /// Creates a callsign from its parts. The SSID is written out when non-zero.
    pub fn new(base: &str, ssid: u8) -> ParseResult<Self> {
        Self::from_parts(base, ssid, ssid != 0)
    }

    /// Creates a callsign from its parts, choosing whether a zero SSID is
    /// written out.
    pub fn from_parts(base: &str, ssid: u8, has_ssid: bool) -> ParseResult<Self> {
        let malformed = |reason| ParseError::MalformedCallsign {
            token: format!("{base}-{ssid}"),
            reason,
        };
        let base = validate_base(base).map_err(malformed)?;
        if ssid > MAX_SSID {
            return Err(malformed(CallsignReason::SsidOutOfRange {
                value: u32::from(ssid),
            }));
        }
        Ok(Self {
            base,
            ssid,
            has_ssid: has_ssid || ssid != 0,
        })
    }

    pub(crate) fn parse_token(token: &str) -> Result<Self, CallsignReason> {
        let (base, ssid) = match token.split_once('-') {
            Some((base, ssid)) => (base, Some(ssid)),
            None => (token, None),
        };
        let base = validate_base(base)?;
        let Some(ssid) = ssid else {
            return Ok(Self {
                base,
                ssid: 0,
                has_ssid: false,
            });
        };
        if ssid.is_empty() {
            return Err(CallsignReason::EmptySsid);
        }
        if !ssid.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CallsignReason::NonNumericSsid);
        }
        let value = ssid.parse::<u32>().unwrap_or(u32::MAX);
        let ssid = u8::try_from(value)
            .ok()
            .filter(|ssid| *ssid <= MAX_SSID)
            .ok_or(CallsignReason::SsidOutOfRange { value })?;
        Ok(Self {
            base,
            ssid,
            has_ssid: true,
        })
    }

    /// Returns the uppercase base.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub const fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Returns `true` if the SSID was present in the wire form.
    #[must_use]
    pub const fn has_ssid(&self) -> bool {
        self.has_ssid
    }

    /// Returns a copy carrying `ssid`, always written out.
    pub fn with_ssid(&self, ssid: u8) -> ParseResult<Self> {
        Self::from_parts(&self.base, ssid, true)
    }

    /// Returns `true` if the bases are equal and the SSIDs agree.
    ///
    /// Without a range the SSIDs must be equal. With a range, `self.ssid`
    /// only has to fall inside it.
    #[must_use]
    pub fn matches(&self, other: &Self, ssid_range: Option<SsidRange>) -> bool {
        if self.base != other.base {
            return false;
        }
        match ssid_range {
            Some(range) => range.contains(self.ssid),
            None => self.ssid == other.ssid,
        }
    }

    /// Number of bytes in the wire form.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let ssid_len = match (self.has_ssid || self.ssid != 0, self.ssid) {
            (false, _) => 0,
            (true, 0..=9) => 2,
            (true, _) => 3,
        };
        self.base.len() + ssid_len
    }
}

fn validate_base(base: &str) -> Result<String, CallsignReason> {
    if base.is_empty() {
        return Err(CallsignReason::EmptyBase);
    }
    if let Some(ch) = base.chars().find(|ch| !ch.is_ascii_alphanumeric()) {
        return Err(CallsignReason::InvalidCharacter { ch });
    }
    if base.len() > MAX_BASE_LEN {
        return Err(CallsignReason::BaseTooLong {
            len: base.len(),
            max: MAX_BASE_LEN,
        });
    }
    Ok(base.to_ascii_uppercase())
}

impl PartialEq for Callsign {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.ssid == other.ssid
    }
}

impl Hash for Callsign {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.ssid.hash(state);
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if self.has_ssid || self.ssid != 0 {
            write!(f, "-{}", self.ssid)?;
        }
        Ok(())
    }
}

impl FromStr for Callsign {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Callsign {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Callsign> for String {
    fn from(call: Callsign) -> Self {
        call.to_string()
    }
}
