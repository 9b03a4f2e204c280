//! Error types for routing operations.

use std::fmt;

use packet::ParseError;

use crate::engine::NotRouted;

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;

/// Faults raised while routing a packet.
///
/// A decision not to digipeat is not an error; see [`NotRouted`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    /// Packet or callsign parsing failed.
    Parse(ParseError),

    /// Inserting the router's callsign would exceed the path limit.
    PathOverflow { limit: usize },
}

/// Errors reported by the buffer boundary ([`crate::route_into`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// Packet or callsign parsing failed.
    Parse(ParseError),

    /// Inserting the router's callsign would exceed the path limit.
    PathOverflow { limit: usize },

    /// Output buffer cannot hold the packet text and its terminator.
    BufferTooSmall { required: usize, available: usize },

    /// The router decided not to digipeat.
    NotRouted(NotRouted),
}

/// Flat classification of boundary outcomes for callers that only need a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedCallsign,
    MalformedPacket,
    PathOverflow,
    BufferTooSmall,
    NotEligible,
    AlreadyRouted,
    CannotRouteSelf,
}

impl ErrorKind {
    /// Returns `false` for "do not digipeat" decisions, which are not failures.
    #[must_use]
    pub const fn is_fault(self) -> bool {
        !matches!(
            self,
            Self::NotEligible | Self::AlreadyRouted | Self::CannotRouteSelf
        )
    }
}

impl BoundaryError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(ParseError::MalformedCallsign { .. }) => ErrorKind::MalformedCallsign,
            Self::Parse(_) => ErrorKind::MalformedPacket,
            Self::PathOverflow { .. } => ErrorKind::PathOverflow,
            Self::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Self::NotRouted(NotRouted::NotEligible(_)) => ErrorKind::NotEligible,
            Self::NotRouted(NotRouted::AlreadyRouted { .. }) => ErrorKind::AlreadyRouted,
            Self::NotRouted(NotRouted::CannotRouteSelf) => ErrorKind::CannotRouteSelf,
        }
    }

    /// Buffer size the caller should retry with, for capacity failures.
    #[must_use]
    pub const fn required_len(&self) -> Option<usize> {
        match self {
            Self::BufferTooSmall { required, .. } => Some(*required),
            _ => None,
        }
    }
}

impl From<ParseError> for RouteError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<ParseError> for BoundaryError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<RouteError> for BoundaryError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::Parse(err) => Self::Parse(err),
            RouteError::PathOverflow { limit } => Self::PathOverflow { limit },
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::PathOverflow { limit } => {
                write!(f, "path overflow: routing would exceed {limit} path entries")
            }
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::PathOverflow { limit } => {
                write!(f, "path overflow: routing would exceed {limit} path entries")
            }
            Self::BufferTooSmall {
                required,
                available,
            } => {
                write!(f, "buffer too small: need {required}, have {available}")
            }
            Self::NotRouted(decision) => write!(f, "not routed: {decision}"),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedCallsign => "malformed callsign",
            Self::MalformedPacket => "malformed packet",
            Self::PathOverflow => "path overflow",
            Self::BufferTooSmall => "buffer too small",
            Self::NotEligible => "not eligible",
            Self::AlreadyRouted => "already routed",
            Self::CannotRouteSelf => "cannot route self",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::PathOverflow { .. } => None,
        }
    }
}

impl std::error::Error for BoundaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NotEligibleReason;
    use packet::Callsign;

    #[test]
    fn route_error_display_overflow() {
        let err = RouteError::PathOverflow { limit: 8 };
        assert!(err.to_string().contains("exceed 8"));
    }

    #[test]
    fn boundary_error_kinds() {
        let callsign = Callsign::parse("TOOLONGCALL").unwrap_err();
        assert_eq!(
            BoundaryError::from(callsign).kind(),
            ErrorKind::MalformedCallsign
        );

        let packet = packet::Packet::parse("N0CALL").unwrap_err();
        assert_eq!(BoundaryError::from(packet).kind(), ErrorKind::MalformedPacket);

        let overflow = BoundaryError::from(RouteError::PathOverflow { limit: 8 });
        assert_eq!(overflow.kind(), ErrorKind::PathOverflow);

        let small = BoundaryError::BufferTooSmall {
            required: 40,
            available: 10,
        };
        assert_eq!(small.kind(), ErrorKind::BufferTooSmall);
        assert_eq!(small.required_len(), Some(40));
        assert_eq!(overflow.required_len(), None);
    }

    #[test]
    fn refusals_are_not_faults() {
        let not_eligible = BoundaryError::NotRouted(NotRouted::NotEligible(
            NotEligibleReason::PathExhausted,
        ));
        let already = BoundaryError::NotRouted(NotRouted::AlreadyRouted { index: 0 });
        assert!(!not_eligible.kind().is_fault());
        assert!(!already.kind().is_fault());
        let own = BoundaryError::NotRouted(NotRouted::CannotRouteSelf);
        assert_eq!(own.kind(), ErrorKind::CannotRouteSelf);
        assert!(!own.kind().is_fault());
        assert!(ErrorKind::MalformedPacket.is_fault());
        assert!(ErrorKind::BufferTooSmall.is_fault());
    }

    #[test]
    fn buffer_too_small_display() {
        let err = BoundaryError::BufferTooSmall {
            required: 40,
            available: 10,
        };
        assert_eq!(err.to_string(), "buffer too small: need 40, have 10");
    }
}
