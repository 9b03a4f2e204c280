//! Text-in, text-out routing into caller-owned buffers.
//!
//! The output is the rewritten packet text followed by a NUL terminator.
//! Callers that do not know the size in advance either call
//! [`required_len`] first or retry with [`BoundaryError::required_len`]
//! after a [`BoundaryError::BufferTooSmall`]. Nothing is written on failure.

use packet::{Callsign, Packet};

use crate::config::RouterConfig;
use crate::engine::{route, Routing};
use crate::error::BoundaryError;

/// Terminator written after the packet text.
pub const TERMINATOR: u8 = 0;

/// Parses, routes and serializes `text`.
///
/// Parsing applies `config.limits`.
///
/// # Errors
///
/// Returns a [`BoundaryError`] for malformed input, path overflow, or a
/// decision not to digipeat.
pub fn route_text(text: &str, config: &RouterConfig) -> Result<String, BoundaryError> {
    let packet = Packet::parse_with_limits(text, &config.limits)?;
    match route(&packet, config)? {
        Routing::Routed(routed) => Ok(routed.packet.to_string()),
        Routing::NotRouted(decision) => Err(BoundaryError::NotRouted(decision)),
    }
}

/// Buffer size [`route_into`] needs for `text`, terminator included.
///
/// # Errors
///
/// Same as [`route_text`].
pub fn required_len(text: &str, config: &RouterConfig) -> Result<usize, BoundaryError> {
    route_text(text, config).map(|routed| routed.len() + 1)
}

/// Routes `text` and writes the result plus a terminator into `out`.
///
/// Returns the text length, excluding the terminator.
///
/// # Errors
///
/// Returns [`BoundaryError::BufferTooSmall`] with the exact required size
/// if `out` cannot hold the result, leaving `out` untouched. Other errors
/// are as for [`route_text`].
pub fn route_into(
    text: &str,
    config: &RouterConfig,
    out: &mut [u8],
) -> Result<usize, BoundaryError> {
    let routed = route_text(text, config)?;
    let required = routed.len() + 1;
    if required > out.len() {
        tracing::debug!(required, available = out.len(), "output buffer too small");
        return Err(BoundaryError::BufferTooSmall {
            required,
            available: out.len(),
        });
    }
    out[..routed.len()].copy_from_slice(routed.as_bytes());
    out[routed.len()] = TERMINATOR;
    Ok(routed.len())
}

/// [`route_into`] for callers holding the router identity as text.
///
/// `callsign` replaces `config.callsign` for this call.
///
/// # Errors
///
/// Returns [`BoundaryError::Parse`] with a
/// [`ParseError::MalformedCallsign`](packet::ParseError::MalformedCallsign)
/// if `callsign` is invalid, before `text` is looked at. Other errors are
/// as for [`route_into`].
pub fn route_into_as(
    text: &str,
    callsign: &str,
    config: &RouterConfig,
    out: &mut [u8],
) -> Result<usize, BoundaryError> {
    let callsign = Callsign::parse(callsign)?;
    let config = RouterConfig {
        callsign,
        ..config.clone()
    };
    route_into(text, &config, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{NotEligibleReason, NotRouted};
    use crate::error::ErrorKind;
    use packet::Limits;

    const INPUT: &str = "N0CALL>APRS,WIDE1-1,WIDE2-2:data";
    const OUTPUT: &str = "N0CALL>APRS,DIGI*,WIDE2-2:data";

    fn config() -> RouterConfig {
        RouterConfig::parse("DIGI").unwrap()
    }

    #[test]
    fn writes_text_and_terminator() {
        let mut out = [0xffu8; 64];
        let len = route_into(INPUT, &config(), &mut out).unwrap();
        assert_eq!(len, OUTPUT.len());
        assert_eq!(&out[..len], OUTPUT.as_bytes());
        assert_eq!(out[len], TERMINATOR);
        assert_eq!(out[len + 1], 0xff);
    }

    #[test]
    fn too_small_reports_required_and_writes_nothing() {
        let mut out = [0xffu8; 8];
        let err = route_into(INPUT, &config(), &mut out).unwrap_err();
        assert_eq!(
            err,
            BoundaryError::BufferTooSmall {
                required: OUTPUT.len() + 1,
                available: 8,
            }
        );
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
        assert!(out.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn retry_with_required_len_succeeds() {
        let mut small = [0u8; 4];
        let required = route_into(INPUT, &config(), &mut small)
            .unwrap_err()
            .required_len()
            .unwrap();
        assert_eq!(required_len(INPUT, &config()).unwrap(), required);

        let mut exact = vec![0u8; required];
        let len = route_into(INPUT, &config(), &mut exact).unwrap();
        assert_eq!(len + 1, required);

        // One byte short still fails: the terminator needs room too.
        let mut short = vec![0u8; required - 1];
        assert!(route_into(INPUT, &config(), &mut short).is_err());
    }

    #[test]
    fn refusals_are_reported() {
        let err = route_text("N0CALL>APRS,DIGI*:data", &config()).unwrap_err();
        assert_eq!(
            err,
            BoundaryError::NotRouted(NotRouted::AlreadyRouted { index: 0 })
        );
        assert!(!err.kind().is_fault());

        let err = route_text("N0CALL>APRS:data", &config()).unwrap_err();
        assert_eq!(
            err,
            BoundaryError::NotRouted(NotRouted::NotEligible(NotEligibleReason::PathExhausted))
        );
    }

    #[test]
    fn malformed_input_is_a_fault() {
        let err = route_text("N0CALL APRS data", &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPacket);
        assert!(err.kind().is_fault());
    }

    #[test]
    fn long_payload_routes_with_default_limits() {
        let payload = "x".repeat(300);
        let text = format!("N0CALL>APRS,WIDE1-1:{payload}");
        assert_eq!(
            route_text(&text, &config()).unwrap(),
            format!("N0CALL>APRS,DIGI*:{payload}")
        );

        let strict = config().with_limits(Limits::strict());
        assert_eq!(
            route_text(&text, &strict).unwrap_err().kind(),
            ErrorKind::MalformedPacket
        );
    }

    #[test]
    fn router_identity_as_text() {
        let mut out = [0xffu8; 64];
        let len = route_into_as(INPUT, "DIGI2", &config(), &mut out).unwrap();
        assert_eq!(&out[..len], b"N0CALL>APRS,DIGI2*,WIDE2-2:data");

        let err = route_into_as(INPUT, "TOOLONGCALL", &config(), &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedCallsign);
        assert!(err.kind().is_fault());

        let err = route_into_as(INPUT, "DIGI-16", &config(), &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedCallsign);
    }

    #[test]
    fn own_packet_refusal_is_not_a_fault() {
        let err = route_text("DIGI>APRS,WIDE1-1:data", &config()).unwrap_err();
        assert_eq!(err, BoundaryError::NotRouted(NotRouted::CannotRouteSelf));
        assert!(!err.kind().is_fault());
    }

    #[test]
    fn parsing_applies_config_limits() {
        let config = config().with_limits(Limits::for_testing());
        let err = route_text("N0CALL>APRS,A*,B*,C*,D*,WIDE1-1:data", &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPacket);

        let err = route_text("N0CALL>APRS,A*,B*,C*,WIDE2-2:data", &config).unwrap_err();
        assert_eq!(err, BoundaryError::PathOverflow { limit: 4 });
    }
}
