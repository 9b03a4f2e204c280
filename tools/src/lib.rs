//! Command-line routing and inspection tools for aprsroute.
//!
//! This crate turns routing results into reports a person or a script can
//! read:
//!
//! - Route packets and show the decision with every path edit
//! - Classify path entries the way the router sees them
//! - Load router configuration from JSON
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand why a packet was or was not repeated.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use packet::{Packet, ParseError};
use router::{
    active_hop, classify, route, BoundaryError, DuplicateFilter, ElementKind, MatchKind,
    NotRouted, RouterConfig, Routing, RoutingAction,
};
use serde::Serialize;

/// Outcome of routing one input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteReport {
    Routed {
        input: String,
        output: String,
        kind: MatchKind,
        index: usize,
        actions: Vec<RoutingAction>,
    },
    NotRouted {
        input: String,
        decision: NotRouted,
    },
    Duplicate {
        input: String,
    },
    Error {
        input: String,
        kind: String,
        message: String,
    },
}

impl RouteReport {
    /// Returns `true` for malformed input and path overflow.
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Parses `config_json` into a router configuration.
pub fn load_config(config_json: &str) -> Result<RouterConfig> {
    serde_json::from_str(config_json).context("parse router config json")
}

/// Parses and routes one packet, consulting `filter` first if given.
///
/// `now` is only used by the filter.
pub fn route_line(
    text: &str,
    config: &RouterConfig,
    filter: Option<&mut DuplicateFilter>,
    now: Duration,
) -> RouteReport {
    let input = text.to_string();
    let packet = match Packet::parse_with_limits(text, &config.limits) {
        Ok(packet) => packet,
        Err(err) => return error_report(input, BoundaryError::from(err)),
    };
    if let Some(filter) = filter {
        if !filter.check(&packet, now) {
            return RouteReport::Duplicate { input };
        }
    }
    match route(&packet, config) {
        Ok(Routing::Routed(routed)) => RouteReport::Routed {
            input,
            output: routed.packet.to_string(),
            kind: routed.kind,
            index: routed.index,
            actions: routed.actions,
        },
        Ok(Routing::NotRouted(decision)) => RouteReport::NotRouted { input, decision },
        Err(err) => error_report(input, BoundaryError::from(err)),
    }
}

fn error_report(input: String, err: BoundaryError) -> RouteReport {
    tracing::warn!(%input, error = %err, "routing failed");
    RouteReport::Error {
        input,
        kind: err.kind().to_string(),
        message: err.to_string(),
    }
}

/// Renders a route report for a terminal.
pub fn format_route_pretty(report: &RouteReport) -> String {
    let mut output = String::new();
    match report {
        RouteReport::Routed {
            input,
            output: routed,
            kind,
            index,
            actions,
        } => {
            let _ = writeln!(output, "in:  {input}");
            let _ = writeln!(output, "out: {routed}");
            let _ = write!(output, "routed ({kind} match at path entry {index})");
            for action in actions {
                let _ = write!(output, "\n  {action}");
            }
        }
        RouteReport::NotRouted { input, decision } => {
            let _ = writeln!(output, "in:  {input}");
            let _ = write!(output, "{decision}");
        }
        RouteReport::Duplicate { input } => {
            let _ = writeln!(output, "in:  {input}");
            let _ = write!(output, "duplicate: dropped");
        }
        RouteReport::Error { input, message, .. } => {
            let _ = writeln!(output, "in:  {input}");
            let _ = write!(output, "error: {message}");
        }
    }
    output
}

/// A path entry as the router classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntryReport {
    pub entry: String,
    pub used: bool,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u8>,
}

/// A parsed packet with its path classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub source: String,
    pub destination: String,
    pub path: Vec<PathEntryReport>,
    pub active_hop: Option<usize>,
    pub payload_len: usize,
}

/// Parses `text` and classifies its path the way `config`'s router sees it.
pub fn parse_line(text: &str, config: &RouterConfig) -> Result<ParseReport, ParseError> {
    let packet = Packet::parse_with_limits(text, &config.limits)?;
    let path = packet
        .path
        .iter()
        .map(|entry| {
            let element = classify(entry, &config.aliases);
            let (kind, alias, total, remaining) = match &element.kind {
                ElementKind::Station(_) => ("station", None, None, None),
                ElementKind::Alias(hop) => (
                    "alias",
                    Some(hop.name().to_string()),
                    Some(hop.total()),
                    Some(hop.remaining()),
                ),
                ElementKind::Fixed { address, .. } => {
                    ("fixed", Some(address.base().to_string()), None, None)
                }
            };
            PathEntryReport {
                entry: entry.to_string(),
                used: entry.used,
                kind,
                alias,
                total,
                remaining,
            }
        })
        .collect();
    Ok(ParseReport {
        source: packet.source.to_string(),
        destination: packet.destination.to_string(),
        path,
        active_hop: active_hop(&packet, config.active_hop),
        payload_len: packet.payload.len(),
    })
}

/// Renders a parse report for a terminal.
pub fn format_parse_pretty(report: &ParseReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "source: {}", report.source);
    let _ = writeln!(output, "destination: {}", report.destination);
    let _ = writeln!(output, "path:");
    if report.path.is_empty() {
        let _ = writeln!(output, "  (empty)");
    }
    for (index, entry) in report.path.iter().enumerate() {
        let marker = if report.active_hop == Some(index) {
            " <- active"
        } else {
            ""
        };
        let detail = match (entry.total, entry.remaining) {
            (Some(total), Some(remaining)) => format!(" {remaining}/{total} hops left"),
            _ => String::new(),
        };
        let _ = writeln!(
            output,
            "  {index}: {} [{}{detail}]{marker}",
            entry.entry, entry.kind
        );
    }
    let _ = write!(output, "payload: {} bytes", report.payload_len);
    output
}
