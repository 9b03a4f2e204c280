//! Path element classification.
//!
//! Every path entry is syntactically a callsign. Whether `WIDE2-1` is a hop
//! counter or a station that happens to be called `WIDE2` depends on the
//! aliases the router recognises, so classification needs the alias table.

use std::fmt;

use packet::{Callsign, ParseResult, PathEntry};

use crate::config::{AliasKind, AliasRule};

/// Largest `n` in an `NAMEn-N` alias.
pub const MAX_ALIAS_HOPS: u8 = 7;

/// A generic `NAMEn-N` hop counter.
///
/// Rendered from its state: `NAME<total>-<remaining>`, or `NAME<total>` while
/// the remaining count was never written and is still equal to the total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasHop {
    name: String,
    total: u8,
    remaining: u8,
    remaining_written: bool,
    rule: usize,
}

impl AliasHop {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `n` of `NAMEn-N`: hops requested by the sender.
    #[must_use]
    pub const fn total(&self) -> u8 {
        self.total
    }

    /// The `N` of `NAMEn-N`: hops left.
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Index of the matching rule in the router's alias list.
    #[must_use]
    pub const fn rule(&self) -> usize {
        self.rule
    }

    /// Returns `true` if either count is above `max_hops`.
    #[must_use]
    pub const fn exceeds(&self, max_hops: u8) -> bool {
        self.total > max_hops || self.remaining > max_hops
    }

    /// Consumes one hop. Returns `false` if none were left.
    pub fn decrement(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining_written = true;
        true
    }

    /// Rebuilds the address from name and counts.
    pub fn to_callsign(&self) -> ParseResult<Callsign> {
        Callsign::from_parts(
            &format!("{}{}", self.name, self.total),
            self.remaining,
            self.remaining_written,
        )
    }
}

impl fmt::Display for AliasHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.total)?;
        if self.remaining_written || self.remaining != self.total {
            write!(f, "-{}", self.remaining)?;
        }
        Ok(())
    }
}

/// What a path entry means to this router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An explicit station address.
    Station(Callsign),
    /// A recognised generic alias.
    Alias(AliasHop),
    /// A recognised fixed alias; holds the index of its rule.
    Fixed { address: Callsign, rule: usize },
}

/// A classified path entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathElement {
    pub kind: ElementKind,
    pub used: bool,
}

impl PathElement {
    #[must_use]
    pub const fn is_station(&self) -> bool {
        matches!(self.kind, ElementKind::Station(_))
    }

    /// Renders the element back to a wire entry.
    pub fn to_entry(&self) -> ParseResult<PathEntry> {
        let address = match &self.kind {
            ElementKind::Station(address) | ElementKind::Fixed { address, .. } => {
                address.clone()
            }
            ElementKind::Alias(hop) => hop.to_callsign()?,
        };
        Ok(PathEntry::new(address, self.used))
    }
}

/// Classifies a path entry against the alias list; the first matching rule
/// wins and anything unmatched is a station address.
#[must_use]
pub fn classify(entry: &PathEntry, aliases: &[AliasRule]) -> PathElement {
    let kind = aliases
        .iter()
        .enumerate()
        .find_map(|(rule, alias)| match_rule(&entry.address, alias, rule))
        .unwrap_or_else(|| ElementKind::Station(entry.address.clone()));
    PathElement {
        kind,
        used: entry.used,
    }
}

fn match_rule(address: &Callsign, alias: &AliasRule, rule: usize) -> Option<ElementKind> {
    let base = address.base();
    match alias.kind {
        AliasKind::Fixed => (base.eq_ignore_ascii_case(&alias.name) && !address.has_ssid())
            .then(|| ElementKind::Fixed {
                address: address.clone(),
                rule,
            }),
        AliasKind::Generic => {
            let prefix = base.get(..alias.name.len())?;
            if !prefix.eq_ignore_ascii_case(&alias.name) {
                return None;
            }
            let total = match base[alias.name.len()..].as_bytes() {
                [digit @ b'1'..=b'7'] => digit - b'0',
                _ => return None,
            };
            debug_assert!(total <= MAX_ALIAS_HOPS);
            let remaining = if address.has_ssid() {
                address.ssid()
            } else {
                total
            };
            Some(ElementKind::Alias(AliasHop {
                name: base[..alias.name.len()].to_string(),
                total,
                remaining,
                remaining_written: address.has_ssid(),
                rule,
            }))
        }
    }
}
