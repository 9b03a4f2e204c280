//! Routing decisions.
//!
//! [`route`] is a pure function of a packet and a config. Precedence:
//!
//! 1. Loop prevention. Our own callsign anywhere in the path means we already
//!    repeated the packet, unless that entry is the explicit instruction we
//!    are about to act on.
//! 2. The active hop is located.
//! 3. Packets we originated are only routed explicitly, and only with
//!    [`RouterConfig::route_self`].
//! 4. The active hop's classification picks exactly one rule: explicit match,
//!    generic alias, fixed alias or preemption.
//!
//! Path edits never truncate: an insertion past the path limit is a
//! [`RouteError::PathOverflow`].

use std::fmt;

use packet::{Packet, PathEntry};

use crate::classify::{classify, AliasHop, ElementKind, PathElement};
use crate::config::{ActiveHop, AliasRule, ExcessiveHops, Preempt, RouterConfig};
use crate::diagnostics::RoutingAction;
use crate::error::{RouteError, RouteResult};

/// Which rule routed the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchKind {
    /// A path entry named the router.
    Explicit,
    /// A recognised alias was consumed.
    Alias,
}

/// Why a packet was not eligible for digipeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "reason", rename_all = "snake_case")
)]
pub enum NotEligibleReason {
    /// Every path entry is used, or the path is empty.
    PathExhausted,
    /// The active hop names neither the router nor a recognised alias.
    NoMatch { index: usize },
    /// The active hop is a recognised alias with no hops left.
    ExhaustedAlias { index: usize },
    /// The active hop asks for more hops than the alias allows.
    ExcessiveHops { index: usize },
}

/// A decision not to digipeat. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotRouted {
    NotEligible(NotEligibleReason),
    /// The router's callsign is already in the path at `index`.
    AlreadyRouted { index: usize },
    /// The packet's source is the router and no explicit entry may carry it.
    CannotRouteSelf,
}

/// A successfully routed packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    /// The rewritten packet.
    pub packet: Packet,
    pub kind: MatchKind,
    /// Index of the active hop in the input path.
    pub index: usize,
    /// Path edits in application order.
    pub actions: Vec<RoutingAction>,
}

/// Outcome of [`route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    Routed(Routed),
    NotRouted(NotRouted),
}

impl Routing {
    #[must_use]
    pub const fn is_routed(&self) -> bool {
        matches!(self, Self::Routed(_))
    }

    /// The rewritten packet, if routed.
    #[must_use]
    pub const fn packet(&self) -> Option<&Packet> {
        match self {
            Self::Routed(routed) => Some(&routed.packet),
            Self::NotRouted(_) => None,
        }
    }

    /// Converts into the rewritten packet, or the refusal.
    pub fn into_result(self) -> Result<Routed, NotRouted> {
        match self {
            Self::Routed(routed) => Ok(routed),
            Self::NotRouted(decision) => Err(decision),
        }
    }
}

impl fmt::Display for NotEligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathExhausted => write!(f, "path exhausted"),
            Self::NoMatch { index } => write!(f, "no rule matches path entry {index}"),
            Self::ExhaustedAlias { index } => {
                write!(f, "alias at path entry {index} has no hops left")
            }
            Self::ExcessiveHops { index } => {
                write!(f, "alias at path entry {index} requests too many hops")
            }
        }
    }
}

impl fmt::Display for NotRouted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEligible(reason) => write!(f, "not eligible: {reason}"),
            Self::AlreadyRouted { index } => {
                write!(f, "already routed: own callsign at path entry {index}")
            }
            Self::CannotRouteSelf => write!(f, "cannot route self: packet originated here"),
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Alias => write!(f, "alias"),
        }
    }
}

/// Decides whether `config`'s station digipeats `packet`, and rewrites the
/// path if it does.
///
/// # Errors
///
/// Returns [`RouteError::PathOverflow`] if the rewrite needs to insert past
/// `config.limits.max_path_len`.
pub fn route(packet: &Packet, config: &RouterConfig) -> RouteResult<Routing> {
    let active = active_hop(packet, config.active_hop);
    let element = active.map(|index| classify(&packet.path[index], &config.aliases));

    let exempt = match (active, &element) {
        (Some(index), Some(element)) if config.explicit_routing => match element.kind {
            ElementKind::Station(_) if config.is_router_address(&packet.path[index].address) => {
                Some(index)
            }
            ElementKind::Station(_) => preempt_target(packet, config, index),
            ElementKind::Alias(_) if config.preempt_aliases => {
                preempt_target(packet, config, index)
            }
            ElementKind::Alias(_) | ElementKind::Fixed { .. } => None,
        },
        _ => None,
    };

    if let Some(index) = (0..packet.path.len())
        .find(|&i| packet.path[i].address == config.callsign && Some(i) != exempt)
    {
        tracing::debug!(index, "own callsign already in path");
        return Ok(Routing::NotRouted(NotRouted::AlreadyRouted { index }));
    }

    let (Some(index), Some(element)) = (active, element) else {
        return Ok(not_eligible(NotEligibleReason::PathExhausted));
    };

    if packet.source == config.callsign && (!config.route_self || exempt.is_none()) {
        tracing::debug!(index, "packet originated here");
        return Ok(Routing::NotRouted(NotRouted::CannotRouteSelf));
    }

    let mut edit = PathEdit::new(packet, config);
    let kind = match element.kind {
        ElementKind::Station(_) => match exempt {
            Some(target) if target == index => {
                edit.claim(index);
                MatchKind::Explicit
            }
            Some(target) => {
                edit.preempt(index, target);
                MatchKind::Explicit
            }
            None => return Ok(not_eligible(NotEligibleReason::NoMatch { index })),
        },
        ElementKind::Alias(hop) => match exempt {
            Some(target) => {
                edit.preempt(index, target);
                MatchKind::Explicit
            }
            None => {
                let rule = &config.aliases[hop.rule()];
                match route_alias(&mut edit, index, hop, rule, config.excessive_hops)? {
                    Some(reason) => return Ok(not_eligible(reason)),
                    None => MatchKind::Alias,
                }
            }
        },
        ElementKind::Fixed { rule, .. } => {
            if config.aliases[rule].trace {
                edit.replace(index, edit.own_entry());
            } else {
                edit.set_used(index);
            }
            MatchKind::Alias
        }
    };

    tracing::debug!(index, %kind, actions = edit.actions.len(), "routed");
    let PathEdit { path, actions, .. } = edit;
    Ok(Routing::Routed(Routed {
        packet: Packet {
            path,
            ..packet.clone()
        },
        kind,
        index,
        actions,
    }))
}

fn not_eligible(reason: NotEligibleReason) -> Routing {
    tracing::debug!(%reason, "not eligible");
    Routing::NotRouted(NotRouted::NotEligible(reason))
}

/// Index of the path entry the router acts on, if any is left.
#[must_use]
pub fn active_hop(packet: &Packet, strategy: ActiveHop) -> Option<usize> {
    match strategy {
        ActiveHop::FirstUnused => packet.first_unused(),
        ActiveHop::AfterLastUsed => {
            let start = packet.last_used().map_or(0, |index| index + 1);
            (start < packet.path.len()).then_some(start)
        }
    }
}

/// Our own unused entry further down the path, when preemption is enabled.
fn preempt_target(packet: &Packet, config: &RouterConfig, active: usize) -> Option<usize> {
    if config.preempt == Preempt::Off {
        return None;
    }
    packet
        .path
        .iter()
        .enumerate()
        .skip(active + 1)
        .find(|(_, entry)| !entry.used && config.is_router_address(&entry.address))
        .map(|(index, _)| index)
}

/// Consumes one hop of a generic alias. Returns the refusal reason if the
/// alias cannot be routed.
fn route_alias(
    edit: &mut PathEdit<'_>,
    index: usize,
    mut hop: AliasHop,
    rule: &AliasRule,
    policy: ExcessiveHops,
) -> RouteResult<Option<NotEligibleReason>> {
    if hop.remaining() == 0 {
        return Ok(Some(NotEligibleReason::ExhaustedAlias { index }));
    }

    if let Some(max_hops) = rule.max_hops.filter(|&max| hop.exceeds(max)) {
        match policy {
            ExcessiveHops::Allow => {}
            ExcessiveHops::Trap => {
                tracing::debug!(index, %hop, max_hops, "trapping excessive hops");
                edit.replace(index, edit.own_entry());
                return Ok(None);
            }
            ExcessiveHops::Reject => {
                return Ok(Some(NotEligibleReason::ExcessiveHops { index }));
            }
        }
    }

    hop.decrement();
    let exhausted = hop.remaining() == 0;
    let decremented = PathElement {
        kind: ElementKind::Alias(hop),
        used: !rule.trace && exhausted,
    }
    .to_entry()?;

    if !rule.trace {
        edit.decrement(index, decremented);
    } else if exhausted {
        edit.replace(index, edit.own_entry());
    } else {
        edit.insert(index, edit.own_entry())?;
        edit.decrement(index + 1, decremented);
    }
    Ok(None)
}

/// A working copy of the path that records every edit.
struct PathEdit<'a> {
    path: Vec<PathEntry>,
    actions: Vec<RoutingAction>,
    config: &'a RouterConfig,
}

impl<'a> PathEdit<'a> {
    fn new(packet: &Packet, config: &'a RouterConfig) -> Self {
        Self {
            path: packet.path.clone(),
            actions: Vec::new(),
            config,
        }
    }

    fn own_entry(&self) -> PathEntry {
        PathEntry::used(self.config.callsign.clone())
    }

    fn record(&mut self, action: RoutingAction) {
        tracing::trace!(%action, "path edit");
        self.actions.push(action);
    }

    fn insert(&mut self, index: usize, entry: PathEntry) -> RouteResult<()> {
        let limit = self.config.limits.max_path_len;
        if self.path.len() >= limit {
            tracing::debug!(index, limit, "insertion would overflow path");
            return Err(RouteError::PathOverflow { limit });
        }
        self.path.insert(index, entry.clone());
        self.record(RoutingAction::Insert { index, entry });
        Ok(())
    }

    fn remove(&mut self, index: usize) {
        let entry = self.path.remove(index);
        self.record(RoutingAction::Remove { index, entry });
    }

    fn replace(&mut self, index: usize, new: PathEntry) {
        let old = std::mem::replace(&mut self.path[index], new.clone());
        self.record(RoutingAction::Replace { index, old, new });
    }

    fn set_used(&mut self, index: usize) {
        self.path[index].used = true;
        let entry = self.path[index].clone();
        self.record(RoutingAction::Set { index, entry });
    }

    fn decrement(&mut self, index: usize, new: PathEntry) {
        let old = std::mem::replace(&mut self.path[index], new.clone());
        self.record(RoutingAction::Decrement { index, old, new });
    }

    fn move_entry(&mut self, from: usize, to: usize) {
        let entry = self.path.remove(from);
        self.path.insert(to, entry.clone());
        self.record(RoutingAction::Move { from, to, entry });
    }

    /// Marks an entry naming the router used, substituting our own callsign
    /// when configured to.
    fn claim(&mut self, index: usize) {
        if self.config.substitute_explicit && self.path[index].address != self.config.callsign {
            self.replace(index, self.own_entry());
        } else {
            self.set_used(index);
        }
    }

    /// Acts on our entry at `target` while `active` and possibly others ahead
    /// of it are still unused.
    fn preempt(&mut self, active: usize, target: usize) {
        tracing::debug!(active, target, preempt = ?self.config.preempt, "preempting");
        match self.config.preempt {
            // No target is ever found with preemption off.
            Preempt::Off => self.claim(target),
            Preempt::Front => {
                self.move_entry(target, active);
                self.claim(active)
            }
            Preempt::Truncate => {
                let mut target = target;
                for index in (active..target).rev() {
                    if !self.path[index].used {
                        self.remove(index);
                        target -= 1;
                    }
                }
                self.claim(target)
            }
            Preempt::Drop => {
                for index in (0..target).rev() {
                    self.remove(index);
                }
                self.claim(0)
            }
            Preempt::Mark => {
                for index in active..target {
                    if !self.path[index].used {
                        self.set_used(index);
                    }
                }
                self.claim(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packet::{Callsign, Limits, SsidRange};

    fn config(call: &str) -> RouterConfig {
        RouterConfig::parse(call).unwrap()
    }

    fn routed(text: &str, config: &RouterConfig) -> Routed {
        let packet = Packet::parse(text).unwrap();
        match route(&packet, config).unwrap() {
            Routing::Routed(routed) => routed,
            Routing::NotRouted(decision) => panic!("{text}: {decision}"),
        }
    }

    fn routed_text(text: &str, config: &RouterConfig) -> String {
        routed(text, config).packet.to_string()
    }

    fn refused(text: &str, config: &RouterConfig) -> NotRouted {
        let packet = Packet::parse(text).unwrap();
        match route(&packet, config).unwrap() {
            Routing::NotRouted(decision) => decision,
            Routing::Routed(routed) => panic!("{text} routed to {}", routed.packet),
        }
    }

    fn not_eligible(reason: NotEligibleReason) -> NotRouted {
        NotRouted::NotEligible(reason)
    }

    #[test]
    fn single_hop_alias_is_replaced() {
        let routed = routed("N0CALL>APRS,WIDE1-1,WIDE2-2:data", &config("DIGI"));
        assert_eq!(routed.packet.to_string(), "N0CALL>APRS,DIGI*,WIDE2-2:data");
        assert_eq!(routed.kind, MatchKind::Alias);
        assert_eq!(routed.index, 0);
        assert_eq!(
            routed.actions,
            vec![RoutingAction::Replace {
                index: 0,
                old: PathEntry::parse("WIDE1-1").unwrap(),
                new: PathEntry::parse("DIGI*").unwrap(),
            }]
        );
    }

    #[test]
    fn multi_hop_alias_inserts_and_decrements() {
        let routed = routed("N0CALL>APRS,DIGI*,WIDE2-2:data", &config("DIGI2"));
        assert_eq!(
            routed.packet.to_string(),
            "N0CALL>APRS,DIGI*,DIGI2*,WIDE2-1:data"
        );
        let lines: Vec<String> = routed.actions.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["insert DIGI2* at 1", "decrement WIDE2-2 to WIDE2-1 at 2"]
        );
    }

    #[test]
    fn explicit_entry_is_marked_used() {
        let routed = routed("N0CALL>APRS,DIGI,WIDE1-1:data", &config("DIGI"));
        assert_eq!(routed.packet.to_string(), "N0CALL>APRS,DIGI*,WIDE1-1:data");
        assert_eq!(routed.kind, MatchKind::Explicit);
        assert_eq!(routed.actions.len(), 1);
    }

    #[test]
    fn unwritten_remaining_count() {
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE2:data", &config("DIGI")),
            "N0CALL>APRS,DIGI*,WIDE2-1:data"
        );
    }

    #[test]
    fn own_callsign_used_is_already_routed() {
        assert_eq!(
            refused("N0CALL>APRS,DIGI*,WIDE2-1:data", &config("DIGI")),
            NotRouted::AlreadyRouted { index: 0 }
        );
    }

    #[test]
    fn own_callsign_later_in_path_is_already_routed() {
        assert_eq!(
            refused("N0CALL>APRS,WIDE1-1,DIGI:data", &config("DIGI")),
            NotRouted::AlreadyRouted { index: 1 }
        );
    }

    #[test]
    fn explicit_entry_without_explicit_routing_is_a_loop() {
        let config = config("DIGI").with_explicit_routing(false);
        assert_eq!(
            refused("N0CALL>APRS,DIGI,WIDE1-1:data", &config),
            NotRouted::AlreadyRouted { index: 0 }
        );
    }

    #[test]
    fn loop_check_is_exact() {
        // DIGI-1 in the path is a different station from DIGI.
        assert_eq!(
            routed_text("N0CALL>APRS,DIGI-1*,WIDE2-1:data", &config("DIGI")),
            "N0CALL>APRS,DIGI-1*,DIGI*:data"
        );
    }

    #[test]
    fn exhausted_and_empty_paths() {
        let config = config("DIGI");
        assert_eq!(
            refused("N0CALL>APRS,A*,B*:x", &config),
            not_eligible(NotEligibleReason::PathExhausted)
        );
        assert_eq!(
            refused("N0CALL>APRS:x", &config),
            not_eligible(NotEligibleReason::PathExhausted)
        );
    }

    #[test]
    fn foreign_station_is_no_match() {
        assert_eq!(
            refused("N0CALL>APRS,OTHER,WIDE1-1:x", &config("DIGI")),
            not_eligible(NotEligibleReason::NoMatch { index: 0 })
        );
    }

    #[test]
    fn unrecognised_alias_is_no_match() {
        assert_eq!(
            refused("N0CALL>APRS,TRACE2-2:x", &config("DIGI")),
            not_eligible(NotEligibleReason::NoMatch { index: 0 })
        );
    }

    #[test]
    fn zero_remaining_is_exhausted_alias() {
        assert_eq!(
            refused("N0CALL>APRS,WIDE2-0:x", &config("DIGI")),
            not_eligible(NotEligibleReason::ExhaustedAlias { index: 0 })
        );
    }

    #[test]
    fn legacy_alias_only_decrements() {
        let config = config("DIGI").with_aliases(vec![AliasRule::legacy("WIDE")]);
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE2-2:x", &config),
            "N0CALL>APRS,WIDE2-1:x"
        );
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE2-1:x", &config),
            "N0CALL>APRS,WIDE2-0*:x"
        );
    }

    #[test]
    fn insertion_past_limit_overflows() {
        let packet = Packet::parse("N0CALL>APRS,A*,B*,C*,D*,E*,F*,G*,WIDE2-2:x").unwrap();
        assert_eq!(
            route(&packet, &config("DIGI")),
            Err(RouteError::PathOverflow { limit: 8 })
        );

        // Replacement does not grow the path.
        assert_eq!(
            routed_text("N0CALL>APRS,A*,B*,C*,D*,E*,F*,G*,WIDE2-1:x", &config("DIGI")),
            "N0CALL>APRS,A*,B*,C*,D*,E*,F*,G*,DIGI*:x"
        );
    }

    #[test]
    fn overflow_honours_configured_limit() {
        let config = config("DIGI").with_limits(Limits::for_testing());
        let packet = Packet::parse("N0CALL>APRS,A*,B*,C*,WIDE2-2:x").unwrap();
        assert_eq!(
            route(&packet, &config),
            Err(RouteError::PathOverflow { limit: 4 })
        );
    }

    #[test]
    fn excessive_hops_policies() {
        let base = config("DIGI").with_aliases(vec![AliasRule::generic("WIDE").with_max_hops(2)]);
        let text = "N0CALL>APRS,WIDE3-3:x";

        assert_eq!(routed_text(text, &base), "N0CALL>APRS,DIGI*,WIDE3-2:x");

        let trap = base.clone().with_excessive_hops(ExcessiveHops::Trap);
        assert_eq!(routed_text(text, &trap), "N0CALL>APRS,DIGI*:x");

        let reject = base.with_excessive_hops(ExcessiveHops::Reject);
        assert_eq!(
            refused(text, &reject),
            not_eligible(NotEligibleReason::ExcessiveHops { index: 0 })
        );
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE2-2:x", &reject),
            "N0CALL>APRS,DIGI*,WIDE2-1:x"
        );
    }

    #[test]
    fn recommended_config_routes_trace() {
        let config = RouterConfig::recommended(Callsign::parse("DIGI").unwrap());
        assert_eq!(
            routed_text("N0CALL>APRS,TRACE3-3:x", &config),
            "N0CALL>APRS,DIGI*,TRACE3-2:x"
        );
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE7-7:x", &config),
            "N0CALL>APRS,DIGI*:x"
        );
    }

    #[test]
    fn fixed_alias() {
        let config = config("DIGI").with_alias(AliasRule::fixed("RELAY"));
        assert_eq!(
            routed_text("N0CALL>APRS,RELAY,WIDE2-2:x", &config),
            "N0CALL>APRS,DIGI*,WIDE2-2:x"
        );

        let config = config.with_aliases(vec![AliasRule::fixed("RELAY").with_trace(false)]);
        assert_eq!(
            routed_text("N0CALL>APRS,RELAY,WIDE2-2:x", &config),
            "N0CALL>APRS,RELAY*,WIDE2-2:x"
        );
    }

    #[test]
    fn ssid_range_and_substitution() {
        let config = config("DIGI").with_ssid_range(SsidRange::ALL);
        assert_eq!(
            routed_text("N0CALL>APRS,DIGI-3,WIDE1-1:x", &config),
            "N0CALL>APRS,DIGI-3*,WIDE1-1:x"
        );

        let config = config.with_substitute_explicit(true);
        let routed = routed("N0CALL>APRS,DIGI-3,WIDE1-1:x", &config);
        assert_eq!(routed.packet.to_string(), "N0CALL>APRS,DIGI*,WIDE1-1:x");
        assert!(matches!(routed.actions[0], RoutingAction::Replace { .. }));
    }

    #[test]
    fn preempt_strategies() {
        let text = "N0CALL>APRS,CALLA*,CALLB,DIGI,CALLC:x";
        let cases = [
            (Preempt::Front, "N0CALL>APRS,CALLA*,DIGI*,CALLB,CALLC:x"),
            (Preempt::Truncate, "N0CALL>APRS,CALLA*,DIGI*,CALLC:x"),
            (Preempt::Drop, "N0CALL>APRS,DIGI*,CALLC:x"),
            (Preempt::Mark, "N0CALL>APRS,CALLA*,CALLB*,DIGI*,CALLC:x"),
        ];
        for (preempt, expected) in cases {
            let config = config("DIGI").with_preempt(preempt);
            let routed = routed(text, &config);
            assert_eq!(routed.packet.to_string(), expected, "{preempt:?}");
            assert_eq!(routed.kind, MatchKind::Explicit);
            assert_eq!(routed.index, 1);
        }
    }

    #[test]
    fn preempt_off_is_a_loop() {
        assert_eq!(
            refused("N0CALL>APRS,CALLA*,CALLB,DIGI,CALLC:x", &config("DIGI")),
            NotRouted::AlreadyRouted { index: 2 }
        );
    }

    #[test]
    fn preempt_needs_explicit_routing() {
        let config = config("DIGI")
            .with_preempt(Preempt::Front)
            .with_explicit_routing(false);
        assert_eq!(
            refused("N0CALL>APRS,CALLB,DIGI:x", &config),
            NotRouted::AlreadyRouted { index: 1 }
        );
    }

    #[test]
    fn preempt_from_alias_hop() {
        let text = "N0CALL>APRS,WIDE2-0,DIGI,CALLC:data";
        let front = config("DIGI").with_preempt(Preempt::Front);
        assert_eq!(refused(text, &front), NotRouted::AlreadyRouted { index: 1 });

        let front = front.with_preempt_aliases(true);
        let routed = routed(text, &front);
        assert_eq!(routed.packet.to_string(), "N0CALL>APRS,DIGI*,WIDE2-0,CALLC:data");
        assert_eq!(routed.kind, MatchKind::Explicit);
        assert_eq!(routed.index, 0);

        let truncate = config("DIGI")
            .with_preempt(Preempt::Truncate)
            .with_preempt_aliases(true);
        assert_eq!(
            routed_text("N0CALL>APRS,CALLA*,WIDE2-2,DIGI,CALLC:data", &truncate),
            "N0CALL>APRS,CALLA*,DIGI*,CALLC:data"
        );
    }

    #[test]
    fn alias_without_own_entry_ignores_alias_preemption() {
        let config = config("DIGI")
            .with_preempt(Preempt::Front)
            .with_preempt_aliases(true);
        assert_eq!(
            routed_text("N0CALL>APRS,WIDE2-2,CALLC:data", &config),
            "N0CALL>APRS,DIGI*,WIDE2-1,CALLC:data"
        );
        assert_eq!(
            refused("N0CALL>APRS,WIDE2-0,CALLC:data", &config),
            not_eligible(NotEligibleReason::ExhaustedAlias { index: 0 })
        );
    }

    #[test]
    fn own_packets_are_not_routed_through_aliases() {
        let config = config("DIGI");
        assert_eq!(
            refused("DIGI>APRS,WIDE1-1,WIDE2-2:data", &config),
            NotRouted::CannotRouteSelf
        );
        assert_eq!(
            refused("DIGI>APRS,DIGI,WIDE2-2:data", &config),
            NotRouted::CannotRouteSelf
        );

        let config = config.with_route_self(true);
        assert_eq!(
            refused("DIGI>APRS,WIDE1-1,WIDE2-2:data", &config),
            NotRouted::CannotRouteSelf
        );
        assert_eq!(
            routed_text("DIGI>APRS,DIGI:data", &config),
            "DIGI>APRS,DIGI*:data"
        );
    }

    #[test]
    fn other_ssid_of_router_is_not_self() {
        assert_eq!(
            routed_text("DIGI-1>APRS,WIDE1-1:data", &config("DIGI")),
            "DIGI-1>APRS,DIGI*:data"
        );
    }

    #[test]
    fn active_hop_strategies() {
        let packet = Packet::parse("N0CALL>APRS,WIDE1-1,CALLB*,WIDE2-2:x").unwrap();
        assert_eq!(active_hop(&packet, ActiveHop::FirstUnused), Some(0));
        assert_eq!(active_hop(&packet, ActiveHop::AfterLastUsed), Some(2));

        let spent = Packet::parse("N0CALL>APRS,CALLA*:x").unwrap();
        assert_eq!(active_hop(&spent, ActiveHop::FirstUnused), None);
        assert_eq!(active_hop(&spent, ActiveHop::AfterLastUsed), None);
    }

    #[test]
    fn active_hop_after_last_used() {
        let text = "N0CALL>APRS,WIDE1-1,CALLB*,WIDE2-2:x";
        assert_eq!(
            routed_text(text, &config("DIGI")),
            "N0CALL>APRS,DIGI*,CALLB*,WIDE2-2:x"
        );
        let config = config("DIGI").with_active_hop(ActiveHop::AfterLastUsed);
        assert_eq!(
            routed_text(text, &config),
            "N0CALL>APRS,WIDE1-1,CALLB*,DIGI*,WIDE2-1:x"
        );
        assert_eq!(
            refused("N0CALL>APRS,WIDE1-1,CALLB*:x", &config),
            not_eligible(NotEligibleReason::PathExhausted)
        );
    }

    #[test]
    fn payload_is_untouched() {
        let text = "N0CALL>APRS,WIDE1-1:!4903.50N/07201.75W-Test, with: colons*";
        assert_eq!(
            routed_text(text, &config("DIGI")),
            "N0CALL>APRS,DIGI*:!4903.50N/07201.75W-Test, with: colons*"
        );
    }

    #[test]
    fn routing_helpers() {
        let packet = Packet::parse("N0CALL>APRS,WIDE1-1:x").unwrap();
        let routing = route(&packet, &config("DIGI")).unwrap();
        assert!(routing.is_routed());
        assert_eq!(routing.packet().unwrap().to_string(), "N0CALL>APRS,DIGI*:x");
        assert!(routing.into_result().is_ok());

        let refused = route(&packet, &config("OTHER").with_aliases(Vec::new())).unwrap();
        assert!(!refused.is_routed());
        assert!(refused.packet().is_none());
        assert_eq!(
            refused.into_result(),
            Err(not_eligible(NotEligibleReason::NoMatch { index: 0 }))
        );
    }

    #[test]
    fn decision_display() {
        assert_eq!(
            NotRouted::AlreadyRouted { index: 2 }.to_string(),
            "already routed: own callsign at path entry 2"
        );
        assert_eq!(
            not_eligible(NotEligibleReason::PathExhausted).to_string(),
            "not eligible: path exhausted"
        );
        assert_eq!(
            NotRouted::CannotRouteSelf.to_string(),
            "cannot route self: packet originated here"
        );
    }
}
