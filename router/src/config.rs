//! Router identity and routing configuration.

use packet::{Callsign, Limits, ParseResult, SsidRange};

/// How an alias is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AliasKind {
    /// `NAMEn-N`: a hop counter shared by every digipeater on the way.
    #[default]
    Generic,
    /// A bare name such as `RELAY`, consumed by the first digipeater.
    Fixed,
}

/// An alias the router answers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AliasRule {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: AliasKind,
    /// Record the router's callsign in the path when consuming the alias.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub trace: bool,
    /// Hop ceiling for generic aliases; see [`ExcessiveHops`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hops: Option<u8>,
}

impl AliasRule {
    /// A new-paradigm `NAMEn-N` alias that decrements and inserts the router's callsign.
    #[must_use]
    pub fn generic(name: &str) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            kind: AliasKind::Generic,
            trace: true,
            max_hops: None,
        }
    }

    /// A legacy `NAMEn-N` alias that only decrements.
    #[must_use]
    pub fn legacy(name: &str) -> Self {
        Self {
            trace: false,
            ..Self::generic(name)
        }
    }

    /// A single-hop alias replaced by the router's callsign.
    #[must_use]
    pub fn fixed(name: &str) -> Self {
        Self {
            kind: AliasKind::Fixed,
            ..Self::generic(name)
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    #[must_use]
    pub fn with_max_hops(mut self, max_hops: u8) -> Self {
        self.max_hops = Some(max_hops);
        self
    }
}

/// What to do with a generic alias whose hop count exceeds `max_hops`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExcessiveHops {
    /// Route it like any other alias.
    #[default]
    Allow,
    /// Replace the alias with the router's callsign so nobody repeats it again.
    Trap,
    /// Do not digipeat.
    Reject,
}

/// Preemptive explicit routing: acting on our callsign further down the
/// path while unused entries remain ahead of it.
///
/// With the router `DIGI` and the path `CALLA*,CALLB,DIGI,CALLC`:
///
/// | Strategy   | Result                          |
/// |------------|---------------------------------|
/// | `Front`    | `CALLA*,DIGI*,CALLB,CALLC`       |
/// | `Truncate` | `CALLA*,DIGI*,CALLC`             |
/// | `Drop`     | `DIGI*,CALLC`                    |
/// | `Mark`     | `CALLA*,CALLB*,DIGI*,CALLC`      |
///
/// With [`RouterConfig::preempt_aliases`] the active hop may also be a
/// generic alias, so `WIDE2-0,DIGI,CALLC` becomes `DIGI*,WIDE2-0,CALLC`
/// under `Front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preempt {
    #[default]
    Off,
    /// Move our entry to the active position.
    Front,
    /// Remove the unused entries between the active hop and our entry.
    Truncate,
    /// Remove every entry in front of our entry.
    Drop,
    /// Mark the skipped entries used.
    Mark,
}

/// Which path entry the router acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActiveHop {
    /// The first entry without a used marker.
    #[default]
    FirstUnused,
    /// The first entry after the last used marker (AX.25 "has been repeated"
    /// semantics, where only the last repeater is starred).
    AfterLastUsed,
}

/// Identity and behaviour of the routing station.
///
/// Read-only during a call; one config can route any number of packets
/// concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterConfig {
    /// Callsign of the digipeating station.
    pub callsign: Callsign,

    /// SSIDs accepted when an explicit path entry names the router.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ssid_range: Option<SsidRange>,

    /// Recognised aliases, tried in order.
    #[cfg_attr(feature = "serde", serde(default = "default_aliases"))]
    pub aliases: Vec<AliasRule>,

    /// Act on path entries naming the router.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub explicit_routing: bool,

    /// Replace a matched explicit entry with the router's own callsign.
    #[cfg_attr(feature = "serde", serde(default))]
    pub substitute_explicit: bool,

    /// Digipeat packets whose source is the router's callsign. Only
    /// explicit entries are honoured for them; aliases never are.
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_self: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub excessive_hops: ExcessiveHops,

    #[cfg_attr(feature = "serde", serde(default))]
    pub preempt: Preempt,

    /// Also preempt when the active hop is a generic alias, spent or not.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preempt_aliases: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub active_hop: ActiveHop,

    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: Limits,
}

impl RouterConfig {
    /// Creates a config answering to its callsign and to `WIDEn-N`.
    #[must_use]
    pub fn new(callsign: Callsign) -> Self {
        Self {
            callsign,
            ssid_range: None,
            aliases: default_aliases(),
            explicit_routing: true,
            substitute_explicit: false,
            route_self: false,
            excessive_hops: ExcessiveHops::Allow,
            preempt: Preempt::Off,
            preempt_aliases: false,
            active_hop: ActiveHop::FirstUnused,
            limits: Limits::default(),
        }
    }

    /// Parses the router callsign and creates a default config.
    pub fn parse(callsign: &str) -> ParseResult<Self> {
        Callsign::parse(callsign).map(Self::new)
    }

    /// Settings for a wide-area digipeater: `WIDEn-N` capped at two hops
    /// with longer paths trapped, `TRACEn-N`, explicit entries substituted
    /// with the router's callsign, front preemption (aliases included),
    /// explicit routing of our own packets and a bounded payload.
    #[must_use]
    pub fn recommended(callsign: Callsign) -> Self {
        Self {
            aliases: vec![
                AliasRule::generic("WIDE").with_max_hops(2),
                AliasRule::generic("TRACE"),
            ],
            substitute_explicit: true,
            route_self: true,
            excessive_hops: ExcessiveHops::Trap,
            preempt: Preempt::Front,
            preempt_aliases: true,
            limits: Limits::strict(),
            ..Self::new(callsign)
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: Vec<AliasRule>) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: AliasRule) -> Self {
        self.aliases.push(alias);
        self
    }

    #[must_use]
    pub fn with_ssid_range(mut self, range: SsidRange) -> Self {
        self.ssid_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_explicit_routing(mut self, enabled: bool) -> Self {
        self.explicit_routing = enabled;
        self
    }

    #[must_use]
    pub fn with_substitute_explicit(mut self, enabled: bool) -> Self {
        self.substitute_explicit = enabled;
        self
    }

    #[must_use]
    pub fn with_route_self(mut self, enabled: bool) -> Self {
        self.route_self = enabled;
        self
    }

    #[must_use]
    pub fn with_excessive_hops(mut self, policy: ExcessiveHops) -> Self {
        self.excessive_hops = policy;
        self
    }

    #[must_use]
    pub fn with_preempt(mut self, preempt: Preempt) -> Self {
        self.preempt = preempt;
        self
    }

    #[must_use]
    pub fn with_preempt_aliases(mut self, enabled: bool) -> Self {
        self.preempt_aliases = enabled;
        self
    }

    #[must_use]
    pub fn with_active_hop(mut self, active_hop: ActiveHop) -> Self {
        self.active_hop = active_hop;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns `true` if `address` names this router, honouring `ssid_range`.
    #[must_use]
    pub fn is_router_address(&self, address: &Callsign) -> bool {
        address.matches(&self.callsign, self.ssid_range)
    }
}

fn default_aliases() -> Vec<AliasRule> {
    vec![AliasRule::generic("WIDE")]
}

#[cfg(feature = "serde")]
const fn default_true() -> bool {
    true
}
