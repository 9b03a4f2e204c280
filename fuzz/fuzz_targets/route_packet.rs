#![no_main]

use libfuzzer_sys::fuzz_target;
use router::{route_into, ActiveHop, AliasRule, Preempt, RouterConfig, SsidRange};

fn config(selector: u8) -> RouterConfig {
    let preempt = match selector % 5 {
        0 => Preempt::Off,
        1 => Preempt::Front,
        2 => Preempt::Truncate,
        3 => Preempt::Drop,
        _ => Preempt::Mark,
    };
    let mut config = RouterConfig::parse("DIGI")
        .expect("valid callsign")
        .with_alias(AliasRule::legacy("TRACE"))
        .with_alias(AliasRule::fixed("RELAY"))
        .with_preempt(preempt)
        .with_substitute_explicit(selector & 0x08 != 0)
        .with_route_self(selector & 0x01 != 0)
        .with_preempt_aliases(selector & 0x02 != 0);
    if selector & 0x10 != 0 {
        config = config.with_ssid_range(SsidRange::ALL);
    }
    if selector & 0x20 != 0 {
        config = config.with_active_hop(ActiveHop::AfterLastUsed);
    }
    config
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let config = config(selector);
    let capacity = usize::from(selector >> 6) * 64;
    let mut out = vec![0u8; capacity];
    if let Ok(len) = route_into(text, &config, &mut out) {
        assert!(len < out.len());
        assert_eq!(out[len], 0);
        let routed = std::str::from_utf8(&out[..len]).expect("routed packet is utf-8");
        assert!(packet::Packet::parse_with_limits(routed, &config.limits).is_ok());
    }
});
