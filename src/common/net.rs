//! Pure address arithmetic shared by every evaluator
//!
//! CIDR containment and overlap, protocol-name normalization, port-range
//! containment, and the private/externally-routable classification used by
//! the edge gateways. No I/O, no state beyond a process-constant range
//! table.

use std::net::IpAddr;

use ipnet::IpNet;
use lazy_static::lazy_static;

lazy_static! {
    /// Ranges that are never externally routable, both address families.
    static ref SPECIAL_RANGES: Vec<IpNet> = [
        "10.0.0.0/8",      // RFC1918
        "172.16.0.0/12",   // RFC1918
        "192.168.0.0/16",  // RFC1918
        "100.64.0.0/10",   // carrier-grade NAT
        "169.254.0.0/16",  // link-local
        "127.0.0.0/8",     // loopback
        "0.0.0.0/8",       // current network
        "fc00::/7",        // unique local
        "fe80::/10",       // link-local
        "::1/128",         // loopback
        "::/128",          // unspecified
    ]
    .iter()
    .map(|cidr| cidr.parse().expect("special range table is well-formed"))
    .collect();
}

/// Check whether `ip` falls inside `cidr`.
///
/// Accepts a bare address as a degenerate single-host range. Malformed
/// input never matches.
pub fn cidr_contains(cidr: &str, ip: IpAddr) -> bool {
    if let Ok(net) = cidr.parse::<IpNet>() {
        return net.contains(&ip);
    }
    if let Ok(single) = cidr.parse::<IpAddr>() {
        return single == ip;
    }
    false
}

/// Prefix length of `cidr` if it contains `ip`, for longest-prefix-match.
pub fn containing_prefix_len(cidr: &str, ip: IpAddr) -> Option<u8> {
    let net = cidr.parse::<IpNet>().ok()?;
    if net.contains(&ip) {
        Some(net.prefix_len())
    } else {
        None
    }
}

/// Check whether two ranges share any address.
pub fn cidrs_overlap(a: &str, b: &str) -> bool {
    let (Ok(a), Ok(b)) = (a.parse::<IpNet>(), b.parse::<IpNet>()) else {
        return false;
    };
    a.contains(&b.network()) || b.contains(&a.network())
}

/// Normalize a protocol name or number to its canonical lowercase name.
///
/// Cloud rule sets carry protocols as either names or IANA numbers; "-1" is
/// the wildcard.
pub fn normalize_protocol(protocol: &str) -> String {
    match protocol.trim() {
        "-1" | "" => "any".to_string(),
        "6" => "tcp".to_string(),
        "17" => "udp".to_string(),
        "1" => "icmp".to_string(),
        "58" => "icmpv6".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

/// Check whether a rule's protocol admits the target's protocol.
pub fn protocols_match(rule_protocol: &str, target_protocol: &str) -> bool {
    let rule = normalize_protocol(rule_protocol);
    rule == "any" || rule == normalize_protocol(target_protocol)
}

/// Check whether `port` falls inside a rule's from/to pair.
///
/// A 0/0 pair means "all ports"; some rule sets carry -1/-1 for protocols
/// without ports, which also matches everything.
pub fn port_in_range(from: i64, to: i64, port: u16) -> bool {
    if (from == 0 && to == 0) || (from == -1 && to == -1) {
        return true;
    }
    i64::from(port) >= from && i64::from(port) <= to
}

/// True for IPv6 addresses.
pub fn is_ipv6(ip: IpAddr) -> bool {
    ip.is_ipv6()
}

/// True for IPv4 addresses.
pub fn is_ipv4(ip: IpAddr) -> bool {
    ip.is_ipv4()
}

/// True when `ip` belongs to a range that is never externally routable.
pub fn is_private(ip: IpAddr) -> bool {
    SPECIAL_RANGES.iter().any(|net| net.contains(&ip))
}

/// True when `ip` can appear on the public internet.
pub fn is_externally_routable(ip: IpAddr) -> bool {
    !is_private(ip)
}
