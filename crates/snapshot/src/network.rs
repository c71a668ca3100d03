//! Network interface selection policy.
//!
//! Picks one MAC and one IPv4 address from an enumerated interface
//! list: wired interfaces are preferred over everything else, an
//! all-zero hardware address counts as absent, and DNS-eligible
//! addresses win within an interface. The enumeration itself is a
//! platform capability; this policy is pure and deterministic.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceKind {
    Ethernet,
    Wireless,
    Loopback,
    Other,
}

/// One unicast address on an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub address: IpAddr,
    /// Whether the OS considers the address registrable in DNS.
    pub dns_eligible: bool,
}

/// One enumerated network interface, platform-neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub kind: InterfaceKind,
    pub is_up: bool,
    /// Raw hardware address; separators are ignored, only the hex
    /// digits count.
    pub hardware_address: Option<String>,
    pub addresses: Vec<AddressRecord>,
}

/// Result of the selection walk. `None` means the corresponding
/// snapshot field keeps its sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSelection {
    pub mac_address: Option<String>,
    pub ip_address: Option<String>,
}

/// Walk the interface list and pick one MAC and one IPv4 address.
///
/// Candidates are the operationally-up, non-loopback interfaces,
/// Ethernet-class first with relative order preserved within each
/// class. The walk stops as soon as both values are assigned; the MAC
/// and the IP may come from different interfaces.
pub fn select_network(interfaces: &[InterfaceRecord]) -> NetworkSelection {
    let mut candidates: Vec<&InterfaceRecord> = interfaces
        .iter()
        .filter(|iface| iface.is_up && iface.kind != InterfaceKind::Loopback)
        .collect();
    // Stable sort: wired before everything else.
    candidates.sort_by_key(|iface| iface.kind != InterfaceKind::Ethernet);

    let mut selection = NetworkSelection::default();
    for iface in candidates {
        if selection.mac_address.is_none() {
            selection.mac_address = iface.hardware_address.as_deref().and_then(format_mac);
        }
        if selection.ip_address.is_none() {
            selection.ip_address = first_ipv4(&iface.addresses);
        }
        if selection.mac_address.is_some() && selection.ip_address.is_some() {
            break;
        }
    }
    selection
}

/// Format a raw hardware address as six two-character hex groups
/// joined by `-`, preserving digit order.
///
/// Returns `None` for anything that is not exactly twelve hex digits
/// once separators are stripped, and for the all-zero address, which
/// is treated as absent.
pub fn format_mac(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_hexdigit).collect();
    if digits.len() != 12 || digits.chars().all(|c| c == '0') {
        return None;
    }
    let groups: Vec<String> = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect();
    Some(groups.join("-"))
}

/// First IPv4, non-loopback address, DNS-eligible addresses first
/// (relative order otherwise preserved).
fn first_ipv4(addresses: &[AddressRecord]) -> Option<String> {
    let mut ipv4: Vec<&AddressRecord> = addresses
        .iter()
        .filter(|addr| matches!(addr.address, IpAddr::V4(ip) if !ip.is_loopback()))
        .collect();
    ipv4.sort_by_key(|addr| !addr.dns_eligible);
    ipv4.first().map(|addr| addr.address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    fn addr(ip: [u8; 4], dns_eligible: bool) -> AddressRecord {
        AddressRecord {
            address: IpAddr::V4(Ipv4Addr::from(ip)),
            dns_eligible,
        }
    }

    fn iface(
        name: &str,
        kind: InterfaceKind,
        is_up: bool,
        mac: Option<&str>,
        addresses: Vec<AddressRecord>,
    ) -> InterfaceRecord {
        InterfaceRecord {
            name: name.to_string(),
            kind,
            is_up,
            hardware_address: mac.map(str::to_string),
            addresses,
        }
    }

    #[test]
    fn formats_raw_mac_into_dash_separated_groups() {
        assert_eq!(
            format_mac("AABBCCDDEEFF").as_deref(),
            Some("AA-BB-CC-DD-EE-FF")
        );
    }

    #[test]
    fn mac_separators_in_input_are_ignored() {
        assert_eq!(
            format_mac("00:11:22:33:44:55").as_deref(),
            Some("00-11-22-33-44-55")
        );
    }

    #[test]
    fn all_zero_mac_is_treated_as_absent() {
        assert_eq!(format_mac("000000000000"), None);
        assert_eq!(format_mac("00:00:00:00:00:00"), None);
    }

    #[test]
    fn short_or_garbage_mac_is_rejected() {
        assert_eq!(format_mac(""), None);
        assert_eq!(format_mac("AABBCC"), None);
        assert_eq!(format_mac("not a mac at all"), None);
    }

    #[test]
    fn ethernet_wins_over_wireless_regardless_of_enumeration_order() {
        let interfaces = vec![
            iface(
                "wlan0",
                InterfaceKind::Wireless,
                true,
                Some("667788990011"),
                vec![addr([10, 0, 0, 9], true)],
            ),
            iface(
                "eth0",
                InterfaceKind::Ethernet,
                true,
                Some("001122334455"),
                vec![addr([10, 0, 0, 5], true)],
            ),
        ];
        let selection = select_network(&interfaces);
        assert_eq!(selection.mac_address.as_deref(), Some("00-11-22-33-44-55"));
        assert_eq!(selection.ip_address.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn mac_and_ip_may_come_from_different_interfaces() {
        // Wired interface with a MAC but no IPv4 address; wireless
        // carries the address.
        let interfaces = vec![
            iface(
                "eth0",
                InterfaceKind::Ethernet,
                true,
                Some("001122334455"),
                Vec::new(),
            ),
            iface(
                "wlan0",
                InterfaceKind::Wireless,
                true,
                Some("667788990011"),
                vec![addr([192, 168, 1, 20], true)],
            ),
        ];
        let selection = select_network(&interfaces);
        assert_eq!(selection.mac_address.as_deref(), Some("00-11-22-33-44-55"));
        assert_eq!(selection.ip_address.as_deref(), Some("192.168.1.20"));
    }

    #[test]
    fn zero_mac_interface_is_skipped_for_mac_but_can_supply_ip() {
        let interfaces = vec![
            iface(
                "tun0",
                InterfaceKind::Ethernet,
                true,
                Some("000000000000"),
                vec![addr([10, 8, 0, 2], true)],
            ),
            iface(
                "wlan0",
                InterfaceKind::Wireless,
                true,
                Some("667788990011"),
                vec![addr([10, 0, 0, 9], true)],
            ),
        ];
        let selection = select_network(&interfaces);
        assert_eq!(selection.mac_address.as_deref(), Some("66-77-88-99-00-11"));
        assert_eq!(selection.ip_address.as_deref(), Some("10.8.0.2"));
    }

    #[test]
    fn down_and_loopback_interfaces_yield_nothing() {
        let interfaces = vec![
            iface(
                "eth0",
                InterfaceKind::Ethernet,
                false,
                Some("001122334455"),
                vec![addr([10, 0, 0, 5], true)],
            ),
            iface(
                "lo",
                InterfaceKind::Loopback,
                true,
                Some("AABBCCDDEEFF"),
                vec![addr([127, 0, 0, 1], true)],
            ),
        ];
        let selection = select_network(&interfaces);
        assert_eq!(selection, NetworkSelection::default());
    }

    #[test]
    fn dns_eligible_address_preferred_within_an_interface() {
        let interfaces = vec![iface(
            "eth0",
            InterfaceKind::Ethernet,
            true,
            Some("001122334455"),
            vec![addr([169, 254, 10, 1], false), addr([10, 0, 0, 5], true)],
        )];
        let selection = select_network(&interfaces);
        assert_eq!(selection.ip_address.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn ipv6_and_loopback_addresses_are_ignored() {
        let interfaces = vec![iface(
            "eth0",
            InterfaceKind::Ethernet,
            true,
            Some("001122334455"),
            vec![
                AddressRecord {
                    address: IpAddr::V6(Ipv6Addr::LOCALHOST),
                    dns_eligible: true,
                },
                AddressRecord {
                    address: IpAddr::V4(Ipv4Addr::LOCALHOST),
                    dns_eligible: true,
                },
            ],
        )];
        let selection = select_network(&interfaces);
        assert_eq!(selection.ip_address, None);
        assert_eq!(selection.mac_address.as_deref(), Some("00-11-22-33-44-55"));
    }

    #[test]
    fn empty_interface_list_selects_nothing() {
        assert_eq!(select_network(&[]), NetworkSelection::default());
    }
}
