#![no_main]

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use libfuzzer_sys::fuzz_target;
use snapshot::{
    format_mac, select_network, AddressRecord, InterfaceKind, InterfaceRecord,
};

fn bounded_text(data: &[u8], offset: usize, len: usize) -> String {
    let start = offset.min(data.len());
    let end = (start + len).min(data.len());
    String::from_utf8_lossy(&data[start..end]).to_string()
}

fn interface_kind(tag: u8) -> InterfaceKind {
    match tag % 4 {
        0 => InterfaceKind::Ethernet,
        1 => InterfaceKind::Wireless,
        2 => InterfaceKind::Loopback,
        _ => InterfaceKind::Other,
    }
}

fn address(chunk: &[u8]) -> AddressRecord {
    let ip = match chunk.first().copied().unwrap_or_default() % 3 {
        0 => IpAddr::V4(Ipv4Addr::new(
            chunk.get(1).copied().unwrap_or_default(),
            chunk.get(2).copied().unwrap_or_default(),
            chunk.get(3).copied().unwrap_or_default(),
            chunk.get(4).copied().unwrap_or_default(),
        )),
        1 => IpAddr::V4(Ipv4Addr::LOCALHOST),
        _ => IpAddr::V6(Ipv6Addr::LOCALHOST),
    };
    AddressRecord {
        address: ip,
        dns_eligible: chunk.get(5).copied().unwrap_or_default() % 2 == 0,
    }
}

fuzz_target!(|data: &[u8]| {
    let interfaces: Vec<InterfaceRecord> = data
        .chunks(16)
        .enumerate()
        .map(|(index, chunk)| InterfaceRecord {
            name: format!("if{index}"),
            kind: interface_kind(chunk.first().copied().unwrap_or_default()),
            is_up: chunk.get(1).copied().unwrap_or_default() % 2 == 0,
            hardware_address: chunk.get(2).map(|_| bounded_text(chunk, 2, 12)),
            addresses: vec![address(&chunk[chunk.len().min(6)..])],
        })
        .collect();

    let selection = select_network(&interfaces);

    if let Some(mac) = &selection.mac_address {
        // Selected MACs are always fully formatted six-group values.
        assert_eq!(mac.len(), 17);
        assert_eq!(mac.matches('-').count(), 5);
        assert_ne!(mac, "00-00-00-00-00-00");
    }
    if let Some(ip) = &selection.ip_address {
        let parsed: IpAddr = ip.parse().expect("selected IP parses back");
        assert!(parsed.is_ipv4());
        assert!(!parsed.is_loopback());
    }

    // The raw formatter must never panic on arbitrary text.
    let _ = format_mac(&bounded_text(data, 0, 64));
});
