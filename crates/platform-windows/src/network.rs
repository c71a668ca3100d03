//! Network adapter enumeration.
//!
//! One PowerShell invocation joins Get-NetAdapter with the IPv4
//! addresses of each adapter and emits platform-neutral interface
//! records; the selection policy in the snapshot crate does the rest.
//! SkipAsSource is the Win32 analogue of DNS eligibility: an address
//! excluded as source is not registered in DNS.

#[cfg(target_os = "windows")]
use std::process::Command;

use anyhow::Result;
#[cfg(any(test, target_os = "windows"))]
use anyhow::Context;
#[cfg(any(test, target_os = "windows"))]
use serde_json::Value;

use snapshot::{InterfaceKind, InterfaceRecord, NetworkProbe};
#[cfg(any(test, target_os = "windows"))]
use snapshot::AddressRecord;

#[cfg(target_os = "windows")]
use crate::windows_cmd::POWERSHELL_EXE;

/// Windows variant of the network enumeration capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsNetworkProbe;

impl NetworkProbe for WindowsNetworkProbe {
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
        #[cfg(target_os = "windows")]
        {
            let cmd = "$records = Get-NetAdapter | ForEach-Object { $ips = @(Get-NetIPAddress -InterfaceIndex $_.ifIndex -AddressFamily IPv4 -ErrorAction SilentlyContinue | ForEach-Object { [pscustomobject]@{ address = $_.IPAddress; skip_as_source = [bool]$_.SkipAsSource } }); [pscustomobject]@{ name = $_.Name; physical_media = [string]$_.PhysicalMediaType; status = [string]$_.Status; mac_address = [string]$_.MacAddress; addresses = $ips } }; ConvertTo-Json -Compress -Depth 4 -InputObject @($records)";
            let raw = run_powershell(cmd).context("adapter enumeration produced no output")?;
            parse_interfaces_json(&raw)
        }
        #[cfg(not(target_os = "windows"))]
        {
            tracing::warn!("network probe is a stub on non-Windows");
            anyhow::bail!("adapter enumeration is only available on Windows")
        }
    }
}

#[cfg(target_os = "windows")]
fn run_powershell(command: &str) -> Option<String> {
    let output = Command::new(POWERSHELL_EXE)
        .args(["-NoProfile", "-NonInteractive", "-Command", command])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

#[cfg(any(test, target_os = "windows"))]
fn parse_interfaces_json(raw: &str) -> Result<Vec<InterfaceRecord>> {
    let value: Value =
        serde_json::from_str(raw).context("adapter enumeration output is not valid JSON")?;
    let records = match value {
        Value::Array(records) => records,
        single => vec![single],
    };

    Ok(records
        .into_iter()
        .filter_map(|entry| {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())?
                .to_string();
            let physical_media = entry
                .get("physical_media")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let status = entry
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or_default();

            Some(InterfaceRecord {
                kind: classify_interface(&name, physical_media),
                is_up: status.eq_ignore_ascii_case("up"),
                hardware_address: entry
                    .get("mac_address")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(ToString::to_string),
                addresses: parse_addresses(entry.get("addresses")),
                name,
            })
        })
        .collect())
}

#[cfg(any(test, target_os = "windows"))]
fn parse_addresses(value: Option<&Value>) -> Vec<AddressRecord> {
    let Some(Value::Array(entries)) = value else {
        // A single address serializes as a bare object.
        if let Some(entry @ Value::Object(_)) = value {
            return parse_address(entry).into_iter().collect();
        }
        return Vec::new();
    };
    entries.iter().filter_map(parse_address).collect()
}

#[cfg(any(test, target_os = "windows"))]
fn parse_address(entry: &Value) -> Option<AddressRecord> {
    let address = entry.get("address").and_then(Value::as_str)?.parse().ok()?;
    let skip_as_source = entry
        .get("skip_as_source")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(AddressRecord {
        address,
        dns_eligible: !skip_as_source,
    })
}

/// Classify an adapter from its physical media type, with the name as
/// the tiebreaker for the loopback pseudo-adapter.
#[cfg(any(test, target_os = "windows"))]
fn classify_interface(name: &str, physical_media: &str) -> InterfaceKind {
    let media = physical_media.to_ascii_lowercase();
    if name.to_ascii_lowercase().contains("loopback") || media.contains("loopback") {
        InterfaceKind::Loopback
    } else if media.contains("802.11") || media.contains("wireless") {
        InterfaceKind::Wireless
    } else if media.contains("802.3") {
        InterfaceKind::Ethernet
    } else {
        InterfaceKind::Other
    }
}
