//! Snapshot gathering.
//!
//! `gather` is a total function: every underlying query is guarded
//! independently, a failing source is logged and leaves its fields at
//! the sentinel, and the snapshot is always returned fully populated
//! and stamped.

use anyhow::Result;
use tracing::warn;

use crate::network::{select_network, InterfaceRecord};
use crate::{now_local, SystemInfoSnapshot, DOMAIN_FALLBACK};

/// Batched computer-system record (one query for both fields).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputerSystemInfo {
    pub domain: Option<String>,
    pub manufacturer: Option<String>,
}

/// OS caption and version as reported by the OS descriptor interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsDescriptor {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Management/identity and hardware descriptor queries. One variant
/// per target operating system; the Windows variant shells out to CIM
/// queries, each isolated so one failure cannot poison another.
pub trait SystemProbe {
    fn computer_system(&self) -> Result<ComputerSystemInfo>;
    fn bios_serial(&self) -> Result<Option<String>>;
    fn os_descriptor(&self) -> Result<OsDescriptor>;
}

/// Network interface enumeration capability.
pub trait NetworkProbe {
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>>;
}

/// Process-environment identity, treated as always available.
pub trait HostIdentity {
    fn computer_name(&self) -> Option<String>;
    fn user_name(&self) -> Option<String>;
}

/// Produce one snapshot. Never fails; failing sources degrade
/// field-by-field to the sentinel (Domain to [`DOMAIN_FALLBACK`]).
pub fn gather(
    system: &dyn SystemProbe,
    network: &dyn NetworkProbe,
    identity: &dyn HostIdentity,
) -> SystemInfoSnapshot {
    let mut snapshot = SystemInfoSnapshot::default();

    if let Some(name) = non_empty(identity.computer_name()) {
        snapshot.computer_name = name;
    }
    if let Some(user) = non_empty(identity.user_name()) {
        snapshot.username = user;
    }

    match system.computer_system() {
        Ok(info) => {
            // An absent domain value means the machine is not joined
            // to a managed domain, same as a failed query.
            snapshot.domain =
                non_empty(info.domain).unwrap_or_else(|| DOMAIN_FALLBACK.to_string());
            if let Some(manufacturer) = non_empty(info.manufacturer) {
                snapshot.manufacturer = manufacturer;
            }
        }
        Err(err) => {
            warn!(error = %err, "computer-system query failed");
            snapshot.domain = DOMAIN_FALLBACK.to_string();
        }
    }

    match system.bios_serial() {
        Ok(serial) => {
            if let Some(serial) = non_empty(serial) {
                snapshot.serial_number = serial;
            }
        }
        Err(err) => warn!(error = %err, "BIOS serial query failed"),
    }

    match system.os_descriptor() {
        Ok(descriptor) => {
            if let Some(name) = non_empty(descriptor.name) {
                snapshot.os_name = name;
            }
            if let Some(version) = non_empty(descriptor.version) {
                snapshot.os_version = version;
            }
        }
        Err(err) => warn!(error = %err, "OS descriptor query failed"),
    }

    match network.interfaces() {
        Ok(interfaces) => {
            let selection = select_network(&interfaces);
            if let Some(mac) = selection.mac_address {
                snapshot.mac_address = mac;
            }
            if let Some(ip) = selection.ip_address {
                snapshot.ip_address = ip;
            }
        }
        Err(err) => warn!(error = %err, "network interface enumeration failed"),
    }

    snapshot.last_updated = now_local();
    snapshot
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
