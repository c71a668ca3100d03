//! Platform-independent core of the desktop info widget.
//!
//! Holds the snapshot value object, the gather orchestration against
//! the platform capability traits, the network selection policy, the
//! window placement math and the overlay event policy. Everything in
//! this crate is pure and runs on any platform; the Windows variants
//! of the capabilities live in `platform-windows`.

pub mod controller;
pub mod gather;
pub mod network;
pub mod placement;
pub mod render;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use controller::{actions_for, OverlayAction, OverlayEvent};
pub use gather::{gather, ComputerSystemInfo, HostIdentity, NetworkProbe, OsDescriptor, SystemProbe};
pub use network::{
    format_mac, select_network, AddressRecord, InterfaceKind, InterfaceRecord, NetworkSelection,
};
pub use placement::{compute_position, Point, Rect, Size};
pub use render::{format_timestamp, render_lines};

/// Placeholder shown for any field that could not be determined.
pub const SENTINEL: &str = "N/A";

/// Distinguished Domain value meaning "not joined to a managed domain".
pub const DOMAIN_FALLBACK: &str = "Lokal Bruker";

/// One immutable record of host identity and network information.
///
/// Every field is always populated: either with a real value or with
/// [`SENTINEL`] (Domain degrades to [`DOMAIN_FALLBACK`] instead). A
/// failure in any one data source never prevents the other fields
/// from being filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfoSnapshot {
    pub computer_name: String,
    pub username: String,
    pub domain: String,
    pub ip_address: String,
    pub mac_address: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub os_name: String,
    pub os_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl Default for SystemInfoSnapshot {
    fn default() -> Self {
        Self {
            computer_name: SENTINEL.to_string(),
            username: SENTINEL.to_string(),
            domain: SENTINEL.to_string(),
            ip_address: SENTINEL.to_string(),
            mac_address: SENTINEL.to_string(),
            serial_number: SENTINEL.to_string(),
            manufacturer: SENTINEL.to_string(),
            os_name: SENTINEL.to_string(),
            os_version: SENTINEL.to_string(),
            last_updated: now_local(),
        }
    }
}

/// Wall-clock time in the local offset, falling back to UTC when the
/// local offset cannot be determined (multi-threaded Unix processes).
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
