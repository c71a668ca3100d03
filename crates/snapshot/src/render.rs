//! Text rendering of a snapshot.
//!
//! Produces the static label lines the overlay window paints. The
//! labels match the product's Norwegian field names.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::SystemInfoSnapshot;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]");

/// One line per field, in display order.
pub fn render_lines(snapshot: &SystemInfoSnapshot) -> Vec<String> {
    vec![
        format!("Datanavn: {}", snapshot.computer_name),
        format!("Bruker: {}", snapshot.username),
        format!("Domene: {}", snapshot.domain),
        format!("IP-adresse: {}", snapshot.ip_address),
        format!("MAC-adresse: {}", snapshot.mac_address),
        format!("SN: {}", snapshot.serial_number),
        format!("Produsent: {}", snapshot.manufacturer),
        format!("Operativsystem: {}", snapshot.os_name),
        format!("Versjon: {}", snapshot.os_version),
        format!("Sist oppdatert: {}", format_timestamp(snapshot.last_updated)),
    ]
}

pub fn format_timestamp(stamp: OffsetDateTime) -> String {
    stamp
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| stamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SENTINEL;
    use time::macros::datetime;

    #[test]
    fn renders_one_line_per_field_in_display_order() {
        let snapshot = SystemInfoSnapshot {
            computer_name: "WS-01".to_string(),
            username: "kari".to_string(),
            last_updated: datetime!(2024-01-02 03:04 UTC),
            ..SystemInfoSnapshot::default()
        };
        let lines = render_lines(&snapshot);
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Datanavn: WS-01");
        assert_eq!(lines[1], "Bruker: kari");
        assert_eq!(lines[2], format!("Domene: {SENTINEL}"));
        assert_eq!(lines[9], "Sist oppdatert: 02.01.2024 03:04");
    }

    #[test]
    fn timestamp_is_zero_padded() {
        let snapshot = SystemInfoSnapshot {
            last_updated: datetime!(2023-11-30 23:59 UTC),
            ..SystemInfoSnapshot::default()
        };
        let lines = render_lines(&snapshot);
        assert_eq!(lines[9], "Sist oppdatert: 30.11.2023 23:59");
    }
}
