//! Management, BIOS and OS descriptor queries via WMI.
//!
//! Each query runs in its own PowerShell invocation so a hung or
//! broken WMI class cannot poison the other fields; the gather layer
//! degrades whichever field's query failed.

#[cfg(target_os = "windows")]
use std::process::Command;

use anyhow::Result;
#[cfg(any(test, target_os = "windows"))]
use anyhow::{anyhow, Context};
#[cfg(any(test, target_os = "windows"))]
use serde_json::Value;

use snapshot::{ComputerSystemInfo, OsDescriptor, SystemProbe};

#[cfg(target_os = "windows")]
use crate::windows_cmd::POWERSHELL_EXE;

/// Windows variant of the management/identity capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSystemProbe;

impl SystemProbe for WindowsSystemProbe {
    /// Domain and Manufacturer in one batched Win32_ComputerSystem query.
    fn computer_system(&self) -> Result<ComputerSystemInfo> {
        #[cfg(target_os = "windows")]
        {
            let cmd = "Get-CimInstance Win32_ComputerSystem | Select-Object -First 1 Domain,Manufacturer | ConvertTo-Json -Compress";
            let raw = run_powershell(cmd).context("Win32_ComputerSystem query produced no output")?;
            parse_computer_system_json(&raw)
        }
        #[cfg(not(target_os = "windows"))]
        {
            tracing::warn!("computer-system probe is a stub on non-Windows");
            anyhow::bail!("Win32_ComputerSystem is only available on Windows")
        }
    }

    fn bios_serial(&self) -> Result<Option<String>> {
        #[cfg(target_os = "windows")]
        {
            let cmd = "Get-CimInstance Win32_BIOS | Select-Object -First 1 SerialNumber | ConvertTo-Json -Compress";
            let raw = run_powershell(cmd).context("Win32_BIOS query produced no output")?;
            parse_bios_serial_json(&raw)
        }
        #[cfg(not(target_os = "windows"))]
        {
            tracing::warn!("BIOS probe is a stub on non-Windows");
            anyhow::bail!("Win32_BIOS is only available on Windows")
        }
    }

    fn os_descriptor(&self) -> Result<OsDescriptor> {
        #[cfg(target_os = "windows")]
        {
            let cmd = "Get-CimInstance Win32_OperatingSystem | Select-Object -First 1 Caption,Version | ConvertTo-Json -Compress";
            let raw =
                run_powershell(cmd).context("Win32_OperatingSystem query produced no output")?;
            parse_os_descriptor_json(&raw)
        }
        #[cfg(not(target_os = "windows"))]
        {
            tracing::warn!("OS descriptor probe is a stub on non-Windows");
            anyhow::bail!("Win32_OperatingSystem is only available on Windows")
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
fn parse_computer_system_json(raw: &str) -> Result<ComputerSystemInfo> {
    let value: Value =
        serde_json::from_str(raw).context("Win32_ComputerSystem output is not valid JSON")?;
    let record = first_record(value)?;
    Ok(ComputerSystemInfo {
        domain: string_field(&record, "Domain"),
        manufacturer: string_field(&record, "Manufacturer"),
    })
}

#[cfg(any(test, target_os = "windows"))]
fn parse_bios_serial_json(raw: &str) -> Result<Option<String>> {
    let value: Value = serde_json::from_str(raw).context("Win32_BIOS output is not valid JSON")?;
    let record = first_record(value)?;
    Ok(string_field(&record, "SerialNumber"))
}

#[cfg(any(test, target_os = "windows"))]
fn parse_os_descriptor_json(raw: &str) -> Result<OsDescriptor> {
    let value: Value =
        serde_json::from_str(raw).context("Win32_OperatingSystem output is not valid JSON")?;
    let record = first_record(value)?;
    Ok(OsDescriptor {
        name: string_field(&record, "Caption"),
        version: string_field(&record, "Version"),
    })
}

/// ConvertTo-Json emits a bare object for a single instance and an
/// array for several; either way only the first record counts.
#[cfg(any(test, target_os = "windows"))]
fn first_record(value: Value) -> Result<Value> {
    match value {
        Value::Array(records) => records
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("query returned an empty instance list")),
        other => Ok(other),
    }
}

#[cfg(any(test, target_os = "windows"))]
fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
