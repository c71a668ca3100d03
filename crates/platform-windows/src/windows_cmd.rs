//! Canonical Windows system command paths.
//!
//! Absolute paths avoid PATH-search hijacking when spawning query
//! subprocesses from a widget that runs at every login.

#[cfg(target_os = "windows")]
pub(crate) const POWERSHELL_EXE: &str =
    r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
