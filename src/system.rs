//! Host statistics from `sysinfo`, plus package managers and `df`

use std::path::Path;
use std::process::{Command, Stdio};

use sysinfo::System;

use crate::config::Environment;

/// Placeholder for anything that could not be determined
pub const UNKNOWN: &str = "Unknown";

/// Package managers probed in order, with the arguments listing one
/// package per line
const PACKAGE_MANAGERS: &[(&str, &str, &[&str])] = &[
    ("pacman", "pacman", &["-Qq"]),
    ("dpkg", "dpkg-query", &["-f", ".\n", "-W"]),
    ("rpm", "rpm", &["-qa"]),
    ("brew", "brew", &["list", "-1"]),
    ("nix", "nix-store", &["-qR", "/run/current-system/sw"]),
];

/// Snapshot of the host displayed next to the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// Host name
    pub hostname: String,
    /// Current user
    pub user: String,
    /// Operating system (distribution name when known)
    pub os: String,
    /// Kernel release
    pub kernel: String,
    /// Human-readable uptime
    pub uptime: String,
    /// Installed package count and manager
    pub packages: String,
    /// Login shell name
    pub shell: String,
    /// CPU model
    pub cpu: String,
    /// Used / total memory
    pub memory: String,
    /// Used / total space on /
    pub disk: String,
}

impl SystemInfo {
    /// Collect everything; missing pieces become [`UNKNOWN`]
    pub fn gather(env: &Environment) -> Self {
        let sys = System::new_all();

        let info = Self {
            hostname: System::host_name().unwrap_or_else(unknown),
            user: env.user.clone().unwrap_or_else(unknown),
            os: System::long_os_version()
                .or_else(System::name)
                .unwrap_or_else(|| std::env::consts::OS.to_string()),
            kernel: System::kernel_version().unwrap_or_else(unknown),
            uptime: format_uptime(System::uptime()),
            packages: package_count().unwrap_or_else(|| "unknown".to_string()),
            shell: env
                .shell
                .as_deref()
                .and_then(shell_name)
                .unwrap_or_else(unknown),
            cpu: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
                .unwrap_or_else(|| "Unknown CPU".to_string()),
            memory: format_memory(
                sys.total_memory().saturating_sub(sys.available_memory()),
                sys.total_memory(),
            )
            .unwrap_or_else(unknown),
            disk: run_command("df", &["-h", "/"])
                .and_then(|s| parse_df(&s))
                .unwrap_or_else(unknown),
        };

        tracing::debug!("Gathered system info: {info:?}");
        info
    }

/// Labelled rows in display order
    pub fn rows(&self) -> [(&'static str, &str); 8] {
        [
            ("OS", self.os.as_str()),
            ("Kernel", self.kernel.as_str()),
            ("Uptime", self.uptime.as_str()),
            ("Packages", self.packages.as_str()),
            ("Shell", self.shell.as_str()),
            ("CPU", self.cpu.as_str()),
            ("Memory", self.memory.as_str()),
            ("Disk", self.disk.as_str()),
        ]
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Run a command and return its trimmed stdout if it succeeded with output
fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!stdout.is_empty()).then_some(stdout)
}

/// First package manager with a non-empty listing, as `"<n> (<name>)"`
fn package_count() -> Option<String> {
    PACKAGE_MANAGERS.iter().find_map(|(name, program, args)| {
        let listing = run_command(program, args)?;
        let count = listing.lines().filter(|l| !l.trim().is_empty()).count();
        (count > 0).then(|| format!("{count} ({name})"))
    })
}

/// Used and total size of the first filesystem in `df -h` output
fn parse_df(output: &str) -> Option<String> {
    let fields: Vec<&str> = output.lines().nth(1)?.split_whitespace().collect();
    if fields.len() < 5 {
        return None;
    }
    Some(format!("{} / {}", fields[2], fields[1]))
}

/// Seconds since boot as `2 days, 3 hours, 4 mins`
fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{days} days, {hours} hours, {minutes} mins")
    } else if hours > 0 {
        format!("{hours} hours, {minutes} mins")
    } else {
        format!("{minutes} mins")
    }
}

/// Used and total memory in MiB, from byte counts
fn format_memory(used: u64, total: u64) -> Option<String> {
    const MIB: u64 = 1024 * 1024;
    (total > 0).then(|| format!("{}MiB / {}MiB", used / MIB, total / MIB))
}

/// Basename of a shell path (`/usr/bin/zsh` → `zsh`)
fn shell_name(shell: &str) -> Option<String> {
    Path::new(shell)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0 mins");
        assert_eq!(format_uptime(3 * 3600 + 5 * 60), "3 hours, 5 mins");
        assert_eq!(format_uptime(2 * 86400 + 3600 + 60), "2 days, 1 hours, 1 mins");
    }

    #[test]
    fn test_format_memory() {
        let gib = 1024 * 1024 * 1024;
        assert_eq!(
            format_memory(4 * gib, 16 * gib).as_deref(),
            Some("4096MiB / 16384MiB")
        );
        assert_eq!(format_memory(0, 0), None);
    }

    #[test]
    fn test_parse_df() {
        let output = "Filesystem      Size  Used Avail Use% Mounted on\n\
                      /dev/nvme0n1p2  468G  201G  244G  46% /\n";
        assert_eq!(parse_df(output).as_deref(), Some("201G / 468G"));
        assert_eq!(parse_df("Filesystem Size\n"), None);
    }

    #[test]
    fn test_shell_name() {
        assert_eq!(shell_name("/usr/bin/fish").as_deref(), Some("fish"));
        assert_eq!(shell_name("bash").as_deref(), Some("bash"));
    }

    #[test]
    fn test_rows_order() {
        let info = SystemInfo {
            hostname: "box".into(),
            user: "me".into(),
            os: "Linux".into(),
            kernel: "6.1".into(),
            uptime: "up 1 hour".into(),
            packages: "10 (pacman)".into(),
            shell: "zsh".into(),
            cpu: "cpu".into(),
            memory: "1MiB / 2MiB".into(),
            disk: "1G / 2G".into(),
        };
        let labels: Vec<&str> = info.rows().iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            ["OS", "Kernel", "Uptime", "Packages", "Shell", "CPU", "Memory", "Disk"]
        );
    }
}
