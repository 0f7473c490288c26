//! Read-only host introspection.

use serde::Serialize;

/// Host platform summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// Operating system (`linux`, `macos`, `windows`, ...).
    pub platform: String,
    /// OS family (`unix` or `windows`).
    pub family: String,
    /// CPU architecture.
    pub architecture: String,
    /// Host name, when it can be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Logical CPU count.
    pub cpu_count: usize,
    /// Total physical memory in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_total: Option<u64>,
    /// Available memory in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_available: Option<u64>,
    /// Session working directory (session-scoped queries only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_directory: Option<String>,
    /// Server version.
    pub version: String,
}

impl SystemInfo {
    /// Gather information about the host.
    pub fn collect() -> Self {
        let (memory_total, memory_available) = memory();
        Self {
            platform: std::env::consts::OS.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            hostname: host_name(),
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            memory_total,
            memory_available,
            current_directory: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Attach a session's working directory.
    pub fn with_current_directory(mut self, dir: impl Into<String>) -> Self {
        self.current_directory = Some(dir.into());
        self
    }
}

fn host_name() -> Option<String> {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(target_os = "linux")]
fn memory() -> (Option<u64>, Option<u64>) {
    match std::fs::read_to_string("/proc/meminfo") {
        Ok(content) => parse_meminfo(&content),
        Err(_) => (None, None),
    }
}

#[cfg(not(target_os = "linux"))]
fn memory() -> (Option<u64>, Option<u64>) {
    (None, None)
}

/// Parse `MemTotal` and `MemAvailable` (kB) from `/proc/meminfo` text.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo(content: &str) -> (Option<u64>, Option<u64>) {
    let field = |name: &str| {
        content.lines().find_map(|line| {
            let rest = line.strip_prefix(name)?.strip_prefix(':')?;
            let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
            Some(kb * 1024)
        })
    };
    (field("MemTotal"), field("MemAvailable"))
}
