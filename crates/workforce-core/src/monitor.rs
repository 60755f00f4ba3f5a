//! Process memory sampling for the worker pool.

/// Source of the current resident set size.
pub trait ResourceMonitor: Send + Sync {
    /// Resident memory in MiB, or `None` when it cannot be measured.
    fn resident_mb(&self) -> Option<u64>;
}

/// Reads `VmRSS` from `/proc/self/status`. Reports `None` off Linux.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcMemoryMonitor;

impl ResourceMonitor for ProcMemoryMonitor {
    fn resident_mb(&self) -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            let status = std::fs::read_to_string("/proc/self/status").ok()?;
            parse_vm_rss_kib(&status).and_then(|kib| kib.checked_div(1024))
        }
        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

/// A monitor that always reports the same figure.
#[derive(Debug, Clone, Copy)]
pub struct FixedMonitor(pub Option<u64>);

impl ResourceMonitor for FixedMonitor {
    fn resident_mb(&self) -> Option<u64> {
        self.0
    }
}

fn parse_vm_rss_kib(status: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix("VmRSS:")?;
        rest.split_whitespace().next()?.parse::<u64>().ok()
    })
}

/// Whether `monitor` reports usage at or above `limit_mb`.
///
/// A zero limit disables the check; an unmeasurable process is never
/// considered under pressure.
pub fn under_pressure(monitor: &dyn ResourceMonitor, limit_mb: u64) -> bool {
    limit_mb > 0 && monitor.resident_mb().is_some_and(|mb| mb >= limit_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vm_rss_line() {
        let status = "Name:\tworkforce\nVmPeak:\t  900000 kB\nVmRSS:\t  204800 kB\nThreads:\t8\n";
        assert_eq!(parse_vm_rss_kib(status), Some(204_800));
        assert_eq!(parse_vm_rss_kib("Name:\tx\n"), None);
    }

    #[test]
    fn pressure_respects_limit() {
        assert!(under_pressure(&FixedMonitor(Some(512)), 512));
        assert!(!under_pressure(&FixedMonitor(Some(511)), 512));
        assert!(!under_pressure(&FixedMonitor(Some(10_000)), 0));
        assert!(!under_pressure(&FixedMonitor(None), 1));
    }
}
