//! Process CPU time via `getrusage(2)`.
//!
//! On non-Unix platforms [`snapshot_self`] returns `None`.

/// CPU time consumed by the process so far.
#[derive(Debug, Clone, Copy)]
pub struct RusageSnapshot {
    /// User CPU time in microseconds.
    pub user_time_us: u64,
    /// System CPU time in microseconds.
    pub system_time_us: u64,
}

impl RusageSnapshot {
    /// CPU time (user + system) elapsed between `self` and a later snapshot.
    #[must_use]
    pub fn cpu_us_until(&self, after: &RusageSnapshot) -> u64 {
        after.user_time_us.saturating_sub(self.user_time_us)
            + after.system_time_us.saturating_sub(self.system_time_us)
    }
}

#[cfg(unix)]
mod platform {
    use super::RusageSnapshot;

    #[allow(clippy::cast_sign_loss)]
    pub fn snapshot_self() -> Option<RusageSnapshot> {
        // SAFETY: `rusage` is plain old data and `getrusage` only writes into it.
        let mut ru: libc::rusage = unsafe { std::mem::zeroed() };
        let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut ru) };
        if ret != 0 {
            return None;
        }

        Some(RusageSnapshot {
            user_time_us: ru.ru_utime.tv_sec as u64 * 1_000_000 + ru.ru_utime.tv_usec as u64,
            system_time_us: ru.ru_stime.tv_sec as u64 * 1_000_000 + ru.ru_stime.tv_usec as u64,
        })
    }
}

#[cfg(not(unix))]
mod platform {
    use super::RusageSnapshot;

    pub fn snapshot_self() -> Option<RusageSnapshot> {
        None
    }
}

/// Snapshot CPU usage for the current process (all threads).
#[must_use]
pub fn snapshot_self() -> Option<RusageSnapshot> {
    platform::snapshot_self()
}
