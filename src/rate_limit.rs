use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-email throttle on password reset requests using a fixed window.
pub struct ResetRequestLimiter {
    /// email -> (count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    limit: u32,
    window: Duration,
}

impl ResetRequestLimiter {
    pub fn new(limit: u32, window_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Count a request for `email`. Returns Err with retry-after seconds once
    /// the window's budget is spent. A limit of zero disables the throttle.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        if self.limit == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
            return Ok(());
        }

        if *count >= self.limit {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed).max(1));
        }

        *count += 1;
        Ok(())
    }

    /// Remove entries whose window has closed.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries.retain(|_, (_, start)| now.duration_since(*start) <= window);
    }
}
