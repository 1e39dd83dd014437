use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Fixed-window per-IP submission throttle. The first hit from an address
/// opens a window; hits beyond `max_per_window` inside it are rejected, and
/// the window resets once it expires.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_per_window: u32,
    hits: HashMap<IpAddr, Window>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_per_window: u32) -> Self {
        Self {
            window,
            max_per_window,
            hits: HashMap::new(),
        }
    }

    /// Records a hit and reports whether it is within the limit.
    pub fn check(&mut self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&mut self, ip: IpAddr, now: Instant) -> bool {
        let window = self.window;
        self.hits
            .retain(|_, w| now.duration_since(w.started) < window);

        let slot = self.hits.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if slot.count >= self.max_per_window {
            return false;
        }
        slot.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn allows_up_to_max_then_rejects() {
        let mut limiter = RateLimiter::new(Duration::from_secs(3600), 3);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(1), now));
    }

    #[test]
    fn limits_are_per_address() {
        let mut limiter = RateLimiter::new(Duration::from_secs(3600), 1);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(2), now));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(1), now + Duration::from_secs(59)));
        assert!(limiter.check_at(ip(1), now + Duration::from_secs(61)));
    }
}
