// src/services/contact_limiter.rs
// DOCUMENTATION: Per-IP rate limit for the public contact form
// PURPOSE: Keep the Telegram channel from being flooded

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type KeyedLimiter<C> =
    RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Keyed limiter: `per_hour` submissions per client, then one more per hour
/// DOCUMENTATION: No client gets more than `per_hour` through within any hour
pub struct ContactLimiter<C: Clock = DefaultClock> {
    limiter: KeyedLimiter<C>,
}

impl ContactLimiter {
    pub fn new(per_hour: u32) -> Self {
        Self::with_clock(per_hour, &DefaultClock::default())
    }
}

impl<C: Clock> ContactLimiter<C> {
    pub fn with_clock(per_hour: u32, clock: &C) -> Self {
        let burst = NonZeroU32::new(per_hour).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_hour(NonZeroU32::MIN).allow_burst(burst);
        Self {
            limiter: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock),
        }
    }

    /// Record one submission; false once the client is over its quota
    pub fn check(&self, ip: IpAddr) -> bool {
        let allowed = self.limiter.check_key(&ip).is_ok();
        if !allowed {
            log::warn!("Contact form rate limit exceeded for {}", ip);
        }
        allowed
    }

    /// Forget clients whose quota has fully replenished
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Start background cleanup task
pub fn start_limiter_cleanup(limiter: Arc<ContactLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}
