//! Backoff policies.

use super::clock::{Clock, RandomSource, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Backoff decides how long to wait before the next attempt.
pub trait Backoff: Send {
    /// Returns the next wait, or `None` to stop retrying.
    fn next_backoff(&mut self) -> Option<Duration>;
}

/// BackoffProvider builds a fresh policy for every retry loop.
pub trait BackoffProvider: Send + Sync {
    fn backoff(&self) -> Box<dyn Backoff>;
}

impl<F> BackoffProvider for F
where
    F: Fn() -> Box<dyn Backoff> + Send + Sync,
{
    fn backoff(&self) -> Box<dyn Backoff> {
        self()
    }
}

/// Tuning for [`ExponentialBackoff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffSettings {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Each wait is drawn from `interval * [1 - f, 1 + f]`.
    pub randomization_factor: f64,
    /// Total time after which the policy stops. `None` never stops.
    pub max_elapsed: Option<Duration>,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        BackoffSettings {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_elapsed: None,
        }
    }
}

/// InvalidBackoff reports settings that cannot drive an exponential policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid backoff settings: {0}")]
pub struct InvalidBackoff(pub String);

impl BackoffSettings {
    /// Checks that the multiplier is finite and at least 1, the
    /// randomization factor is within `[0, 1]`, and the initial interval
    /// does not exceed the cap.
    pub fn validate(&self) -> Result<(), InvalidBackoff> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(InvalidBackoff(format!(
                "multiplier must be a finite number of at least 1, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(InvalidBackoff(format!(
                "randomization factor must be between 0 and 1, got {}",
                self.randomization_factor
            )));
        }
        if self.initial_interval > self.max_interval {
            return Err(InvalidBackoff(format!(
                "initial interval {:?} exceeds max interval {:?}",
                self.initial_interval, self.max_interval
            )));
        }
        Ok(())
    }

    /// Replaces out-of-range values with the nearest usable ones: a bad
    /// multiplier becomes 1, a bad randomization factor is clamped (NaN
    /// disables jitter) and the initial interval is capped.
    pub fn sanitized(mut self) -> Self {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            self.multiplier = 1.0;
        }
        self.randomization_factor = if self.randomization_factor.is_nan() {
            0.0
        } else {
            self.randomization_factor.clamp(0.0, 1.0)
        };
        self.initial_interval = self.initial_interval.min(self.max_interval);
        self
    }
}

/// ExponentialBackoff grows the wait geometrically up to a cap, with jitter.
pub struct ExponentialBackoff {
    settings: BackoffSettings,
    current: Duration,
    start: Instant,
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl ExponentialBackoff {
    /// Uses the system clock and an entropy-seeded generator.
    pub fn new(settings: BackoffSettings) -> Self {
        Self::with_sources(
            settings,
            Arc::new(SystemClock),
            Box::new(StdRng::from_entropy()),
        )
    }

    pub fn with_sources(
        settings: BackoffSettings,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let settings = settings.sanitized();
        let start = clock.now();
        ExponentialBackoff {
            settings,
            current: settings.initial_interval,
            start,
            clock,
            random,
        }
    }

    /// Restarts the interval sequence and the elapsed-time budget.
    pub fn reset(&mut self) {
        self.current = self.settings.initial_interval;
        self.start = self.clock.now();
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    fn randomized(&mut self) -> Duration {
        let f = self.settings.randomization_factor;
        let scale = 1.0 - f + 2.0 * f * self.random.next_f64().clamp(0.0, 1.0);
        Duration::try_from_secs_f64(self.current.as_secs_f64() * scale).unwrap_or(self.current)
    }

    fn grow(&mut self) {
        let max = self.settings.max_interval;
        self.current = match Duration::try_from_secs_f64(self.current.as_secs_f64() * self.settings.multiplier) {
            Ok(next) if next < max => next,
            _ => max,
        };
    }
}

impl Backoff for ExponentialBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let wait = self.randomized();
        if let Some(max_elapsed) = self.settings.max_elapsed {
            if self.elapsed().checked_add(wait).map_or(true, |t| t > max_elapsed) {
                return None;
            }
        }
        self.grow();
        Some(wait)
    }
}

/// ExponentialBackoffProvider builds an [`ExponentialBackoff`] per call.
#[derive(Clone)]
pub struct ExponentialBackoffProvider {
    settings: BackoffSettings,
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
}

impl ExponentialBackoffProvider {
    pub fn new(settings: BackoffSettings) -> Self {
        ExponentialBackoffProvider {
            settings,
            clock: Arc::new(SystemClock),
            seed: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds every policy's generator identically, for reproducible waits.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(&self) -> &BackoffSettings {
        &self.settings
    }
}

impl Default for ExponentialBackoffProvider {
    fn default() -> Self {
        Self::new(BackoffSettings::default())
    }
}

impl BackoffProvider for ExponentialBackoffProvider {
    fn backoff(&self) -> Box<dyn Backoff> {
        let random = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Box::new(ExponentialBackoff::with_sources(
            self.settings,
            self.clock.clone(),
            Box::new(random),
        ))
    }
}

/// ConstantBackoff waits the same interval every time, optionally a bounded
/// number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff {
    interval: Duration,
    remaining: Option<u32>,
}

impl ConstantBackoff {
    pub fn new(interval: Duration) -> Self {
        ConstantBackoff {
            interval,
            remaining: None,
        }
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.remaining = Some(retries);
        self
    }
}

impl Backoff for ConstantBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        match &mut self.remaining {
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.interval)
            }
            None => Some(self.interval),
        }
    }
}
