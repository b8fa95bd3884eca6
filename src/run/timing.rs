use std::time::{Duration, Instant};

/// Fixed-interval task that drives the monster simulation. It only
/// accumulates time while started; cancelling discards any partial interval.
#[derive(Clone, Debug)]
pub struct MonsterTicker {
    interval: Duration,
    elapsed: Duration,
    active: bool,
}

impl MonsterTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feeds wall time into the task and returns how many ticks fell due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.active || self.interval.is_zero() {
            return 0;
        }
        self.elapsed += elapsed;
        let mut due = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due += 1;
        }
        due
    }
}

#[derive(Clone, Debug)]
pub struct Cooldown {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Claims the action at `now` if the previous one is far enough behind.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) > self.min_interval);
        if ready {
            self.last = Some(now);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Decouples input polling from the simulation: movement and the action key
/// each have their own minimum spacing.
#[derive(Clone, Debug)]
pub struct ActionThrottle {
    pub movement: Cooldown,
    pub action: Cooldown,
}

impl ActionThrottle {
    pub fn new(movement: Duration, action: Duration) -> Self {
        Self {
            movement: Cooldown::new(movement),
            action: Cooldown::new(action),
        }
    }
}
