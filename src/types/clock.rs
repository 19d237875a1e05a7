use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the evaluation instant. Injected into the detector so features never read ambient time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in UTC that never hands out an instant earlier than one it already issued.
pub struct SystemClock {
    last_issued_micros: AtomicI64
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last_issued_micros: AtomicI64::new(i64::MIN)
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let observed = Utc::now().timestamp_micros();
        let previous = self.last_issued_micros.fetch_max(observed, Ordering::AcqRel);

        DateTime::from_timestamp_micros(previous.max(observed)).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
pub struct ManualClock {
    current: std::sync::Mutex<DateTime<Utc>>
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: std::sync::Mutex::new(start)
        }
    }

    pub fn advance(&self, delta: chrono::TimeDelta) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += delta;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
