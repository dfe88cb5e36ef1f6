use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::CredentialError;

/// Where sign counter values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CounterPolicy {
    /// Always the credential's stored counter (zero for most exports).
    #[default]
    Fixed,
    /// Unix seconds, forced strictly above the last value handed out.
    #[value(name = "clock")]
    MonotonicClock,
    /// Stored counter plus one per assertion.
    Incrementing,
}

/// Sign counter for the one credential. All mutation goes through [`SignCounter::next`].
#[derive(Debug)]
pub struct SignCounter {
    policy: CounterPolicy,
    last: Mutex<u32>,
}

impl SignCounter {
    pub fn new(policy: CounterPolicy, initial: u32) -> Self {
        Self {
            policy,
            last: Mutex::new(initial),
        }
    }

    pub fn policy(&self) -> CounterPolicy {
        self.policy
    }

    /// Advance according to the policy and return the value to embed.
    pub fn next(&self) -> Result<u32, CredentialError> {
        self.with_next(Ok)
    }

    /// Hand the next value to `f` under the lock. The value is committed only
    /// when `f` succeeds; on error the counter stays where it was.
    pub fn with_next<T, E>(&self, f: impl FnOnce(u32) -> Result<T, E>) -> Result<T, E>
    where
        E: From<CredentialError>,
    {
        let mut last = self
            .last
            .lock()
            .map_err(|_| CredentialError::Counter("mutex poisoned".into()))?;
        let value = match self.policy {
            CounterPolicy::Fixed => *last,
            CounterPolicy::MonotonicClock => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                clock_value(now, *last)?
            }
            CounterPolicy::Incrementing => last
                .checked_add(1)
                .ok_or_else(|| CredentialError::Counter("counter exhausted".into()))?,
        };
        let out = f(value)?;
        *last = value;
        Ok(out)
    }

    /// Read without advancing.
    pub fn current(&self) -> Result<u32, CredentialError> {
        self.last
            .lock()
            .map(|last| *last)
            .map_err(|_| CredentialError::Counter("mutex poisoned".into()))
    }
}

/// Unix seconds as a counter value, strictly above `last`.
fn clock_value(now_secs: u64, last: u32) -> Result<u32, CredentialError> {
    let now = u32::try_from(now_secs)
        .map_err(|_| CredentialError::Counter(format!("clock {now_secs}s does not fit 32 bits")))?;
    let floor = last
        .checked_add(1)
        .ok_or_else(|| CredentialError::Counter("counter exhausted".into()))?;
    Ok(now.max(floor))
}
