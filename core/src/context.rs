//! Request context threaded through every driver call.
//!
//! A [`Context`] carries request-scoped metadata (request ids, tenant names,
//! anything a log sink wants to correlate on) and an optional deadline.
//! Cloning is cheap: the metadata sits behind an [`Arc`] and is copied only
//! when a derived context adds a value.
//!
//! Drivers decide what to do with the deadline; the logging decorator never
//! looks at it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{DriverError, Result};

#[derive(Debug, Clone, Default)]
pub struct Context {
    values: Arc<BTreeMap<String, String>>,
    deadline: Option<Instant>,
}

impl Context {
    /// The empty context: no values, no deadline.
    #[inline]
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a derived context carrying `key = value` in addition to the
    /// values of `self`. An existing key is overwritten in the derived
    /// context only.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(values),
            deadline: self.deadline,
        }
    }

    /// Returns a derived context that expires at `deadline`. A parent
    /// deadline that is earlier wins.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            values: Arc::clone(&self.values),
            deadline: Some(deadline),
        }
    }

    /// Shorthand for `with_deadline(Instant::now() + timeout)`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Looks up a value by key
    #[inline]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterates all values in key order
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns [`DriverError::DeadlineExceeded`] once the deadline has passed.
    pub fn err(&self) -> Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DriverError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl core::fmt::Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("}")
    }
}
