//! Default logging sink backed by the `tracing` crate.

use std::sync::Arc;

use drizzle_debug_core::{Context, DisplayFields, Field, SharedLogFn};
use tracing::Level;

/// Target of every event emitted by [`TracingLogger`]
pub const TARGET: &str = "drizzle_debug";

/// Forwards driver log records to `tracing` events.
///
/// Each record becomes one event with target [`TARGET`], the record's message,
/// a `ctx` field holding the context values and a `fields` field holding the
/// structured fields.
///
/// ```
/// use drizzle_debug::TracingLogger;
/// use tracing::Level;
///
/// let logger = TracingLogger::new().with_level(Level::INFO);
/// assert_eq!(logger.level(), Level::INFO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingLogger {
    level: Level,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }
}

macro_rules! emit {
    ($level:expr, $ctx:expr, $msg:expr, $fields:expr) => {
        tracing::event!(
            target: TARGET,
            $level,
            ctx = %$ctx,
            fields = %DisplayFields($fields),
            "{}",
            $msg
        )
    };
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level events are emitted at.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Emits one record.
    pub fn log(&self, ctx: &Context, msg: &str, fields: &[Field]) {
        // `tracing` needs the level as a constant at each call site.
        if self.level == Level::TRACE {
            emit!(Level::TRACE, ctx, msg, fields)
        } else if self.level == Level::DEBUG {
            emit!(Level::DEBUG, ctx, msg, fields)
        } else if self.level == Level::INFO {
            emit!(Level::INFO, ctx, msg, fields)
        } else if self.level == Level::WARN {
            emit!(Level::WARN, ctx, msg, fields)
        } else {
            emit!(Level::ERROR, ctx, msg, fields)
        }
    }

    /// Converts the logger into a shareable logging function.
    pub fn into_log_fn(self) -> SharedLogFn {
        Arc::new(move |ctx: &Context, msg: &str, fields: &[Field]| self.log(ctx, msg, fields))
    }
}
