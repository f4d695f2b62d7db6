//! Structured log fields and the logging function signature.

use std::sync::Arc;

use crate::context::Context;
use crate::value::Value;

/// The value half of a [`Field`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Str(String),
    Args(Vec<Value>),
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Args(args) => {
                f.write_str("[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A key/value pair attached to a log record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    pub key: &'static str,
    pub value: FieldValue,
}

impl Field {
    /// A string-valued field, e.g. the statement text.
    #[inline]
    pub fn string(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: FieldValue::Str(value.into()),
        }
    }

    /// A field holding a statement's arguments verbatim.
    #[inline]
    pub fn args(key: &'static str, args: &[Value]) -> Self {
        Self {
            key,
            value: FieldValue::Args(args.to_vec()),
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Renders a field list as `key=value key=value`
pub struct DisplayFields<'a>(pub &'a [Field]);

impl core::fmt::Display for DisplayFields<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// A logging sink: receives the call context, a human-readable message and
/// zero or more structured fields.
///
/// The same function is shared by a driver and every transaction it starts,
/// possibly from several threads at once.
pub type LogFn = dyn Fn(&Context, &str, &[Field]) + Send + Sync;

/// Shared handle to a [`LogFn`]
pub type SharedLogFn = Arc<LogFn>;
