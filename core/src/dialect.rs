//! Database dialect reported by a driver.
//!
//! The decorator never interprets the dialect; it only forwards the wrapped
//! driver's answer so that callers building SQL keep working unchanged.

/// SQL dialect spoken by the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    #[default]
    SQLite,
    PostgreSQL,
    MySQL,
}

impl Dialect {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
            Dialect::MySQL => "mysql",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        for dialect in [Dialect::SQLite, Dialect::PostgreSQL, Dialect::MySQL] {
            assert_eq!(dialect.to_string(), dialect.as_str());
        }
        assert_eq!(Dialect::default(), Dialect::SQLite);
    }
}
