use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// Severity of a logging call.
///
/// Levels form a fixed total order by [`rank`](Self::rank):
/// `Trace < Debug < Info < Warn < Error < Fatal`. The ranks reuse the
/// legacy integer scale so the compatibility layer can map priorities
/// without a lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Very fine-grained tracing output.
    Trace,
    /// Developer diagnostics.
    Debug,
    /// Coarse-grained progress messages.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Errors the application may survive.
    Error,
    /// Errors that will likely abort the application.
    Fatal,
}

impl Level {
    /// Every level, lowest severity first.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Integer rank; higher is more severe.
    pub const fn rank(self) -> i32 {
        match self {
            Self::Trace => 5_000,
            Self::Debug => 10_000,
            Self::Info => 20_000,
            Self::Warn => 30_000,
            Self::Error => 40_000,
            Self::Fatal => 50_000,
        }
    }

    /// Upper-case display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Map an integer rank to the highest level at or below it.
    ///
    /// Ranks below `Trace` clamp to `Trace`.
    pub fn from_rank(rank: i32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| level.rank() <= rank)
            .unwrap_or(Self::Trace)
    }

    /// Compare two levels by rank.
    pub fn compare(a: Level, b: Level) -> Ordering {
        a.rank().cmp(&b.rank())
    }

    /// Returns `true` if a call at `candidate` passes a `threshold`.
    pub fn is_enabled_for(candidate: Level, threshold: Level) -> bool {
        candidate.rank() >= threshold.rank()
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(*self, *other)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(TypeError::UnknownLevel(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
