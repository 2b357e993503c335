use std::fmt;

use plume_types::Level;

/// Legacy severity value.
///
/// Each priority carries the legacy integer value (equal to the core
/// [`Level::rank`]) and its syslog equivalent. The six constants map
/// one-to-one onto core levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Priority {
    level: Level,
    syslog: u8,
}

impl Priority {
    pub const FATAL: Priority = Priority::new(Level::Fatal, 0);
    pub const ERROR: Priority = Priority::new(Level::Error, 3);
    pub const WARN: Priority = Priority::new(Level::Warn, 4);
    pub const INFO: Priority = Priority::new(Level::Info, 6);
    pub const DEBUG: Priority = Priority::new(Level::Debug, 7);
    pub const TRACE: Priority = Priority::new(Level::Trace, 7);

    const ALL: [Priority; 6] = [
        Priority::TRACE,
        Priority::DEBUG,
        Priority::INFO,
        Priority::WARN,
        Priority::ERROR,
        Priority::FATAL,
    ];

    const fn new(level: Level, syslog: u8) -> Self {
        Self { level, syslog }
    }

    /// Legacy integer value.
    pub fn to_int(self) -> i32 {
        self.level.rank()
    }

    /// Syslog severity equivalent.
    pub fn syslog_equivalent(self) -> u8 {
        self.syslog
    }

    /// The core level this priority stands for.
    pub fn to_level(self) -> Level {
        self.level
    }

    /// The priority standing for a core level.
    pub fn from_level(level: Level) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.level == level)
            .unwrap_or(Self::DEBUG)
    }

    /// Parse a priority name, falling back to `DEBUG`.
    pub fn to_priority(name: &str) -> Self {
        Self::to_priority_or(name, Self::DEBUG)
    }

    /// Parse a priority name, falling back to `default`.
    pub fn to_priority_or(name: &str, default: Priority) -> Self {
        name.parse::<Level>()
            .map(Self::from_level)
            .unwrap_or(default)
    }

    /// Look up a priority by exact legacy integer value, falling back to
    /// `DEBUG`.
    pub fn from_int(value: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.to_int() == value)
            .unwrap_or(Self::DEBUG)
    }

    /// Returns `true` if this priority is at least as severe as `other`.
    pub fn is_greater_or_equal(self, other: Priority) -> bool {
        self.to_int() >= other.to_int()
    }
}

impl From<Level> for Priority {
    fn from(level: Level) -> Self {
        Self::from_level(level)
    }
}

impl From<Priority> for Level {
    fn from(priority: Priority) -> Self {
        priority.to_level()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.level.name())
    }
}
