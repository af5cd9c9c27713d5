//! Event kind enum as the single source of truth for kind strings and the
//! visibility/aggregation policy attached to each kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved category name carried by pause and end markers.
pub const SPECIAL_CATEGORY: &str = "__special__";

/// The kind of a logged event. Immutable once the event is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// A tracked task.
    #[default]
    Normal,
    /// A break marker.
    Pause,
    /// The day-closing marker. At most one per calendar date.
    End,
}

impl EventKind {
    /// String representation for storage and snapshots.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Pause => "pause",
            Self::End => "end",
        }
    }

    /// Markers (`pause`, `end`) use the reserved category.
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Pause | Self::End)
    }

    /// Whether a derived duration is meaningful for this kind.
    pub const fn shows_duration(self) -> bool {
        match self {
            Self::Normal | Self::Pause => true,
            Self::End => false,
        }
    }

    /// Whether this kind counts toward totals and the category breakdown.
    pub const fn counts_toward_totals(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Parses a stored kind, falling back to `Normal` for anything unknown.
    pub fn parse_lenient(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

/// `is_special` over a possibly absent kind. Absent is not special.
pub fn is_special(kind: Option<EventKind>) -> bool {
    kind.is_some_and(EventKind::is_special)
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "pause" => Ok(Self::Pause),
            "end" => Ok(Self::End),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind() {
        for kind in [EventKind::Normal, EventKind::Pause, EventKind::End] {
            let parsed: EventKind = kind.to_string().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_errors() {
        let err = "lunch".parse::<EventKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event kind: lunch");
    }

    #[test]
    fn lenient_parse_defaults_to_normal() {
        assert_eq!(EventKind::parse_lenient("lunch"), EventKind::Normal);
        assert_eq!(EventKind::parse_lenient(""), EventKind::Normal);
        assert_eq!(EventKind::parse_lenient(" end "), EventKind::End);
    }

    #[test]
    fn special_markers() {
        assert!(is_special(Some(EventKind::Pause)));
        assert!(is_special(Some(EventKind::End)));
        assert!(!is_special(Some(EventKind::Normal)));
        assert!(!is_special(None));
    }

    #[test]
    fn visibility_and_aggregation_table() {
        assert!(EventKind::Normal.shows_duration());
        assert!(EventKind::Pause.shows_duration());
        assert!(!EventKind::End.shows_duration());

        assert!(EventKind::Normal.counts_toward_totals());
        assert!(!EventKind::Pause.counts_toward_totals());
        assert!(!EventKind::End.counts_toward_totals());
    }
}
