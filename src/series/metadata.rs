use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Value semantics reported by the monitoring agent for a metric.
///
/// Counters are cumulative and must be converted to a per-second rate before
/// display; instant and discrete values are shown as sampled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semantics {
    Counter,
    #[default]
    Instant,
    Discrete,
}

impl Semantics {
    pub fn is_counter(&self) -> bool {
        matches!(self, Semantics::Counter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Semantics::Counter => "counter",
            Semantics::Instant => "instant",
            Semantics::Discrete => "discrete",
        }
    }
}

impl Display for Semantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Semantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("counter") => Ok(Semantics::Counter),
            s if s.eq_ignore_ascii_case("instant") => Ok(Semantics::Instant),
            s if s.eq_ignore_ascii_case("discrete") => Ok(Semantics::Discrete),
            _ => Err(format!("invalid semantics: {}", s)),
        }
    }
}

/// Whether a metric's raw values are numbers or text.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Numeric,
    Text,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Numeric => "numeric",
            ValueKind::Text => "text",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive metadata of a metric, as reported by the agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMeta {
    /// Dotted metric name, e.g. `disk.dev.read`.
    pub name: String,
    pub kind: ValueKind,
    pub semantics: Semantics,
    pub units: String,
}

impl MetricMeta {
    pub fn new(name: &str, kind: ValueKind, semantics: Semantics, units: &str) -> Self {
        MetricMeta {
            name: name.to_string(),
            kind,
            semantics,
            units: units.to_string(),
        }
    }

    /// True when raw values are cumulative and need rate conversion.
    pub fn needs_rate_conversion(&self) -> bool {
        self.semantics.is_counter() && self.kind == ValueKind::Numeric
    }

    /// Units of the displayed values. Rate conversion divides by the sample
    /// interval, so counters are shown per second.
    pub fn display_units(&self) -> String {
        if self.needs_rate_conversion() {
            format!("{}/s", self.units)
        } else {
            self.units.clone()
        }
    }

    /// Final segment of the dotted metric name, used for table column headers.
    pub fn item_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantics_parse() {
        assert!(matches!(Semantics::from_str("counter"), Ok(Semantics::Counter)));
        assert!(matches!(Semantics::from_str("Instant"), Ok(Semantics::Instant)));
        assert!(matches!(Semantics::from_str("DISCRETE"), Ok(Semantics::Discrete)));
        assert!(Semantics::from_str("cumulative").is_err());
    }

    #[test]
    fn test_display_units() {
        let counter = MetricMeta::new("disk.dev.read", ValueKind::Numeric, Semantics::Counter, "count");
        assert_eq!(counter.display_units(), "count/s");

        let gauge = MetricMeta::new("kernel.all.load", ValueKind::Numeric, Semantics::Instant, "none");
        assert_eq!(gauge.display_units(), "none");
    }

    #[test]
    fn test_item_name() {
        let meta = MetricMeta::new("some.string.A", ValueKind::Text, Semantics::Instant, "none");
        assert_eq!(meta.item_name(), "A");

        let meta = MetricMeta::new("uptime", ValueKind::Numeric, Semantics::Instant, "sec");
        assert_eq!(meta.item_name(), "uptime");
    }
}
