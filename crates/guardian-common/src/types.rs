use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the agent-maintained poll counter, the only counter the agent emits.
pub const POLL_COUNT: &str = "PollCount";

/// Name of the per-poll random liveness probe.
pub const RANDOM_VALUE: &str = "RandomValue";

/// Name → numeric mapping exchanged between collectors, the agent buffer
/// and the sender. Kind is decided later, by name.
pub type MetricSet = HashMap<String, f64>;

/// Errors raised while turning external input into a [`Metric`].
///
/// # Examples
///
/// ```
/// use guardian_common::types::{MetricError, MetricKind};
///
/// let err = "histogram".parse::<MetricKind>().unwrap_err();
/// assert_eq!(err, MetricError::InvalidKind("histogram".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    #[error("invalid metric type: {0}")]
    InvalidKind(String),

    #[error("invalid {kind} value: {raw}")]
    MalformedValue { kind: MetricKind, raw: String },

    #[error("metric id is required")]
    MissingName,

    /// `value` missing for a gauge or `delta` missing for a counter.
    #[error("{kind} metric requires field '{field}'")]
    MissingValue {
        kind: MetricKind,
        field: &'static str,
    },
}

/// Metric kind. Part of a metric's identity: a gauge and a counter may share
/// a name without colliding.
///
/// # Examples
///
/// ```
/// use guardian_common::types::MetricKind;
///
/// let kind: MetricKind = "counter".parse().unwrap();
/// assert_eq!(kind, MetricKind::Counter);
/// assert_eq!(kind.to_string(), "counter");
/// assert!("Counter".parse::<MetricKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            _ => Err(MetricError::InvalidKind(s.to_string())),
        }
    }
}

/// The value carried by a single update. Gauges replace, counters add.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Gauge(f64),
    Counter(i64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Counter(_) => MetricKind::Counter,
        }
    }
}

/// Renders a value the way `GET /value/...` returns it: shortest decimal
/// form for gauges (`42` for 42.0, never an exponent), base-10 for counters.
impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Gauge(v) => write!(f, "{v}"),
            MetricValue::Counter(d) => write!(f, "{d}"),
        }
    }
}

/// A single named measurement. Immutable once built; stores and buffers keep
/// their own copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Gauge(value),
        }
    }

    pub fn counter(name: impl Into<String>, delta: i64) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Counter(delta),
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }

    /// Builds a metric from the path-encoded form `/{kind}/{name}/{value}`.
    pub fn from_parts(kind: &str, name: &str, raw: &str) -> Result<Self, MetricError> {
        let kind: MetricKind = kind.parse()?;
        if name.is_empty() {
            return Err(MetricError::MissingName);
        }
        let value = parse_value(kind, raw)?;
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }
}

/// Parses path-encoded value text: a decimal float for gauges, a base-10
/// signed integer for counters.
///
/// # Examples
///
/// ```
/// use guardian_common::types::{parse_value, MetricKind, MetricValue};
///
/// assert_eq!(parse_value(MetricKind::Counter, "-7").unwrap(), MetricValue::Counter(-7));
/// assert!(parse_value(MetricKind::Counter, "1.5").is_err());
/// ```
pub fn parse_value(kind: MetricKind, raw: &str) -> Result<MetricValue, MetricError> {
    let malformed = || MetricError::MalformedValue {
        kind,
        raw: raw.to_string(),
    };
    match kind {
        MetricKind::Gauge => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(MetricValue::Gauge)
            .ok_or_else(malformed),
        MetricKind::Counter => raw
            .parse::<i64>()
            .map(MetricValue::Counter)
            .map_err(|_| malformed()),
    }
}

/// JSON wire shape shared by `/update/` and `/value/`.
///
/// `type` is kept as a raw string so an unknown kind surfaces as
/// [`MetricError::InvalidKind`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricPayload {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub mtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
}

impl MetricPayload {
    /// Validates the `{id, type}` pair used by value queries.
    pub fn identity(&self) -> Result<(MetricKind, &str), MetricError> {
        if self.id.is_empty() {
            return Err(MetricError::MissingName);
        }
        if self.mtype.is_empty() {
            return Err(MetricError::InvalidKind(String::new()));
        }
        let kind = self.mtype.parse()?;
        Ok((kind, self.id.as_str()))
    }
}

impl TryFrom<MetricPayload> for Metric {
    type Error = MetricError;

    fn try_from(payload: MetricPayload) -> Result<Self, Self::Error> {
        let (kind, _) = payload.identity()?;
        let value = match kind {
            MetricKind::Gauge => payload
                .value
                .map(MetricValue::Gauge)
                .ok_or(MetricError::MissingValue {
                    kind,
                    field: "value",
                })?,
            MetricKind::Counter => payload
                .delta
                .map(MetricValue::Counter)
                .ok_or(MetricError::MissingValue {
                    kind,
                    field: "delta",
                })?,
        };
        Ok(Metric {
            name: payload.id,
            value,
        })
    }
}

impl From<&Metric> for MetricPayload {
    fn from(metric: &Metric) -> Self {
        let (value, delta) = match metric.value {
            MetricValue::Gauge(v) => (Some(v), None),
            MetricValue::Counter(d) => (None, Some(d)),
        };
        Self {
            id: metric.name.clone(),
            mtype: metric.kind().to_string(),
            value,
            delta,
        }
    }
}
