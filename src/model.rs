use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One `[value, timestampSeconds]` sample as sent by the metrics API.
pub type RawPair = (f64, f64);

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct MetricsDocument {
    #[serde(default)]
    pub metrics: Option<Metrics>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Metrics {
    #[serde(default)]
    pub processes: Option<Processes>,
}

/// Per-key series of `metrics.processes`, kept in document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Processes(pub Vec<(String, Option<RawSeries>)>);

impl Processes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&RawSeries>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

impl<'de> Deserialize<'de> for Processes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ProcessesVisitor;

        impl<'de> Visitor<'de> for ProcessesVisitor {
            type Value = Processes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of metric key to series")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Option<RawSeries>)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Option<RawSeries>>()? {
                    // A repeated key overwrites the earlier value but keeps its position.
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(Processes(entries))
            }
        }

        deserializer.deserialize_map(ProcessesVisitor)
    }
}

/// A metric series either inline or as a JSON-encoded string of the same pairs.
///
/// Anything else the API sends under a metric key lands in `Other` so that one
/// odd value does not reject the whole document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawSeries {
    Pairs(Vec<RawPair>),
    Encoded(String),
    Other(Value),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    #[serde(serialize_with = "serialize_sample")]
    pub x: f64,
    #[serde(serialize_with = "serialize_sample")]
    pub y: f64,
}

// Largest magnitude where every integer is exactly representable in an f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Whole samples are written as integers, e.g. `{"x":100,"y":5}`.
fn serialize_sample<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INT {
        serializer.serialize_i64(*v as i64)
    } else {
        serializer.serialize_f64(*v)
    }
}

impl From<RawPair> for ChartPoint {
    fn from((value, timestamp): RawPair) -> Self {
        ChartPoint {
            x: timestamp,
            y: value,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data: Vec<ChartPoint>,
}

/// Metric keys the processes chart knows a legend label for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMetric {
    Total,
    Running,
}

impl ProcessMetric {
    const ALL: [ProcessMetric; 2] = [ProcessMetric::Total, ProcessMetric::Running];

    pub fn from_key(key: &str) -> Option<ProcessMetric> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            ProcessMetric::Total => "proc_total",
            ProcessMetric::Running => "proc_run",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProcessMetric::Total => "Total Processes",
            ProcessMetric::Running => "Processes Run",
        }
    }
}
