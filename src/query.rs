use crate::errors::{self, ErrorKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_WINDOW_SECONDS: i64 = 3600;
pub const DEFAULT_STEP_SECONDS: i64 = 15;

/// Range and resolution of the samples a chart asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from_seconds: i64,
    pub to_seconds: i64,
    pub step_seconds: i64,
}

impl TimeWindow {
    pub fn ending_at(to: DateTime<Utc>, length_seconds: i64, step_seconds: i64) -> TimeWindow {
        let to_seconds = to.timestamp();
        TimeWindow {
            from_seconds: to_seconds - length_seconds,
            to_seconds,
            step_seconds,
        }
    }

    /// The last hour at 15 second resolution.
    pub fn last_hour() -> TimeWindow {
        Self::ending_at(Utc::now(), DEFAULT_WINDOW_SECONDS, DEFAULT_STEP_SECONDS)
    }
}

/// Everything a chart needs to know about where it is shown.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub cluster_name: String,
    pub host_name: String,
    pub window: TimeWindow,
    pub mode: SourceMode,
}

impl QueryContext {
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("clusterName", self.cluster_name.clone()),
            ("hostName", self.host_name.clone()),
            ("fromSeconds", self.window.from_seconds.to_string()),
            ("toSeconds", self.window.to_seconds.to_string()),
            ("stepSeconds", self.window.step_seconds.to_string()),
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceMode {
    /// Query the metrics API
    Live,
    /// Read the bundled fixture instead
    Offline,
}

impl SourceMode {
    pub fn from_offline_flag(offline: bool) -> SourceMode {
        if offline {
            SourceMode::Offline
        } else {
            SourceMode::Live
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Live(String),
    Fixture(PathBuf),
}

#[derive(Debug, Clone, Copy)]
pub struct UrlTemplate(pub &'static str);

impl UrlTemplate {
    /// Substitutes every `{name}` with its parameter value.
    pub fn render(&self, params: &BTreeMap<&str, String>) -> errors::Result<String> {
        let template = self.0;
        let mut out = String::with_capacity(template.len() + 64);
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                ErrorKind::UnterminatedPlaceholder(template.len() - rest.len() + open)
            })?;
            let name = &after[..close];
            let value = params
                .get(name)
                .ok_or_else(|| ErrorKind::UnresolvedPlaceholder(name.to_owned()))?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Picks the live URL or the offline fixture for a chart.
pub fn resolve_source(
    template: UrlTemplate,
    fixture: &str,
    ctx: &QueryContext,
) -> errors::Result<DataSource> {
    match ctx.mode {
        SourceMode::Offline => Ok(DataSource::Fixture(PathBuf::from(fixture))),
        SourceMode::Live => Ok(DataSource::Live(template.render(&ctx.params())?)),
    }
}
