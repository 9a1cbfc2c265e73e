use std::time::Duration;

use serde::Deserialize;

use crate::error::ValidationError;
use crate::target::TargetKind;

use super::{ReadinessMode, parse_duration_value};

/// Contents of `benchmark.toml` / `benchmark.json`. Every field is optional;
/// values given on the command line win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "address")]
    pub addr: Option<String>,
    pub warmup: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub readiness: Option<ReadinessMode>,
    pub probe_attempts: Option<u32>,
    pub probe_backoff: Option<DurationValue>,
    pub probe_max_backoff: Option<DurationValue>,
    pub wrk: Option<String>,
    pub root: Option<String>,
    pub hyper_hello: Option<String>,
    pub only: Option<Vec<TargetKind>>,
    pub output: Option<String>,
    pub quiet: Option<bool>,
}

/// Either a number of seconds or a suffixed string such as `"250ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
