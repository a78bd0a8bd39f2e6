use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `/account/{id}/info/insights`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default)]
    pub merged_metrics: MergedMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedMetrics {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub values: Vec<MetricSample>,
}

/// All metrics measured for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub values: BTreeMap<String, MetricValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: f64,
}
