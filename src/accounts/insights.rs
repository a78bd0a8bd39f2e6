use tracing::debug;

use super::error::AccountError;
use crate::clients::AccountClient;
use crate::context::DashboardContext;
use crate::framework::{ResourceState, Subscription};
use crate::model::Insights;

/// One line of the insights chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// `name` with underscores shown as spaces.
    pub label: String,
    /// `(end_time, value)` in sample order.
    pub points: Vec<(String, f64)>,
}

/// Chart series for every metric name, skipping samples that lack it.
pub fn chart_series(insights: &Insights) -> Vec<ChartSeries> {
    let metrics = &insights.merged_metrics;
    metrics
        .names
        .iter()
        .map(|name| ChartSeries {
            name: name.clone(),
            label: name.replace('_', " "),
            points: metrics
                .values
                .iter()
                .filter_map(|sample| {
                    sample
                        .values
                        .get(name)
                        .map(|metric| (sample.end_time.clone(), metric.value))
                })
                .collect(),
        })
        .collect()
}

/// Metrics chart of one account.
///
/// The chart is optional decoration: a failed read hides it and never goes
/// through the session guard.
pub struct InsightsView {
    client: AccountClient,
    id: u64,
}

impl InsightsView {
    pub fn new(ctx: DashboardContext, id: u64) -> Self {
        Self {
            client: AccountClient::new(ctx.client.clone()),
            id,
        }
    }

    pub async fn mount(&self) -> Result<Subscription<Insights>, AccountError> {
        self.client.insights(self.id).await
    }

    /// Series to draw, or `None` while loading or after a failed read.
    pub fn series(&self, state: &ResourceState<Insights>) -> Option<Vec<ChartSeries>> {
        if let Some(error) = &state.error {
            debug!(id = self.id, %error, "Insights unavailable, hiding chart");
            return None;
        }
        state.data.as_ref().map(chart_series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ResourceCache;
    use crate::navigation::Location;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_series_per_metric() {
        let insights: Insights = serde_json::from_value(json!({
            "merged_metrics": {
                "names": ["follower_count", "reach"],
                "values": [
                    {"end_time": "2024-01-01", "values": {"follower_count": {"value": 10.0}, "reach": {"value": 3.0}}},
                    {"end_time": "2024-01-02", "values": {"follower_count": {"value": 12.0}}}
                ]
            }
        }))
        .unwrap();

        let series = chart_series(&insights);

        assert_eq!(series[0].label, "follower count");
        assert_eq!(
            series[0].points,
            vec![("2024-01-01".to_string(), 10.0), ("2024-01-02".to_string(), 12.0)]
        );
        assert_eq!(series[1].points.len(), 1);
    }

    fn context(mock: &MockTransport) -> DashboardContext {
        let (cache, client) =
            ResourceCache::new(8, Arc::new(mock.clone()), "http://api.test", Duration::from_secs(2));
        tokio::spawn(cache.run());
        DashboardContext::new(client, "http://oauth.test")
    }

    #[tokio::test]
    async fn test_mount_waits_for_series() {
        let mock = MockTransport::new();
        mock.expect_get("http://api.test/account/17/info/insights").return_json(
            200,
            json!({"merged_metrics": {
                "names": ["reach"],
                "values": [{"end_time": "2024-01-01", "values": {"reach": {"value": 4.0}}}]
            }}),
        );
        let view = InsightsView::new(context(&mock), 17);

        let mut insights = view.mount().await.unwrap();
        assert_eq!(view.series(&insights.current()), None);
        let series = view.series(&insights.settled().await).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points, vec![("2024-01-01".to_string(), 4.0)]);
    }

    #[tokio::test]
    async fn test_failed_read_hides_chart_without_redirect() {
        let mock = MockTransport::new();
        mock.expect_get("http://api.test/account/17/info/insights").return_text(500, "no insights");
        let ctx = context(&mock);
        let view = InsightsView::new(ctx.clone(), 17);

        let mut insights = view.mount().await.unwrap();
        let state = insights.settled().await;

        assert!(state.error.is_some());
        assert_eq!(view.series(&state), None);
        assert_eq!(ctx.router.location(), Location::Internal("/".into()));
    }
}
