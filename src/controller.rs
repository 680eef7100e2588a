//! Dashboard Controller
//!
//! Owns the dashboard state (loaded indicators, selected indicator, day
//! window) and drives the view through its states:
//!
//! ```text
//! loading ──► content ──► chart-loading ──► chart-ready
//!    │                          │      └──► chart-empty
//!    └──► error                 └─────────► chart-error
//! ```
//!
//! Every chart load is tagged with a monotonic request id. A response is
//! applied only if its id is still the latest, so the last request wins even
//! when responses resolve out of order.

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::api::{ClientError, HistoryResponse, Indicator, IndicatorSource};
use crate::chart::ChartSeries;
use crate::config::DashboardConfig;
use crate::format::format_last_update;
use crate::view::{ChartPanel, DashboardModel, DashboardView, PageState};

/// Chart area sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStatus {
    /// Nothing selected
    Idle,
    Loading,
    Ready,
    Empty,
    Error,
}

/// Controller state
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Indicators from the last successful load
    pub indicators: Vec<Indicator>,
    /// Code of the selected indicator
    pub current_indicator: Option<String>,
    /// History window in days
    pub current_days: u32,
    pub page: PageState,
    pub chart: ChartStatus,
    /// Id of the most recent chart request
    latest_request: u64,
}

impl DashboardState {
    fn new(days: u32) -> Self {
        Self {
            indicators: Vec::new(),
            current_indicator: None,
            current_days: days,
            page: PageState::Loading,
            chart: ChartStatus::Idle,
            latest_request: 0,
        }
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn indicator(&self, code: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.code == code)
    }
}

/// A chart load that has been issued but not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub id: u64,
    pub code: String,
    pub days: u32,
}

/// Result of applying a history response
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// Chart drawn with this many points
    Ready { points: usize },
    /// No values in the window
    Empty,
    /// Request failed with this message
    Failed(String),
    /// A newer request exists; response discarded
    Stale,
}

/// Controller errors
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Cannot connect to the backend at {base_url}: {source}")]
    BackendUnavailable {
        base_url: String,
        #[source]
        source: ClientError,
    },

    #[error("Error loading data: {0}")]
    LoadFailed(#[source] ClientError),

    #[error("Invalid day window: {0} (must be at least 1)")]
    InvalidDays(u32),
}

/// Dashboard controller
pub struct DashboardController<V: DashboardView> {
    source: Arc<dyn IndicatorSource>,
    view: V,
    state: DashboardState,
    period_options: Vec<u32>,
}

impl<V: DashboardView> DashboardController<V> {
    pub fn new(source: Arc<dyn IndicatorSource>, view: V, config: &DashboardConfig) -> Self {
        Self {
            source,
            view,
            state: DashboardState::new(config.default_days.max(1)),
            period_options: config.period_options.clone(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Shared handle to the data source, for fetches run outside the controller
    pub fn source(&self) -> Arc<dyn IndicatorSource> {
        Arc::clone(&self.source)
    }

    /// Health check, then initial load
    pub async fn start(&mut self) -> Result<(), DashboardError> {
        tracing::info!(base_url = %self.source.base_url(), "Starting dashboard");

        if let Err(e) = self.source.health().await {
            let base_url = self.source.base_url().to_string();
            let message = format!(
                "Cannot connect to the backend. Check that it is running at {}",
                base_url
            );
            self.state.page = PageState::Error(message.clone());
            self.view.show_error(&message);
            return Err(DashboardError::BackendUnavailable { base_url, source: e });
        }

        self.load_initial_data().await?;
        tracing::info!("Dashboard started");
        Ok(())
    }

    /// Fetch the indicator list and render cards, table and selector
    pub async fn load_initial_data(&mut self) -> Result<(), DashboardError> {
        self.state.page = PageState::Loading;
        self.view.show_loading();

        match self.source.indicators().await {
            Ok(indicators) => {
                tracing::info!(count = indicators.len(), "Indicators loaded");
                self.state.indicators = indicators;

                let model = DashboardModel::build(
                    &self.state.indicators,
                    self.state.current_days,
                    &self.period_options,
                );
                self.view.show_content(&model);
                self.view
                    .set_last_update(&format_last_update(Local::now().naive_local()));
                self.state.page = PageState::Content;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading initial data");
                let message = format!("Error loading data: {}", e);
                self.state.page = PageState::Error(message.clone());
                self.view.show_error(&message);
                Err(DashboardError::LoadFailed(e))
            }
        }
    }

    /// Reload the indicator list, then the selected chart if any
    pub async fn refresh(&mut self) -> Result<Option<ChartOutcome>, DashboardError> {
        self.load_initial_data().await?;

        match self.state.current_indicator.clone() {
            Some(code) => Ok(Some(self.load_indicator_chart(&code).await)),
            None => Ok(None),
        }
    }

    /// Select `code` and load its chart for the current window
    pub async fn load_indicator_chart(&mut self, code: &str) -> ChartOutcome {
        let request = self.begin_chart_request(code);
        let result = self.source.history(&request.code, request.days).await;
        self.apply_chart_response(&request, result)
    }

    /// Handle a selector change. `None` or an empty code clears the selection.
    pub async fn select_indicator(&mut self, code: Option<&str>) -> Option<ChartOutcome> {
        let request = self.begin_selection(code)?;
        let result = self.source.history(&request.code, request.days).await;
        Some(self.apply_chart_response(&request, result))
    }

    /// Handle a period change; reloads the selected indicator only
    pub async fn set_days(&mut self, days: u32) -> Result<Option<ChartOutcome>, DashboardError> {
        let Some(request) = self.begin_days_change(days)? else {
            return Ok(None);
        };
        let result = self.source.history(&request.code, request.days).await;
        Ok(Some(self.apply_chart_response(&request, result)))
    }

    /// First half of a selector change: update state, return the fetch to run
    pub fn begin_selection(&mut self, code: Option<&str>) -> Option<ChartRequest> {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(self.begin_chart_request(code)),
            None => {
                self.clear_selection();
                None
            }
        }
    }

    /// First half of a period change: update state, return the fetch to run
    pub fn begin_days_change(&mut self, days: u32) -> Result<Option<ChartRequest>, DashboardError> {
        if days == 0 {
            return Err(DashboardError::InvalidDays(days));
        }
        self.state.current_days = days;

        Ok(self
            .state
            .current_indicator
            .clone()
            .map(|code| self.begin_chart_request(&code)))
    }

    /// Record the selection, show the chart spinner and issue a request id
    pub fn begin_chart_request(&mut self, code: &str) -> ChartRequest {
        self.state.latest_request += 1;
        let request = ChartRequest {
            id: self.state.latest_request,
            code: code.to_string(),
            days: self.state.current_days,
        };
        tracing::info!(code = %request.code, days = request.days, id = request.id, "Loading chart");

        self.state.current_indicator = Some(request.code.clone());
        self.state.chart = ChartStatus::Loading;
        self.view.select_indicator(Some(&request.code));
        self.view.show_chart(&ChartPanel::Loading {
            code: request.code.clone(),
        });

        request
    }

    /// Apply a history response unless a newer request superseded it
    pub fn apply_chart_response(
        &mut self,
        request: &ChartRequest,
        result: Result<HistoryResponse, ClientError>,
    ) -> ChartOutcome {
        if request.id != self.state.latest_request {
            tracing::warn!(
                code = %request.code,
                id = request.id,
                latest = self.state.latest_request,
                "Discarding stale history response"
            );
            return ChartOutcome::Stale;
        }

        match result {
            Ok(history) if history.is_empty() => {
                tracing::info!(code = %request.code, days = request.days, "No history data");
                self.state.chart = ChartStatus::Empty;
                self.view.show_chart(&ChartPanel::Empty {
                    code: request.code.clone(),
                });
                ChartOutcome::Empty
            }
            Ok(history) => {
                let series = ChartSeries::from_history(&history);
                let points = series.len();
                self.state.chart = ChartStatus::Ready;
                self.view.show_chart(&ChartPanel::Ready(series));
                ChartOutcome::Ready { points }
            }
            Err(e) => {
                tracing::error!(code = %request.code, error = %e, "Error loading chart");
                let message = e.to_string();
                self.state.chart = ChartStatus::Error;
                self.view.show_chart(&ChartPanel::Error(message.clone()));
                ChartOutcome::Failed(message)
            }
        }
    }

    /// Drop the selection; any in-flight response becomes stale
    pub fn clear_selection(&mut self) {
        self.state.latest_request += 1;
        self.state.current_indicator = None;
        self.state.chart = ChartStatus::Idle;
        self.view.select_indicator(None);
        self.view.show_chart(&ChartPanel::Placeholder);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{HealthStatus, HistoryPoint, IndicatorRef};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// In-memory indicator source
    #[derive(Default)]
    pub(crate) struct FixtureSource {
        pub healthy: bool,
        pub indicators_fail: bool,
        pub indicators: Vec<Indicator>,
        /// Codes whose history request fails with HTTP 500
        pub failing: Vec<String>,
        /// Codes with an empty history
        pub empty: Vec<String>,
        pub calls: Mutex<Vec<(String, u32)>>,
    }

    impl FixtureSource {
        pub fn healthy() -> Self {
            let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
            Self {
                healthy: true,
                indicators: vec![
                    Indicator::new("dolar", "Dólar").unit("CLP").latest(943.5, date),
                    Indicator::new("uf", "UF").unit("CLP").latest(39500.0, date),
                    Indicator::new("ipc", "IPC").unit("%"),
                ],
                ..Default::default()
            }
        }

        pub fn history_calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    /// History for `code`: three newest-first points, named after the window
    pub(crate) fn history_for(code: &str, days: u32) -> HistoryResponse {
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        HistoryResponse {
            indicator: IndicatorRef {
                code: code.to_string(),
                name: format!("{} {}d", code, days),
                unit: Some("CLP".to_string()),
            },
            values: vec![
                HistoryPoint { date: day(15), value: 3.0 },
                HistoryPoint { date: day(14), value: 2.0 },
                HistoryPoint { date: day(13), value: 1.0 },
            ],
            count: Some(3),
        }
    }

    #[async_trait]
    impl IndicatorSource for FixtureSource {
        fn base_url(&self) -> &str {
            "http://fixture/api"
        }

        async fn health(&self) -> Result<HealthStatus, ClientError> {
            if self.healthy {
                Ok(HealthStatus {
                    status: "healthy".to_string(),
                    database: Some("connected".to_string()),
                    timestamp: None,
                    error: None,
                })
            } else {
                Err(ClientError::Unavailable("connection refused".to_string()))
            }
        }

        async fn indicators(&self) -> Result<Vec<Indicator>, ClientError> {
            if self.indicators_fail {
                return Err(ClientError::Status {
                    status: 500,
                    message: "database exploded".to_string(),
                });
            }
            Ok(self.indicators.clone())
        }

        async fn history(&self, code: &str, days: u32) -> Result<HistoryResponse, ClientError> {
            self.calls.lock().unwrap().push((code.to_string(), days));

            if self.failing.iter().any(|c| c == code) {
                return Err(ClientError::Status {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            let mut history = history_for(code, days);
            if self.empty.iter().any(|c| c == code) {
                history.values.clear();
                history.count = Some(0);
            }
            Ok(history)
        }
    }

    /// View that records what it was asked to show
    #[derive(Default)]
    pub(crate) struct RecordingView {
        pub events: Vec<String>,
        pub panels: Vec<ChartPanel>,
        pub selected: Option<String>,
    }

    impl RecordingView {
        pub fn last_panel(&self) -> Option<&ChartPanel> {
            self.panels.last()
        }
    }

    impl DashboardView for RecordingView {
        fn show_loading(&mut self) {
            self.events.push("loading".to_string());
        }

        fn show_error(&mut self, message: &str) {
            self.events.push(format!("error: {}", message));
        }

        fn show_content(&mut self, model: &DashboardModel) {
            self.events.push(format!(
                "content: {} cards, {} rows, {} days",
                model.cards.len(),
                model.rows.len(),
                model.selected_days
            ));
        }

        fn show_chart(&mut self, panel: &ChartPanel) {
            self.panels.push(panel.clone());
        }

        fn select_indicator(&mut self, code: Option<&str>) {
            self.selected = code.map(str::to_string);
        }

        fn set_last_update(&mut self, _stamp: &str) {
            self.events.push("last_update".to_string());
        }

        fn show_notice(&mut self, message: &str) {
            self.events.push(format!("notice: {}", message));
        }
    }

    fn controller(
        source: FixtureSource,
    ) -> (DashboardController<RecordingView>, Arc<FixtureSource>) {
        let source = Arc::new(source);
        let controller = DashboardController::new(
            source.clone(),
            RecordingView::default(),
            &DashboardConfig::default(),
        );
        (controller, source)
    }

    #[tokio::test]
    async fn test_start_happy_path() {
        let (mut ctl, _) = controller(FixtureSource::healthy());

        ctl.start().await.unwrap();

        assert_eq!(ctl.state().page, PageState::Content);
        assert_eq!(ctl.state().indicators.len(), 3);
        assert_eq!(ctl.state().current_days, 30);
        assert_eq!(
            ctl.view().events,
            vec!["loading", "content: 2 cards, 3 rows, 30 days", "last_update"]
        );
    }

    #[tokio::test]
    async fn test_start_backend_down() {
        let (mut ctl, _) = controller(FixtureSource::default());

        let err = ctl.start().await.unwrap_err();

        assert!(matches!(err, DashboardError::BackendUnavailable { .. }));
        assert!(matches!(ctl.state().page, PageState::Error(_)));
        assert_eq!(
            ctl.view().events,
            vec!["error: Cannot connect to the backend. Check that it is running at http://fixture/api"]
        );
    }

    #[tokio::test]
    async fn test_initial_load_failure() {
        let (mut ctl, _) = controller(FixtureSource {
            indicators_fail: true,
            ..FixtureSource::healthy()
        });

        let err = ctl.start().await.unwrap_err();

        assert!(matches!(err, DashboardError::LoadFailed(_)));
        assert_eq!(ctl.view().events.len(), 2);
        assert_eq!(
            ctl.view().events[1],
            "error: Error loading data: HTTP error 500: database exploded"
        );
    }

    #[tokio::test]
    async fn test_load_chart_is_chronological() {
        let (mut ctl, _) = controller(FixtureSource::healthy());
        ctl.start().await.unwrap();

        let outcome = ctl.load_indicator_chart("dolar").await;

        assert_eq!(outcome, ChartOutcome::Ready { points: 3 });
        assert_eq!(ctl.state().chart, ChartStatus::Ready);
        assert_eq!(ctl.state().current_indicator.as_deref(), Some("dolar"));
        assert_eq!(ctl.view().selected.as_deref(), Some("dolar"));

        let panels = &ctl.view().panels;
        assert_eq!(panels[0], ChartPanel::Loading { code: "dolar".into() });
        match &panels[1] {
            ChartPanel::Ready(series) => {
                assert_eq!(series.values, vec![1.0, 2.0, 3.0]);
                assert_eq!(series.labels, vec!["13 oct", "14 oct", "15 oct"]);
                assert_eq!(series.label, "dolar 30d");
            }
            other => panic!("expected chart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_history_shows_empty_state() {
        let (mut ctl, _) = controller(FixtureSource {
            empty: vec!["ipc".to_string()],
            ..FixtureSource::healthy()
        });

        let outcome = ctl.select_indicator(Some("ipc")).await;

        assert_eq!(outcome, Some(ChartOutcome::Empty));
        assert_eq!(ctl.state().chart, ChartStatus::Empty);
        assert_eq!(
            ctl.view().last_panel(),
            Some(&ChartPanel::Empty { code: "ipc".into() })
        );
    }

    #[tokio::test]
    async fn test_history_error_shows_inline_message() {
        let (mut ctl, _) = controller(FixtureSource {
            failing: vec!["uf".to_string()],
            ..FixtureSource::healthy()
        });
        ctl.start().await.unwrap();

        let outcome = ctl.load_indicator_chart("uf").await;

        assert!(matches!(outcome, ChartOutcome::Failed(ref m) if m.contains("500")));
        assert_eq!(ctl.state().chart, ChartStatus::Error);
        assert!(matches!(ctl.view().last_panel(), Some(ChartPanel::Error(_))));
        // Chart failures stay inline; the page keeps its content
        assert_eq!(ctl.state().page, PageState::Content);
    }

    #[tokio::test]
    async fn test_days_change_refetches_selected_only() {
        let (mut ctl, source) = controller(FixtureSource::healthy());
        ctl.start().await.unwrap();

        ctl.select_indicator(Some("uf")).await;
        let outcome = ctl.set_days(90).await.unwrap();

        assert_eq!(outcome, Some(ChartOutcome::Ready { points: 3 }));
        assert_eq!(
            source.history_calls(),
            vec![("uf".to_string(), 30), ("uf".to_string(), 90)]
        );
        assert_eq!(ctl.state().current_days, 90);
    }

    #[tokio::test]
    async fn test_days_change_without_selection() {
        let (mut ctl, source) = controller(FixtureSource::healthy());

        let outcome = ctl.set_days(7).await.unwrap();

        assert_eq!(outcome, None);
        assert!(source.history_calls().is_empty());
        assert_eq!(ctl.state().current_days, 7);

        ctl.load_indicator_chart("dolar").await;
        assert_eq!(source.history_calls(), vec![("dolar".to_string(), 7)]);
    }

    #[tokio::test]
    async fn test_zero_days_rejected() {
        let (mut ctl, _) = controller(FixtureSource::healthy());

        let err = ctl.set_days(0).await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDays(0)));
        assert_eq!(ctl.state().current_days, 30);
    }

    #[tokio::test]
    async fn test_clear_selection_shows_placeholder() {
        let (mut ctl, source) = controller(FixtureSource::healthy());
        ctl.select_indicator(Some("dolar")).await;

        let outcome = ctl.select_indicator(Some("  ")).await;

        assert_eq!(outcome, None);
        assert_eq!(ctl.state().current_indicator, None);
        assert_eq!(ctl.state().chart, ChartStatus::Idle);
        assert_eq!(ctl.view().last_panel(), Some(&ChartPanel::Placeholder));
        assert_eq!(ctl.view().selected, None);

        ctl.set_days(90).await.unwrap();
        assert_eq!(source.history_calls().len(), 1);
    }

    #[test]
    fn test_stale_response_discarded() {
        let (mut ctl, _) = controller(FixtureSource::healthy());

        let first = ctl.begin_chart_request("dolar");
        let second = ctl.begin_chart_request("uf");
        assert!(second.id > first.id);

        let applied = ctl.apply_chart_response(&second, Ok(history_for("uf", 30)));
        let stale = ctl.apply_chart_response(&first, Ok(history_for("dolar", 30)));

        assert_eq!(applied, ChartOutcome::Ready { points: 3 });
        assert_eq!(stale, ChartOutcome::Stale);
        assert_eq!(ctl.state().current_indicator.as_deref(), Some("uf"));
        match ctl.view().last_panel() {
            Some(ChartPanel::Ready(series)) => assert_eq!(series.label, "uf 30d"),
            other => panic!("expected uf chart, got {:?}", other),
        }
    }

    #[test]
    fn test_response_after_clear_is_stale() {
        let (mut ctl, _) = controller(FixtureSource::healthy());

        let request = ctl.begin_chart_request("dolar");
        ctl.clear_selection();

        let outcome = ctl.apply_chart_response(&request, Ok(history_for("dolar", 30)));
        assert_eq!(outcome, ChartOutcome::Stale);
        assert_eq!(ctl.view().last_panel(), Some(&ChartPanel::Placeholder));
    }

    #[tokio::test]
    async fn test_refresh_reloads_selected_chart() {
        let (mut ctl, source) = controller(FixtureSource::healthy());
        ctl.start().await.unwrap();
        ctl.select_indicator(Some("dolar")).await;

        let outcome = ctl.refresh().await.unwrap();

        assert_eq!(outcome, Some(ChartOutcome::Ready { points: 3 }));
        assert_eq!(source.history_calls().len(), 2);
        assert_eq!(
            ctl.view().events.iter().filter(|e| *e == "loading").count(),
            2
        );
    }
}
