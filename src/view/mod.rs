//! Dashboard View Layer
//!
//! View models built from indicator data, and the [`DashboardView`] trait
//! the controller renders through. Nothing here knows how the dashboard is
//! displayed; [`TerminalView`] is one implementation.

mod terminal;

pub use terminal::TerminalView;

use crate::api::Indicator;
use crate::chart::ChartSeries;
use crate::format::{format_currency, format_date};

/// Label of the empty entry at the top of the indicator selector
pub const SELECT_PLACEHOLDER: &str = "Select an indicator";

/// Summary card for one indicator
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub code: String,
    pub name: String,
    pub value: String,
    pub updated: String,
}

impl StatCard {
    pub fn from_indicator(indicator: &Indicator) -> Self {
        Self {
            code: indicator.code.clone(),
            name: indicator.name.clone(),
            value: format_currency(indicator.latest_value, indicator.unit.as_deref()),
            updated: indicator
                .latest_date
                .map(format_date)
                .unwrap_or_else(|| "No date".to_string()),
        }
    }
}

/// One row of the indicators table
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub code: String,
    pub name: String,
    pub value: String,
    pub unit: String,
    pub date: String,
}

impl TableRow {
    pub fn from_indicator(indicator: &Indicator) -> Self {
        Self {
            code: indicator.code.clone(),
            name: indicator.name.clone(),
            value: format_currency(indicator.latest_value, indicator.unit.as_deref()),
            unit: indicator
                .unit
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "-".to_string()),
            date: indicator
                .latest_date
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Entry of the indicator selector
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// Indicator code, empty for the placeholder entry
    pub value: String,
    pub label: String,
}

/// One card per indicator that has a latest value
pub fn stat_cards(indicators: &[Indicator]) -> Vec<StatCard> {
    indicators
        .iter()
        .filter(|i| i.latest_value.is_some())
        .map(StatCard::from_indicator)
        .collect()
}

/// One row per indicator
pub fn table_rows(indicators: &[Indicator]) -> Vec<TableRow> {
    indicators.iter().map(TableRow::from_indicator).collect()
}

/// Selector entries: the placeholder, then `"{name} ({code})"` per indicator
pub fn indicator_options(indicators: &[Indicator]) -> Vec<SelectOption> {
    std::iter::once(SelectOption {
        value: String::new(),
        label: SELECT_PLACEHOLDER.to_string(),
    })
    .chain(indicators.iter().map(|i| SelectOption {
        value: i.code.clone(),
        label: format!("{} ({})", i.name, i.code),
    }))
    .collect()
}

/// Everything shown once indicators are loaded
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub cards: Vec<StatCard>,
    pub rows: Vec<TableRow>,
    pub options: Vec<SelectOption>,
    pub selected_days: u32,
    pub period_options: Vec<u32>,
}

impl DashboardModel {
    pub fn build(indicators: &[Indicator], selected_days: u32, period_options: &[u32]) -> Self {
        Self {
            cards: stat_cards(indicators),
            rows: table_rows(indicators),
            options: indicator_options(indicators),
            selected_days,
            period_options: period_options.to_vec(),
        }
    }
}

/// Top-level page state
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Loading,
    Error(String),
    Content,
}

/// What the chart area currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel {
    /// Nothing selected
    Placeholder,
    /// History request in flight
    Loading { code: String },
    /// Chart drawn
    Ready(ChartSeries),
    /// Backend returned no values for the window
    Empty { code: String },
    /// History request failed
    Error(String),
}

impl ChartPanel {
    /// Text shown instead of a chart
    pub fn message(&self) -> Option<String> {
        match self {
            ChartPanel::Placeholder => {
                Some("No data. Select an indicator to see its history.".to_string())
            }
            ChartPanel::Loading { code } => Some(format!("Loading chart for {}...", code)),
            ChartPanel::Ready(_) => None,
            ChartPanel::Empty { .. } => Some(
                "No history data. There is no data for this indicator in the selected period."
                    .to_string(),
            ),
            ChartPanel::Error(message) => Some(format!("Could not load the chart: {}", message)),
        }
    }
}

/// Rendering target of the dashboard controller
pub trait DashboardView {
    /// Page-wide loading state; hides content and errors
    fn show_loading(&mut self);

    /// Global error banner
    fn show_error(&mut self, message: &str);

    /// Cards, table and selector
    fn show_content(&mut self, model: &DashboardModel);

    /// Chart area
    fn show_chart(&mut self, panel: &ChartPanel);

    /// Keep the selector in sync with the selected indicator
    fn select_indicator(&mut self, code: Option<&str>);

    fn set_last_update(&mut self, stamp: &str);

    /// Informational text (help, rejected input)
    fn show_notice(&mut self, _message: &str) {}
}
