//! Terminal View
//!
//! Renders the dashboard as plain text on any writer.

use std::io::Write;

use super::{ChartPanel, DashboardModel, DashboardView};
use crate::chart::{ChartRenderer, ChartStyle, TextSurface};

/// Dashboard rendered to a text stream
pub struct TerminalView<W: Write> {
    out: W,
    chart: ChartRenderer<TextSurface>,
    selected: Option<String>,
}

impl<W: Write> TerminalView<W> {
    /// Create a view with a chart plot area of `chart_width` x `chart_height`
    pub fn new(out: W, chart_width: usize, chart_height: usize) -> Self {
        Self::with_surface(out, TextSurface::new(chart_width, chart_height))
    }

    pub fn with_surface(out: W, surface: TextSurface) -> Self {
        Self {
            out,
            chart: ChartRenderer::with_style(surface, ChartStyle::default()),
            selected: None,
        }
    }

    /// Code currently shown as selected
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn chart(&self) -> &ChartRenderer<TextSurface> {
        &self.chart
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write dashboard output");
        }
    }

    fn section(title: &str) -> String {
        format!("\n{}\n{}\n", title, "=".repeat(title.chars().count()))
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn show_loading(&mut self) {
        self.chart.clear();
        self.emit("Loading indicators...\n");
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("ERROR: {}\n", message));
    }

    fn show_content(&mut self, model: &DashboardModel) {
        let mut text = Self::section("Indicators");

        if model.cards.is_empty() {
            text.push_str("No indicator has values yet.\n");
        }
        for card in &model.cards {
            text.push_str(&format!(
                "[{}] {}\n    {}  (updated: {})\n",
                card.code, card.name, card.value, card.updated
            ));
        }

        text.push_str(&Self::section("Table"));
        text.push_str(&format!(
            "{:<12} {:<32} {:>16} {:<6} {}\n",
            "Code", "Name", "Value", "Unit", "Date"
        ));
        text.push_str(&format!("{}\n", "-".repeat(80)));
        for row in &model.rows {
            text.push_str(&format!(
                "{:<12} {:<32} {:>16} {:<6} {}\n",
                row.code, row.name, row.value, row.unit, row.date
            ));
        }

        text.push_str(&Self::section("Chart"));
        let codes: Vec<&str> = model
            .options
            .iter()
            .filter(|o| !o.value.is_empty())
            .map(|o| o.value.as_str())
            .collect();
        text.push_str(&format!("Available: {}\n", codes.join(", ")));
        let periods: Vec<String> = model
            .period_options
            .iter()
            .map(|d| {
                if *d == model.selected_days {
                    format!("[{}d]", d)
                } else {
                    format!("{}d", d)
                }
            })
            .collect();
        text.push_str(&format!("Period: {}\n", periods.join(" ")));

        self.emit(&text);
    }

    fn show_chart(&mut self, panel: &ChartPanel) {
        if let ChartPanel::Ready(series) = panel {
            match self.chart.create_or_update(series) {
                Ok(()) => {
                    let text = self
                        .chart
                        .surface()
                        .rendered()
                        .unwrap_or_default()
                        .to_string();
                    self.emit(&format!("\n{}", text));
                }
                Err(e) => {
                    self.emit(&format!("Could not load the chart: {}\n", e));
                }
            }
            return;
        }

        self.chart.clear();
        if let Some(message) = panel.message() {
            self.emit(&format!("{}\n", message));
        }
    }

    fn select_indicator(&mut self, code: Option<&str>) {
        self.selected = code.map(str::to_string);
    }

    fn set_last_update(&mut self, stamp: &str) {
        self.emit(&format!("Last update: {}\n", stamp));
    }

    fn show_notice(&mut self, message: &str) {
        self.emit(&format!("{}\n", message));
    }
}
