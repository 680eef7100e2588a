//! Line Chart Rendering
//!
//! A [`ChartRenderer`] owns at most one live chart on a [`ChartSurface`].
//! Each update disposes the previous chart before drawing the new one, so
//! repeated re-renders never stack instances.
//!
//! The backend returns history newest-first; [`ChartSeries`] constructors
//! reverse it so the x-axis always runs oldest → newest.

mod text;

pub use text::{TextChartHandle, TextSurface};

use thiserror::Error;

use crate::api::HistoryResponse;
use crate::format::format_short_date;

/// Where the legend is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
    Bottom,
    Hidden,
}

/// Fixed visual configuration shared by every chart
///
/// Colors, widths, tension and point radii are for graphical surfaces.
/// [`TextSurface`] reads only `legend`, `grid_lines` and `y_padding_ratio`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub line_color: String,
    pub fill_color: String,
    pub border_width: f64,
    /// Bezier tension of the line (0 = straight segments)
    pub tension: f64,
    pub point_radius: f64,
    pub point_hover_radius: f64,
    pub grid_color: String,
    pub tick_color: String,
    pub legend: LegendPosition,
    /// Number of horizontal gridlines (y ticks)
    pub grid_lines: usize,
    /// Fraction of the value range added above and below the data
    pub y_padding_ratio: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_color: "#3b82f6".to_string(),
            fill_color: "rgba(59, 130, 246, 0.1)".to_string(),
            border_width: 2.0,
            tension: 0.4,
            point_radius: 3.0,
            point_hover_radius: 6.0,
            grid_color: "rgba(255, 255, 255, 0.05)".to_string(),
            tick_color: "#9ca3af".to_string(),
            legend: LegendPosition::Top,
            grid_lines: 5,
            y_padding_ratio: 0.1,
        }
    }
}

/// One line series in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// X-axis labels, oldest first
    pub labels: Vec<String>,
    /// Y values, aligned with `labels`
    pub values: Vec<f64>,
    /// Series name shown in the legend
    pub label: String,
}

impl ChartSeries {
    /// Build a series from data that is already oldest-first
    pub fn chronological(labels: Vec<String>, values: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            labels,
            values,
            label: label.into(),
        }
    }

    /// Build a series from newest-first data, reversing it
    pub fn from_newest_first(
        mut labels: Vec<String>,
        mut values: Vec<f64>,
        label: impl Into<String>,
    ) -> Self {
        labels.reverse();
        values.reverse();
        Self::chronological(labels, values, label)
    }

    /// Build the series for an indicator history response
    pub fn from_history(history: &HistoryResponse) -> Self {
        let labels = history
            .values
            .iter()
            .map(|p| format_short_date(p.date))
            .collect();
        let values = history.values.iter().map(|p| p.value).collect();

        Self::from_newest_first(labels, values, history.indicator.name.clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (min, max) of the values, `None` for an empty series
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Chart errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Chart surface not found")]
    SurfaceMissing,

    #[error("Labels and values differ in length ({labels} vs {values})")]
    LengthMismatch { labels: usize, values: usize },
}

/// A place charts can be drawn on
pub trait ChartSurface {
    /// Identifies one drawn chart so it can be disposed later
    type Handle;

    /// False when there is nowhere to draw
    fn is_attached(&self) -> bool;

    /// Draw a new chart
    fn draw(&mut self, series: &ChartSeries, style: &ChartStyle)
        -> Result<Self::Handle, ChartError>;

    /// Release a chart previously returned by `draw`
    fn dispose(&mut self, handle: Self::Handle);
}

/// Owns the single active chart on a surface
pub struct ChartRenderer<S: ChartSurface> {
    surface: S,
    style: ChartStyle,
    active: Option<S::Handle>,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_style(surface, ChartStyle::default())
    }

    pub fn with_style(surface: S, style: ChartStyle) -> Self {
        Self {
            surface,
            style,
            active: None,
        }
    }

    /// Replace the displayed chart with `series`
    pub fn create_or_update(&mut self, series: &ChartSeries) -> Result<(), ChartError> {
        if !self.surface.is_attached() {
            tracing::error!("Chart surface not found");
            return Err(ChartError::SurfaceMissing);
        }
        if series.labels.len() != series.values.len() {
            return Err(ChartError::LengthMismatch {
                labels: series.labels.len(),
                values: series.values.len(),
            });
        }

        self.clear();

        let handle = self.surface.draw(series, &self.style)?;
        self.active = Some(handle);
        tracing::debug!(series = %series.label, points = series.len(), "Chart drawn");
        Ok(())
    }

    /// Dispose the active chart, if any
    pub fn clear(&mut self) {
        if let Some(handle) = self.active.take() {
            self.surface.dispose(handle);
        }
    }

    pub fn has_chart(&self) -> bool {
        self.active.is_some()
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
