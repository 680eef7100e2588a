//! Text Chart Surface
//!
//! Plots a line chart into a character grid for terminal output.

use super::{ChartError, ChartSeries, ChartStyle, ChartSurface, LegendPosition};
use crate::format::format_axis_value;

const GRID: char = '┄';
const PATH: char = '·';
const POINT: char = '●';

/// Identifies a chart drawn on a [`TextSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChartHandle(u64);

/// Character-grid chart surface
///
/// Holds the text of the most recently drawn chart until it is disposed.
pub struct TextSurface {
    width: usize,
    height: usize,
    attached: bool,
    next_handle: u64,
    current: Option<(TextChartHandle, String)>,
}

impl TextSurface {
    /// Create a surface with a plot area of `width` x `height` cells
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(2),
            height: height.max(2),
            attached: true,
            next_handle: 0,
            current: None,
        }
    }

    /// A surface with nowhere to draw
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::new(60, 12)
        }
    }

    /// Text of the live chart
    pub fn rendered(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, text)| text.as_str())
    }

    fn render(&self, series: &ChartSeries, style: &ChartStyle) -> String {
        let mut out = String::new();
        let legend = format!("── {}", series.label);

        if style.legend == LegendPosition::Top {
            out.push_str(&legend);
            out.push('\n');
        }

        match series.bounds() {
            Some((min, max)) => self.render_plot(&mut out, series, style, min, max),
            None => out.push_str("(no data)\n"),
        }

        if style.legend == LegendPosition::Bottom {
            out.push_str(&legend);
            out.push('\n');
        }

        out
    }

    fn render_plot(
        &self,
        out: &mut String,
        series: &ChartSeries,
        style: &ChartStyle,
        min: f64,
        max: f64,
    ) {
        let (width, height) = (self.width, self.height);
        let last_row = (height - 1) as f64;

        let range = max - min;
        let pad = if range > 0.0 { range * style.y_padding_ratio } else { 1.0 };
        let (lo, hi) = (min - pad, max + pad);

        let row_of = |v: f64| -> usize {
            let r = ((hi - v) / (hi - lo) * last_row).round();
            (r.max(0.0) as usize).min(height - 1)
        };
        let n = series.values.len();
        let col_of = |i: usize| -> usize {
            if n == 1 {
                width / 2
            } else {
                i * (width - 1) / (n - 1)
            }
        };

        let mut cells = vec![vec![' '; width]; height];

        let ticks = style.grid_lines.max(2);
        let grid_rows: Vec<usize> = (0..ticks).map(|k| k * (height - 1) / (ticks - 1)).collect();
        for &row in &grid_rows {
            cells[row].iter_mut().for_each(|c| *c = GRID);
        }

        // Interpolated path between consecutive points
        for i in 1..n {
            let (c0, c1) = (col_of(i - 1), col_of(i));
            let (v0, v1) = (series.values[i - 1], series.values[i]);
            for col in (c0 + 1)..c1 {
                let t = (col - c0) as f64 / (c1 - c0) as f64;
                cells[row_of(v0 + (v1 - v0) * t)][col] = PATH;
            }
        }
        for (i, &v) in series.values.iter().enumerate() {
            cells[row_of(v)][col_of(i)] = POINT;
        }

        let tick_label = |row: usize| format_axis_value(hi - row as f64 / last_row * (hi - lo));
        let label_width = grid_rows
            .iter()
            .map(|&r| tick_label(r).chars().count())
            .max()
            .unwrap_or(0);

        for (row, line) in cells.iter().enumerate() {
            let line: String = line.iter().collect();
            if grid_rows.contains(&row) {
                out.push_str(&format!("{:>w$} ┤{}\n", tick_label(row), line, w = label_width));
            } else {
                out.push_str(&format!("{:>w$} │{}\n", "", line, w = label_width));
            }
        }
        out.push_str(&format!("{:>w$} └{}\n", "", "─".repeat(width), w = label_width));
        out.push_str(&format!(
            "{:>w$}  {}\n",
            "",
            x_axis_labels(&series.labels, width, col_of),
            w = label_width
        ));
    }
}

/// First, middle and last labels placed under their columns when they fit
fn x_axis_labels(labels: &[String], width: usize, col_of: impl Fn(usize) -> usize) -> String {
    let mut axis = vec![' '; width];
    if labels.is_empty() {
        return String::new();
    }

    let mut place = |start: usize, text: &str| {
        let len = text.chars().count();
        if start + len > width {
            return;
        }
        let lo = start.saturating_sub(1);
        let hi = (start + len + 1).min(width);
        if axis[lo..hi].iter().any(|c| *c != ' ') {
            return;
        }
        for (offset, c) in text.chars().enumerate() {
            axis[start + offset] = c;
        }
    };

    let last = labels.len() - 1;
    place(0, &labels[0]);
    if last > 0 {
        let len = labels[last].chars().count();
        place(width.saturating_sub(len), &labels[last]);
    }
    if last > 1 {
        let mid = last / 2;
        let len = labels[mid].chars().count();
        place(col_of(mid).saturating_sub(len / 2), &labels[mid]);
    }

    axis.into_iter().collect::<String>().trim_end().to_string()
}

impl ChartSurface for TextSurface {
    type Handle = TextChartHandle;

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn draw(
        &mut self,
        series: &ChartSeries,
        style: &ChartStyle,
    ) -> Result<TextChartHandle, ChartError> {
        if !self.attached {
            return Err(ChartError::SurfaceMissing);
        }

        self.next_handle += 1;
        let handle = TextChartHandle(self.next_handle);
        let text = self.render(series, style);
        self.current = Some((handle, text));
        Ok(handle)
    }

    fn dispose(&mut self, handle: TextChartHandle) {
        if matches!(&self.current, Some((live, _)) if *live == handle) {
            self.current = None;
        }
    }
}
