//! SVG line chart rendering for price series.
//!
//! Series share a date x-axis. The first series is scaled against the left
//! y-axis, the second against the right one, so assets of very different
//! magnitude stay readable side by side.

use crate::ports::chart_port::{Chart, NamedSeries};
use chrono::NaiveDate;

pub const CHART_WIDTH: f64 = 960.0;
pub const CHART_HEIGHT: f64 = 440.0;
pub const MARGIN_LEFT: f64 = 90.0;
pub const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Markers are skipped above this many points per series.
const MAX_MARKERS: usize = 400;

pub const SERIES_COLORS: [&str; 2] = ["#38bdf8", "#f59e0b"];
const BACKGROUND: &str = "#111111";
const AXIS: &str = "#444444";
const LABEL: &str = "#bbbbbb";

pub fn fmt_price(value: f64) -> String {
    let abs = value.abs();
    let body = if abs >= 1000.0 {
        let whole = format!("{:.0}", abs.trunc());
        let mut grouped = String::new();
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    } else if abs >= 1.0 {
        format!("{:.2}", abs)
    } else {
        format!("{:.4}", abs)
    };
    if value < 0.0 {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct DateAxis {
    min: NaiveDate,
    span_days: i64,
}

impl DateAxis {
    fn for_series(series: &[NamedSeries]) -> Option<Self> {
        let dates = series
            .iter()
            .flat_map(|s| s.series.iter().map(|p| p.date));
        let min = dates.clone().min()?;
        let max = dates.max()?;
        Some(Self {
            min,
            span_days: (max - min).num_days(),
        })
    }

    /// A single-day axis puts everything at the plot centre.
    fn x(&self, date: NaiveDate) -> f64 {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.span_days == 0 {
            return MARGIN_LEFT + plot_width / 2.0;
        }
        MARGIN_LEFT + ((date - self.min).num_days() as f64 / self.span_days as f64) * plot_width
    }

    /// Start, middle and end labels, without repeated dates.
    fn ticks(&self) -> Vec<(NaiveDate, &'static str)> {
        if self.span_days == 0 {
            return vec![(self.min, "middle")];
        }
        let mut ticks: Vec<(NaiveDate, &'static str)> = Vec::with_capacity(3);
        for (fraction, anchor) in [(0.0, "start"), (0.5, "middle"), (1.0, "end")] {
            let offset = (self.span_days as f64 * fraction).round() as i64;
            let date = self.min + chrono::Duration::days(offset);
            match ticks.last_mut() {
                Some(last) if last.0 == date => last.1 = anchor,
                _ => ticks.push((date, anchor)),
            }
        }
        ticks
    }
}

struct PriceAxis {
    min: f64,
    max: f64,
}

impl PriceAxis {
    fn for_series(series: &NamedSeries) -> Option<Self> {
        Some(Self {
            min: series.series.min_price()?,
            max: series.series.max_price()?,
        })
    }

    fn y(&self, price: f64) -> f64 {
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let range = self.max - self.min;
        if range > 0.0 {
            MARGIN_TOP + plot_height - ((price - self.min) / range) * plot_height
        } else {
            MARGIN_TOP + plot_height / 2.0
        }
    }
}

/// Returns an `<svg>` element. Charts without any points carry a notice
/// instead of axes.
pub fn generate_price_svg(chart: &Chart, markers: bool) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg id="price-chart" width="{}" height="{}" viewBox="0 0 {} {}" preserveAspectRatio="none" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str(&format!(
        "\n  <rect x=\"-100000\" width=\"200000\" height=\"100%\" fill=\"{}\"/>\n",
        BACKGROUND
    ));

    let Some(x_axis) = DateAxis::for_series(&chart.series) else {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"16\" fill=\"{}\">No price data in selected range</text>\n",
            CHART_WIDTH / 2.0,
            CHART_HEIGHT / 2.0,
            LABEL
        ));
        svg.push_str("</svg>");
        return svg;
    };

    let bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let plot_height = bottom - MARGIN_TOP;
    svg.push_str(&format!(
        "  <line x1=\"{0}\" y1=\"{1}\" x2=\"{2}\" y2=\"{1}\" stroke=\"{3}\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        bottom,
        CHART_WIDTH - MARGIN_RIGHT,
        AXIS
    ));

    for (date, anchor) in x_axis.ticks() {
        svg.push_str(&format!(
            "  <text class=\"x-label\" x=\"{:.1}\" y=\"{}\" text-anchor=\"{}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            x_axis.x(date),
            CHART_HEIGHT - 15.0,
            anchor,
            LABEL,
            date
        ));
    }

    for (idx, named) in chart.series.iter().take(2).enumerate() {
        let color = SERIES_COLORS[idx];
        let Some(y_axis) = PriceAxis::for_series(named) else {
            continue;
        };

        let (axis_x, label_x, anchor) = if idx == 0 {
            (MARGIN_LEFT, MARGIN_LEFT - 6.0, "end")
        } else {
            (CHART_WIDTH - MARGIN_RIGHT, CHART_WIDTH - MARGIN_RIGHT + 6.0, "start")
        };
        svg.push_str(&format!(
            "  <line x1=\"{0}\" y1=\"{1}\" x2=\"{0}\" y2=\"{2}\" stroke=\"{3}\" stroke-width=\"1\"/>\n",
            axis_x, MARGIN_TOP, bottom, color
        ));
        for (y, value) in [
            (MARGIN_TOP + 4.0, y_axis.max),
            (MARGIN_TOP + plot_height / 2.0, (y_axis.max + y_axis.min) / 2.0),
            (bottom - 2.0, y_axis.min),
        ] {
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
                label_x,
                y,
                anchor,
                color,
                fmt_price(value)
            ));
        }

        let mut path_data = String::new();
        for (i, point) in named.series.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            path_data.push_str(&format!(
                "{} {:.1} {:.1}",
                cmd,
                x_axis.x(point.date),
                y_axis.y(point.price)
            ));
        }
        svg.push_str(&format!(
            "  <path class=\"series\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" vector-effect=\"non-scaling-stroke\"><title>{}</title></path>\n",
            path_data,
            color,
            escape(&named.label)
        ));

        if markers && named.series.len() <= MAX_MARKERS {
            for point in named.series.iter() {
                svg.push_str(&format!(
                    "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"2.5\" fill=\"{}\"><title>{} {}</title></circle>\n",
                    x_axis.x(point.date),
                    y_axis.y(point.price),
                    color,
                    point.date,
                    fmt_price(point.price)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}
