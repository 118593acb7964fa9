//! HTML chart adapter implementing ChartPort.
//!
//! Writes a self-contained page: dark theme, inline SVG from [`chart_svg`],
//! a legend with per-series summaries and a range slider that narrows the
//! visible date window.
//!
//! [`chart_svg`]: crate::adapters::chart_svg

use crate::adapters::chart_svg::{
    fmt_price, generate_price_svg, CHART_HEIGHT, CHART_WIDTH, MARGIN_LEFT, MARGIN_RIGHT,
    SERIES_COLORS,
};
use crate::domain::error::CryptochartError;
use crate::ports::chart_port::{Chart, ChartPort, NamedSeries};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
  body { background: #0b0b0b; color: #dddddd; font-family: sans-serif; margin: 24px; }
  h1 { font-size: 16px; font-weight: normal; }
  .legend span { margin-right: 24px; font-size: 13px; }
  .slider { width: {{WIDTH}}px; margin-top: 12px; font-size: 12px; }
  .slider input { width: 100%; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<div class="legend">
{{LEGEND}}
</div>
{{CHART}}
<div class="slider">
  <label>From <input id="range-start" type="range" min="0" max="1000" value="0"></label>
  <label>To <input id="range-end" type="range" min="0" max="1000" value="1000"></label>
</div>
<script>
(function () {
  var svg = document.getElementById("price-chart");
  var start = document.getElementById("range-start");
  var end = document.getElementById("range-end");
  if (!svg) { return; }
  var left = {{PLOT_LEFT}}, width = {{PLOT_WIDTH}}, full = {{WIDTH}}, height = {{HEIGHT}};
  function update() {
    var a = Math.min(+start.value, +end.value - 1) / 1000;
    var b = Math.max(+end.value, +start.value + 1) / 1000;
    var x0 = left + a * width;
    var x1 = left + b * width;
    var scale = (x1 - x0) / width;
    svg.setAttribute("viewBox", (x0 - left * scale) + " 0 " + (full * scale) + " " + height);
  }
  start.addEventListener("input", update);
  end.addEventListener("input", update);
})();
</script>
</body>
</html>
"#;

pub struct HtmlChartAdapter {
    output: PathBuf,
    markers: bool,
}

impl HtmlChartAdapter {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            markers: true,
        }
    }

    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn legend_entry(idx: usize, named: &NamedSeries) -> String {
    let color = SERIES_COLORS[idx.min(SERIES_COLORS.len() - 1)];
    let summary = match (named.series.first(), named.series.last()) {
        (Some(first), Some(last)) => format!(
            "{} points, {} to {}, last {}",
            named.series.len(),
            first.date,
            last.date,
            fmt_price(last.price)
        ),
        _ => "no data".to_string(),
    };
    format!(
        "<span style=\"color: {}\">&#9632; {} ({})</span>",
        color,
        escape(&named.label),
        summary
    )
}

/// Resolves every `{{PLACEHOLDER}}` in the page template.
pub fn render_page(chart: &Chart, markers: bool) -> String {
    let legend: Vec<String> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| legend_entry(i, s))
        .collect();

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape(&chart.title))
        .replace("{{LEGEND}}", &legend.join("\n"))
        .replace("{{CHART}}", &generate_price_svg(chart, markers))
        .replace("{{PLOT_LEFT}}", &format!("{}", MARGIN_LEFT))
        .replace("{{PLOT_WIDTH}}", &format!("{}", plot_width))
        .replace("{{WIDTH}}", &format!("{}", CHART_WIDTH))
        .replace("{{HEIGHT}}", &format!("{}", CHART_HEIGHT))
}

impl ChartPort for HtmlChartAdapter {
    fn render(&self, chart: &Chart) -> Result<PathBuf, CryptochartError> {
        if chart.series.is_empty() || chart.series.len() > 2 {
            return Err(CryptochartError::Chart {
                reason: format!("expected one or two series, got {}", chart.series.len()),
            });
        }

        let html = render_page(chart, self.markers);

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output, html)?;

        info!(path = %self.output.display(), series = chart.series.len(), "chart written");
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::{PricePoint, PriceSeries};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn series(label: &str, n: usize) -> NamedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        NamedSeries {
            label: label.to_string(),
            series: (0..n)
                .map(|i| {
                    PricePoint::new(start + chrono::Duration::days(i as i64), 100.0 + i as f64)
                })
                .collect::<PriceSeries>(),
        }
    }

    #[test]
    fn render_writes_html_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("charts").join("btc.html");
        let adapter = HtmlChartAdapter::new(output.clone());
        let chart = Chart {
            title: "Bitcoin Price Over Time".into(),
            series: vec![series("Bitcoin", 5)],
        };

        let written = adapter.render(&chart).unwrap();

        assert_eq!(written, output);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>Bitcoin Price Over Time</title>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("range-start"));
        assert!(html.contains("5 points, 2024-01-01 to 2024-01-05"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn render_empty_series_gracefully() {
        let dir = tempdir().unwrap();
        let adapter = HtmlChartAdapter::new(dir.path().join("empty.html"));
        let chart = Chart {
            title: "Ethereum Price Over Time".into(),
            series: vec![series("Ethereum", 0)],
        };

        let path = adapter.render(&chart).unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("No price data in selected range"));
        assert!(html.contains("Ethereum (no data)"));
    }

    #[test]
    fn render_rejects_three_series() {
        let dir = tempdir().unwrap();
        let adapter = HtmlChartAdapter::new(dir.path().join("x.html"));
        let chart = Chart {
            title: "t".into(),
            series: vec![series("a", 1), series("b", 1), series("c", 1)],
        };
        let err = adapter.render(&chart).unwrap_err();
        assert!(matches!(err, CryptochartError::Chart { .. }));
    }

    #[test]
    fn paired_legend_lists_both() {
        let chart = Chart {
            title: "Bitcoin vs Ethereum".into(),
            series: vec![series("Bitcoin", 2), series("Ethereum", 3)],
        };
        let html = render_page(&chart, true);
        assert!(html.contains(SERIES_COLORS[0]));
        assert!(html.contains(SERIES_COLORS[1]));
        assert!(html.contains("Ethereum (3 points"));
    }
}
