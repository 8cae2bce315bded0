//! Close-price chart rendering with plotters.
//!
//! Draws into an in-memory RGB buffer, encodes it as PNG and hands back base64
//! text. Text (title, axis labels, tick labels, legend) needs a TrueType font
//! registered with plotters; without one the chart is drawn bare.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use plotters::style::FontStyle;
use tracing::{info, warn};

use crate::domain::chart::{ChartImage, CHART_TITLE, LEGEND_LABEL, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::domain::error::RenderError;
use crate::domain::query::ChartType;
use crate::domain::settings::ChartSettings;
use crate::domain::time_series::TimeSeriesTable;
use crate::ports::chart_port::ChartPort;

const FONT_FAMILY: &str = "sans-serif";

/// Registration result of the first font load; plotters keeps one global registry.
static FONT_LOADED: OnceLock<bool> = OnceLock::new();

fn load_font(path: &Path) -> bool {
    *FONT_LOADED.get_or_init(|| {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chart font unavailable, drawing without text");
                return false;
            }
        };
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                info!(path = %path.display(), "chart font loaded");
                true
            }
            Err(_) => {
                warn!(path = %path.display(), "invalid chart font, drawing without text");
                false
            }
        }
    })
}

pub struct PlottersChartAdapter {
    width: u32,
    height: u32,
    text: bool,
}

impl PlottersChartAdapter {
    pub fn new(settings: &ChartSettings) -> Self {
        let text = match &settings.font_path {
            Some(path) => load_font(path),
            None => {
                warn!("no chart font configured, drawing without text");
                false
            }
        };
        Self {
            width: settings.width,
            height: settings.height,
            text,
        }
    }

    /// Whether titles and labels are drawn.
    pub fn draws_text(&self) -> bool {
        self.text
    }

    fn draw(
        &self,
        table: &TimeSeriesTable,
        chart_type: &ChartType,
        buffer: &mut [u8],
    ) -> Result<(), RenderError> {
        let drawing = |e: &dyn std::fmt::Display| RenderError::Drawing(e.to_string());

        let points: Vec<(DateTime<Utc>, f64)> = table
            .rows()
            .iter()
            .map(|r| (DateTime::<Utc>::from_naive_utc_and_offset(r.timestamp, Utc), r.close))
            .collect();

        let half_width = bar_half_width(&points);
        let (x_min, x_max) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.0 - half_width, last.0 + half_width),
            _ => (DateTime::<Utc>::default(), DateTime::<Utc>::default() + Duration::days(1)),
        };
        let (y_min, y_max) = match table.close_bounds() {
            Some((min, max)) => {
                let span = max - min;
                let padding = if span > 0.0 { span * 0.1 } else { max.abs() * 0.05 + 1.0 };
                ((min - padding).max(0.0), max + padding)
            }
            None => (0.0, 1.0),
        };

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| drawing(&e))?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(15).x_label_area_size(45).y_label_area_size(70);
        if self.text {
            builder.caption(CHART_TITLE, (FONT_FAMILY, 28.0).into_font());
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| drawing(&e))?;

        if self.text {
            let time_format = if x_max - x_min <= Duration::days(2) {
                "%m-%d %H:%M"
            } else {
                "%Y-%m-%d"
            };
            let format_time = |t: &DateTime<Utc>| t.format(time_format).to_string();
            let format_price = |p: &f64| format!("{p:.2}");
            chart
                .configure_mesh()
                .x_desc(X_AXIS_LABEL)
                .y_desc(Y_AXIS_LABEL)
                .x_labels(6)
                .x_label_formatter(&format_time)
                .y_label_formatter(&format_price)
                .draw()
                .map_err(|e| drawing(&e))?;
        }

        let drew_series = match chart_type {
            ChartType::Line => {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
                    .map_err(|e| drawing(&e))?
                    .label(LEGEND_LABEL)
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
                true
            }
            ChartType::Bar => {
                chart
                    .draw_series(points.iter().map(|(t, close)| {
                        Rectangle::new(
                            [(*t - half_width, y_min), (*t + half_width, *close)],
                            BLUE.filled(),
                        )
                    }))
                    .map_err(|e| drawing(&e))?
                    .label(LEGEND_LABEL)
                    .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], BLUE.filled()));
                true
            }
            ChartType::Unrecognized(_) => false,
        };

        if self.text && drew_series {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| drawing(&e))?;
        }

        root.present().map_err(|e| drawing(&e))?;
        Ok(())
    }
}

/// 40% of the narrowest gap between consecutive points, so neighbouring bars never touch.
fn bar_half_width(points: &[(DateTime<Utc>, f64)]) -> Duration {
    let min_gap = points
        .windows(2)
        .map(|w| w[1].0 - w[0].0)
        .filter(|gap| *gap > Duration::zero())
        .min()
        .unwrap_or_else(|| Duration::days(1));
    min_gap * 2 / 5
}

fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let encoding = |e: png::EncodingError| RenderError::Encoding(e.to_string());
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(encoding)?;
        writer.write_image_data(rgb).map_err(encoding)?;
        writer.finish().map_err(encoding)?;
    }
    Ok(out)
}

impl ChartPort for PlottersChartAdapter {
    fn render(
        &self,
        table: &TimeSeriesTable,
        chart_type: &ChartType,
    ) -> Result<ChartImage, RenderError> {
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(table, chart_type, &mut buffer)?;
        let png = encode_png(&buffer, self.width, self.height)?;
        Ok(ChartImage::from_png(&png))
    }
}
