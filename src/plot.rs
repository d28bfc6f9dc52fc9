use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{PlotError, Result};
use crate::series::{Axis, Category, Series};

const FONT: &str = "sans-serif";
const PLOT_WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 480;

const COLORS: [RGBColor; 6] = [
    BLUE,
    RED,
    GREEN,
    MAGENTA,
    CYAN,
    RGBColor(255, 140, 0),
];

const MARKERS: [Marker; 5] = [
    Marker::Dot,
    Marker::Circle,
    Marker::Triangle,
    Marker::Cross,
    Marker::Square,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Dot,
    Circle,
    Triangle,
    Cross,
    Square,
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub category: Category,
    pub label: String,
    pub marker: Marker,
    pub color: RGBColor,
    pub points: Vec<(u32, f64)>,
}

/// Everything needed to draw one PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub caption: String,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub axis: Axis,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    pub fn new(caption: String, x_desc: &'static str, y_desc: &'static str, axis: Axis) -> Self {
        Self {
            caption,
            x_desc,
            y_desc,
            axis,
            series: Vec::new(),
        }
    }

    /// Adds a line, taking the next marker and colour in the palette.
    pub fn push(&mut self, category: &Category, label: String, series: &Series) {
        let idx = self.series.len();
        self.series.push(ChartSeries {
            category: category.clone(),
            label,
            marker: MARKERS[idx % MARKERS.len()],
            color: COLORS[idx % COLORS.len()],
            points: series.iter().collect(),
        });
    }

    /// The y range to draw, padded by a tenth above the largest value.
    /// Non-finite values are left out so the range always stays drawable.
    pub fn y_range(&self) -> (f64, f64) {
        let values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, v)| v))
            .filter(|v| v.is_finite());
        let (y_min, y_max) = values.fold((0.0f64, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if y_max <= y_min {
            return (y_min, y_min + 1.0);
        }
        let padded = y_max + (y_max - y_min) / 10.0;
        (y_min, if padded.is_finite() { padded } else { y_max })
    }
}

pub fn write_chart(chart: &Chart, path: &Path) -> Result<()> {
    draw_chart(chart, path).map_err(|e| PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!(path = %path.display(), lines = chart.series.len(), "wrote chart");
    Ok(())
}

fn draw_chart(chart: &Chart, path: &Path) -> Result<(), Box<dyn Error>> {
    let resolution = (PLOT_WIDTH, PLOT_HEIGHT);
    let root = BitMapBackend::new(path, resolution).into_drawing_area();

    root.fill(&WHITE)?;

    let (y_min, y_max) = chart.y_range();
    let x_max = chart.axis.max() + chart.axis.max() / 16 + 1;

    let mut ctx = ChartBuilder::on(&root)
        .margin(10)
        .caption(&chart.caption, (FONT, 20))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(
            (0..x_max).with_key_points(chart.axis.degrees().to_vec()),
            y_min..y_max,
        )?;

    ctx.configure_mesh()
        .x_label_formatter(&|v| format!("{}", v))
        .y_label_formatter(&|v| format!("{:.2}", v))
        .y_labels(10)
        .y_desc(chart.y_desc)
        .x_desc(chart.x_desc)
        .draw()?;

    for series in &chart.series {
        let color = series.color;
        let points = series.points.iter().copied();

        ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        match series.marker {
            Marker::Dot => ctx.draw_series(points.map(|p| Circle::new(p, 2, color.filled())))?,
            Marker::Circle => ctx.draw_series(points.map(|p| Circle::new(p, 4, color.stroke_width(2))))?,
            Marker::Triangle => {
                ctx.draw_series(points.map(|p| TriangleMarker::new(p, 5, color.filled())))?
            }
            Marker::Cross => ctx.draw_series(points.map(|p| Cross::new(p, 4, color.stroke_width(2))))?,
            Marker::Square => ctx.draw_series(points.map(|p| {
                EmptyElement::at(p) + Rectangle::new([(-3, -3), (3, 3)], color.filled())
            }))?,
        };
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 13))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
