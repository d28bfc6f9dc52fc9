use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{PlotError, Result};
use crate::plot::Chart;

#[derive(Debug, Serialize)]
struct Row {
    category: String,
    degree: u32,
    value: f64,
}

/// Writes the plotted points of `chart` as `category,degree,value` rows.
pub fn write_csv(chart: &Chart, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for series in &chart.series {
        for &(degree, value) in &series.points {
            writer.serialize(Row {
                category: series.category.to_string(),
                degree,
                value,
            })?;
        }
    }
    writer.flush().map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote chart data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::series::{Category, Series, POW2_AXIS};

    #[test]
    fn rows_follow_chart_series() {
        let mut chart = Chart::new("accounts".into(), "Number of threads", "Throughput", POW2_AXIS);
        let first: Series = [(1, 12.5), (2, 20.25)].into_iter().collect();
        let second: Series = [(1, 11.5)].into_iter().collect();
        chart.push(&Category::Int(1), "1st run".into(), &first);
        chart.push(&Category::from("Tas Lock"), "Tas Lock".into(), &second);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts-final.csv");
        write_csv(&chart, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "category,degree,value\n1,1,12.5\n1,2,20.25\nTas Lock,1,11.5\n"
        );
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let chart = Chart::new(String::new(), "x", "y", POW2_AXIS);
        let err = write_csv(&chart, &dir.path().join("missing").join("out.csv")).unwrap_err();
        assert!(matches!(err, PlotError::Csv(_)));
    }
}
