use crate::error::{PlotError, Result};
use crate::series::{Category, Grouping, Series};

/// The quantity a chart plots on its y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Elapsed time or throughput, plotted as parsed.
    Plain,
    /// Single-thread time divided by the time at each degree.
    Speedup,
}

pub fn compute(kind: MetricKind, grouping: &Grouping) -> Result<Grouping> {
    match kind {
        MetricKind::Plain => Ok(grouping.clone()),
        MetricKind::Speedup => grouping
            .iter()
            .map(|(category, series)| Ok((category.clone(), speedup(category, series)?)))
            .collect(),
    }
}

/// Divides the degree-1 value of `series` by each of its values.
pub fn speedup(category: &Category, series: &Series) -> Result<Series> {
    let baseline = series
        .get(1)
        .ok_or_else(|| PlotError::MissingBaseline {
            category: category.clone(),
        })?;

    series
        .iter()
        .map(|(degree, value)| {
            if value == 0.0 {
                return Err(PlotError::ZeroMetric {
                    category: category.clone(),
                    degree,
                });
            }
            let ratio = baseline / value;
            if !ratio.is_finite() {
                return Err(PlotError::NonFiniteMetric {
                    category: category.clone(),
                    degree,
                });
            }
            Ok((degree, ratio))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(u32, f64)]) -> Series {
        points.iter().copied().collect()
    }

    #[test]
    fn speedup_of_two_thread_halving() {
        let category = Category::Int(1024);
        let result = speedup(&category, &series(&[(1, 2.0), (2, 1.0)])).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![(1, 1.0), (2, 2.0)]);
    }

    #[test]
    fn baseline_degree_is_always_one() {
        let category = Category::from("jacobi");
        let result = speedup(&category, &series(&[(1, 37.25), (4, 12.0), (16, 5.5)])).unwrap();
        assert_eq!(result.get(1), Some(1.0));
    }

    #[test]
    fn sublinear_times_give_non_increasing_efficiency() {
        let category = Category::Int(6144);
        let times = [(1, 100.0), (2, 55.0), (4, 30.0), (8, 18.0), (16, 12.0)];
        let result = speedup(&category, &series(&times)).unwrap();

        let efficiency: Vec<f64> = result.iter().map(|(d, s)| s / f64::from(d)).collect();
        assert!(efficiency.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn missing_baseline_is_fatal() {
        let category = Category::Int(64);
        let err = speedup(&category, &series(&[(2, 1.0), (4, 0.5)])).unwrap_err();
        assert!(matches!(err, PlotError::MissingBaseline { category: Category::Int(64) }));
    }

    #[test]
    fn zero_time_is_fatal() {
        let category = Category::Int(64);
        let err = speedup(&category, &series(&[(1, 1.0), (8, 0.0)])).unwrap_err();
        assert!(matches!(err, PlotError::ZeroMetric { degree: 8, .. }));
    }

    #[test]
    fn overflowing_ratio_is_fatal() {
        let category = Category::from("jacobi");
        let err = speedup(&category, &series(&[(1, 1e300), (2, 1e-10)])).unwrap_err();
        assert!(matches!(err, PlotError::NonFiniteMetric { degree: 2, .. }));
        assert_eq!(err.to_string(), "metric for jacobi at degree 2 is not finite");
    }

    #[test]
    fn plain_metric_passes_through() {
        let grouping: Grouping = [(Category::Int(512), series(&[(1, 9.0), (2, 5.0)]))]
            .into_iter()
            .collect();
        assert_eq!(compute(MetricKind::Plain, &grouping).unwrap(), grouping);
    }

    #[test]
    fn compute_speedup_covers_every_category() {
        let grouping: Grouping = [
            (Category::from("jacobi"), series(&[(1, 8.0), (2, 4.0)])),
            (Category::from("redblack"), series(&[(1, 6.0), (4, 2.0)])),
        ]
        .into_iter()
        .collect();
        let result = compute(MetricKind::Speedup, &grouping).unwrap();
        assert_eq!(result.get(&Category::from("jacobi")).unwrap().get(2), Some(2.0));
        assert_eq!(result.get(&Category::from("redblack")).unwrap().get(4), Some(3.0));
    }
}
