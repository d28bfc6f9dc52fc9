use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::error::{PlotError, Result};
use crate::perf::Sample;

/// The key a log line is grouped under.
///
/// Integer keys (array sizes, run indices) sort numerically and ahead of
/// text keys (executable or lock names).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Int(u64),
    Text(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Int(n) => write!(f, "{}", n),
            Category::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::Text(s.to_owned())
    }
}

impl From<u64> for Category {
    fn from(n: u64) -> Self {
        Category::Int(n)
    }
}

/// Metric values of one category, keyed by concurrency degree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: BTreeMap<u32, f64>,
}

impl Series {
    /// Later samples at the same degree replace earlier ones.
    pub fn insert(&mut self, sample: Sample) -> Option<f64> {
        self.points.insert(sample.degree, sample.value)
    }

    pub fn get(&self, degree: u32) -> Option<f64> {
        self.points.get(&degree).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.points.iter().map(|(&d, &v)| (d, v))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(u32, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Every series of one log, keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    series: BTreeMap<Category, Series>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, sample: Sample) -> Option<f64> {
        self.series.entry(category).or_default().insert(sample)
    }

    pub fn get(&self, category: &Category) -> Option<&Series> {
        self.series.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.series.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Category, Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(Category, Series)> for Grouping {
    fn from_iter<I: IntoIterator<Item = (Category, Series)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Grouping {
    type Item = (Category, Series);
    type IntoIter = btree_map::IntoIter<Category, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.into_iter()
    }
}

impl<'a> IntoIterator for &'a Grouping {
    type Item = (&'a Category, &'a Series);
    type IntoIter = btree_map::Iter<'a, Category, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// What to do with a sample whose degree is missing from the chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPolicy {
    #[default]
    Strict,
    Drop,
}

/// The fixed, ordered set of degrees a chart is drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis(&'static [u32]);

pub const POW2_AXIS: Axis = Axis(&[1, 2, 4, 8, 16, 32, 64]);
pub const GAME_OF_LIFE_AXIS: Axis = Axis(&[1, 2, 4, 6, 8]);

impl Axis {
    pub fn degrees(&self) -> &'static [u32] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(1)
    }

    pub fn contains(&self, degree: u32) -> bool {
        self.0.contains(&degree)
    }

    /// Decides whether a sample parsed from `line` may enter a grouping.
    ///
    /// Returns `Ok(false)` when the sample is to be dropped.
    pub fn admit(&self, sample: &Sample, policy: AxisPolicy, line: usize) -> Result<bool> {
        if self.contains(sample.degree) {
            return Ok(true);
        }
        match policy {
            AxisPolicy::Strict => Err(PlotError::DegreeOffAxis {
                line,
                degree: sample.degree,
            }),
            AxisPolicy::Drop => {
                warn!(line, degree = sample.degree, "dropping sample off the chart axis");
                Ok(false)
            }
        }
    }
}
