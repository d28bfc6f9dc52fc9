use std::path::PathBuf;

use thiserror::Error;

use crate::series::Category;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: degree {degree} is not on the chart axis")]
    DegreeOffAxis { line: usize, degree: u32 },
    #[error("no single-thread baseline for {category}")]
    MissingBaseline { category: Category },
    #[error("zero metric for {category} at degree {degree}")]
    ZeroMetric { category: Category, degree: u32 },
    #[error("metric for {category} at degree {degree} is not finite")]
    NonFiniteMetric { category: Category, degree: u32 },
    #[error("{}: no matching benchmark lines", path.display())]
    EmptyLog { path: PathBuf },
    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = PlotError> = std::result::Result<T, E>;
