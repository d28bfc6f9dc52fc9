use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{PlotError, Result};
use crate::perf::Sample;
use crate::series::{Axis, AxisPolicy, Category, Grouping};

/// How the lines of one benchmark log are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `GameOfLife: Size <n> Steps <n> Time <secs> Threads <n>`
    GameOfLife,
    /// `<label>,<size>,<secs>,<threads>`
    FloydWarshall,
    /// `<exe> X <n> Y <n> Px <n> Py <n> Iter <n> ComputationTime <secs> TotalTime <secs> midpoint <v> processes <n>`
    Jacobi,
    /// `Nthreads: <n> ... Throughput(<unit>): <v>`, categorised by position in the file.
    Nthreads(Bands),
}

/// Categories handed out to consecutive blocks of `Nthreads:` lines.
///
/// Each block is one sweep over the chart axis, so its width is the axis
/// length. Lines past the last block stay in the last block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bands {
    Named(&'static [&'static str]),
    /// Numbered runs, starting at 1.
    Runs(u64),
}

impl Bands {
    pub fn category(&self, block: usize) -> Category {
        match *self {
            Bands::Named(names) => match names.get(block).or_else(|| names.last()) {
                Some(name) => Category::from(*name),
                None => Category::Int(block as u64 + 1),
            },
            Bands::Runs(count) => Category::Int((block as u64).min(count.saturating_sub(1)) + 1),
        }
    }
}

/// A typed view of one matching log line.
pub trait LogRecord: Sized {
    /// Returns `Ok(None)` for lines that are not of this format.
    /// A matching line with a malformed number is an error.
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>>;

    fn sample(&self) -> Sample;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOfLifeRecord {
    pub size: u64,
    pub time: f64,
    pub threads: u32,
}

impl LogRecord for GameOfLifeRecord {
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() != Some(&"GameOfLife:") {
            return Ok(None);
        }
        let (Some(size), Some(time), Some(threads)) = (
            value_after(&tokens, "Size"),
            value_after(&tokens, "Time"),
            value_after(&tokens, "Threads"),
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            size: number(size, "size", line_no)?,
            time: float(time, "time", line_no)?,
            threads: number(threads, "thread count", line_no)?,
        }))
    }

    fn sample(&self) -> Sample {
        Sample::new(self.threads, self.time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloydWarshallRecord {
    pub size: u64,
    pub time: f64,
    pub threads: u32,
}

impl LogRecord for FloydWarshallRecord {
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[label, size, time, threads, ..] = fields.as_slice() else {
            return Ok(None);
        };
        if label.is_empty() || label.parse::<f64>().is_ok() {
            return Ok(None);
        }
        Ok(Some(Self {
            size: number(size, "size", line_no)?,
            time: float(time, "time", line_no)?,
            threads: number(threads, "thread count", line_no)?,
        }))
    }

    fn sample(&self) -> Sample {
        Sample::new(self.threads, self.time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JacobiRecord {
    pub executable: String,
    pub total_time: f64,
    pub processes: u32,
}

impl LogRecord for JacobiRecord {
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (Some(executable), Some(total_time), Some(processes)) = (
            tokens.first(),
            value_after(&tokens, "TotalTime"),
            value_after(&tokens, "processes"),
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            executable: (*executable).to_owned(),
            total_time: float(total_time, "total time", line_no)?,
            processes: number(processes, "process count", line_no)?,
        }))
    }

    fn sample(&self) -> Sample {
        Sample::new(self.processes, self.total_time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NthreadsRecord {
    pub threads: u32,
    pub throughput: f64,
}

impl LogRecord for NthreadsRecord {
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() != Some(&"Nthreads:") {
            return Ok(None);
        }
        let throughput = tokens
            .iter()
            .position(|t| t.starts_with("Throughput("))
            .and_then(|i| tokens.get(i + 1));
        let (Some(threads), Some(throughput)) = (tokens.get(1), throughput) else {
            return Ok(None);
        };
        Ok(Some(Self {
            threads: number(threads, "thread count", line_no)?,
            throughput: float(throughput, "throughput", line_no)?,
        }))
    }

    fn sample(&self) -> Sample {
        Sample::new(self.threads, self.throughput)
    }
}

fn value_after<'a>(tokens: &[&'a str], key: &str) -> Option<&'a str> {
    let pos = tokens.iter().position(|t| *t == key)?;
    tokens.get(pos + 1).copied()
}

fn number<T: FromStr>(value: &str, field: &'static str, line: usize) -> Result<T> {
    value.parse().map_err(|_| invalid(value, field, line))
}

/// Like `number`, but `inf` and `NaN` are not measurements.
fn float(value: &str, field: &'static str, line: usize) -> Result<f64> {
    match number::<f64>(value, field, line)? {
        v if v.is_finite() => Ok(v),
        _ => Err(invalid(value, field, line)),
    }
}

fn invalid(value: &str, field: &'static str, line: usize) -> PlotError {
    PlotError::InvalidNumber {
        line,
        field,
        value: value.to_owned(),
    }
}

/// Groups every matching line of `input` by category.
pub fn parse_str(
    input: &str,
    format: LogFormat,
    axis: Axis,
    policy: AxisPolicy,
) -> Result<Grouping> {
    let mut grouping = Grouping::new();
    let mut matched = 0usize;
    let mut skipped = 0usize;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry = match format {
            LogFormat::GameOfLife => GameOfLifeRecord::parse(line, line_no)?
                .map(|r| (Category::Int(r.size), r.sample())),
            LogFormat::FloydWarshall => FloydWarshallRecord::parse(line, line_no)?
                .map(|r| (Category::Int(r.size), r.sample())),
            LogFormat::Jacobi => JacobiRecord::parse(line, line_no)?
                .map(|r| (Category::from(r.executable.as_str()), r.sample())),
            LogFormat::Nthreads(bands) => NthreadsRecord::parse(line, line_no)?
                .map(|r| (bands.category(matched / axis.len().max(1)), r.sample())),
        };

        let Some((category, sample)) = entry else {
            trace!(line = line_no, "skipping unmatched line");
            skipped += 1;
            continue;
        };
        matched += 1;

        if axis.admit(&sample, policy, line_no)? {
            grouping.insert(category, sample);
        }
    }

    debug!(
        matched,
        skipped,
        categories = grouping.len(),
        "parsed benchmark log"
    );
    Ok(grouping)
}

pub fn parse_file(
    path: &Path,
    format: LogFormat,
    axis: Axis,
    policy: AxisPolicy,
) -> Result<Grouping> {
    let input = fs::read_to_string(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grouping = parse_str(&input, format, axis, policy)?;
    if grouping.is_empty() {
        return Err(PlotError::EmptyLog {
            path: path.to_path_buf(),
        });
    }
    Ok(grouping)
}
