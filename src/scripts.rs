use std::path::{Path, PathBuf};

use thousands::Separable;
use tracing::debug;

use crate::error::Result;
use crate::export;
use crate::perf_log::{self, Bands, LogFormat};
use crate::plot::{self, Chart};
use crate::series::{Axis, AxisPolicy, Category, Grouping, GAME_OF_LIFE_AXIS, POW2_AXIS};
use crate::speedup::{self, MetricKind};

const THREADS: &str = "Number of threads";
const PROCESSES: &str = "Number of processes";
const TIME: &str = "Time (seconds)";
const SPEEDUP: &str = "Speedup (Serial Time / Parallel Time)";
const KOPS: &str = "Throughput (Kops / second)";
const MOPS: &str = "Throughput (Mops / second)";

const LOCKS: &[&str] = &[
    "No Sync",
    "Tas Lock",
    "Ttas Lock",
    "Clh Lock",
    "Pthread Lock",
    "Array Lock",
];
const LIST_SYNC: &[&str] = &["Fine Grained", "Lazy", "Optimistic"];

/// The benchmark logs this tool knows how to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    GameOfLife,
    FloydWarshall,
    HeatDiffusion,
    Locks,
    LinkedList,
    Accounts,
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Single(&'static str),
    /// One file per category, named `<prefix>-<category>.png`.
    PerCategory(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    metric: MetricKind,
    caption: &'static str,
    y_desc: &'static str,
    output: Output,
}

/// A chart and the file name it is written to.
#[derive(Debug, Clone)]
pub struct ChartJob {
    pub file_name: String,
    pub chart: Chart,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    /// Replaces the file name of a single-chart script.
    pub output: Option<String>,
    pub csv: bool,
    pub policy: AxisPolicy,
}

impl Script {
    pub fn name(self) -> &'static str {
        match self {
            Script::GameOfLife => "game-of-life",
            Script::FloydWarshall => "floyd-warshall",
            Script::HeatDiffusion => "heat-diffusion",
            Script::Locks => "locks",
            Script::LinkedList => "linked-list",
            Script::Accounts => "accounts",
        }
    }

    pub fn format(self) -> LogFormat {
        match self {
            Script::GameOfLife => LogFormat::GameOfLife,
            Script::FloydWarshall => LogFormat::FloydWarshall,
            Script::HeatDiffusion => LogFormat::Jacobi,
            Script::Locks => LogFormat::Nthreads(Bands::Named(LOCKS)),
            Script::LinkedList => LogFormat::Nthreads(Bands::Named(LIST_SYNC)),
            Script::Accounts => LogFormat::Nthreads(Bands::Runs(2)),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Script::GameOfLife => GAME_OF_LIFE_AXIS,
            _ => POW2_AXIS,
        }
    }

    fn x_desc(self) -> &'static str {
        match self {
            Script::HeatDiffusion => PROCESSES,
            _ => THREADS,
        }
    }

    fn plans(self) -> &'static [Plan] {
        match self {
            Script::GameOfLife => &[
                Plan {
                    metric: MetricKind::Plain,
                    caption: "Game of Life time",
                    y_desc: TIME,
                    output: Output::PerCategory("stats-time"),
                },
                Plan {
                    metric: MetricKind::Speedup,
                    caption: "Game of Life speedup",
                    y_desc: SPEEDUP,
                    output: Output::PerCategory("stats-speedup"),
                },
            ],
            Script::FloydWarshall => &[Plan {
                metric: MetricKind::Plain,
                caption: "Floyd-Warshall initialisation time",
                y_desc: TIME,
                output: Output::Single("classic-fw-init.png"),
            }],
            Script::HeatDiffusion => &[Plan {
                metric: MetricKind::Speedup,
                caption: "Heat diffusion speedup",
                y_desc: SPEEDUP,
                output: Output::Single("heat-diffusion-6144-speedup.png"),
            }],
            Script::Locks => &[Plan {
                metric: MetricKind::Plain,
                caption: "Linked list throughput by lock",
                y_desc: KOPS,
                output: Output::Single("linked_list-16-nosync.png"),
            }],
            Script::LinkedList => &[Plan {
                metric: MetricKind::Plain,
                caption: "Linked list throughput by synchronization scheme",
                y_desc: KOPS,
                output: Output::Single("linked_list-1024-20-40-40.png"),
            }],
            Script::Accounts => &[Plan {
                metric: MetricKind::Plain,
                caption: "Accounts throughput",
                y_desc: MOPS,
                output: Output::Single("accounts-final.png"),
            }],
        }
    }

    fn legend_label(self, category: &Category) -> String {
        match (self, category) {
            (Script::GameOfLife | Script::FloydWarshall, _) => format!("N={}", category),
            (Script::Accounts, Category::Int(run)) => format!("{} run", ordinal(*run)),
            _ => category.to_string(),
        }
    }

    /// Lays out every chart this script draws for `grouping`.
    pub fn charts(self, grouping: &Grouping, output: Option<&str>) -> Result<Vec<ChartJob>> {
        let mut jobs = Vec::new();
        for plan in self.plans() {
            let values = speedup::compute(plan.metric, grouping)?;
            match plan.output {
                Output::Single(file_name) => {
                    let mut chart = Chart::new(
                        plan.caption.to_owned(),
                        self.x_desc(),
                        plan.y_desc,
                        self.axis(),
                    );
                    for (category, series) in &values {
                        chart.push(category, self.legend_label(category), series);
                    }
                    jobs.push(ChartJob {
                        file_name: output.unwrap_or(file_name).to_owned(),
                        chart,
                    });
                }
                Output::PerCategory(prefix) => {
                    for (category, series) in &values {
                        let mut chart = Chart::new(
                            format!("{} ({})", plan.caption, size_caption(category)),
                            self.x_desc(),
                            plan.y_desc,
                            self.axis(),
                        );
                        chart.push(category, self.legend_label(category), series);
                        jobs.push(ChartJob {
                            file_name: format!("{}-{}.png", prefix, category),
                            chart,
                        });
                    }
                }
            }
        }
        Ok(jobs)
    }
}

fn size_caption(category: &Category) -> String {
    match category {
        Category::Int(n) => format!("N = {}", n.separate_with_commas()),
        Category::Text(s) => s.clone(),
    }
}

fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Parses `input`, draws every chart and returns the paths written.
pub fn run(script: Script, input: &Path, opts: &RunOptions) -> Result<Vec<PathBuf>> {
    let grouping = perf_log::parse_file(input, script.format(), script.axis(), opts.policy)?;
    let categories: Vec<String> = grouping.categories().map(|c| c.to_string()).collect();
    debug!(script = script.name(), ?categories, "grouped samples");

    let mut written = Vec::new();
    for job in script.charts(&grouping, opts.output.as_deref())? {
        let path = opts.output_dir.join(&job.file_name);
        plot::write_chart(&job.chart, &path)?;
        written.push(path.clone());

        if opts.csv {
            let csv_path = path.with_extension("csv");
            export::write_csv(&job.chart, &csv_path)?;
            written.push(csv_path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use crate::perf_log::parse_str;

    fn grouping(script: Script, log: &str) -> Grouping {
        parse_str(log, script.format(), script.axis(), AxisPolicy::Strict).unwrap()
    }

    fn file_names(jobs: &[ChartJob]) -> Vec<&str> {
        jobs.iter().map(|j| j.file_name.as_str()).collect()
    }

    #[test]
    fn game_of_life_draws_time_and_speedup_per_size() {
        let log = "GameOfLife: Size 1024 Steps 1000 Time 2.0 Threads 1\n\
                   GameOfLife: Size 1024 Steps 1000 Time 1.0 Threads 2\n\
                   GameOfLife: Size 64 Steps 1000 Time 0.5 Threads 1\n";
        let jobs = Script::GameOfLife
            .charts(&grouping(Script::GameOfLife, log), None)
            .unwrap();

        assert_eq!(
            file_names(&jobs),
            [
                "stats-time-64.png",
                "stats-time-1024.png",
                "stats-speedup-64.png",
                "stats-speedup-1024.png",
            ]
        );

        let time = &jobs[1].chart;
        assert_eq!(time.caption, "Game of Life time (N = 1,024)");
        assert_eq!(time.y_desc, TIME);
        assert_eq!(time.series[0].label, "N=1024");
        assert_eq!(time.series[0].points, vec![(1, 2.0), (2, 1.0)]);

        let speedup = &jobs[3].chart;
        assert_eq!(speedup.y_desc, SPEEDUP);
        assert_eq!(speedup.series[0].points, vec![(1, 1.0), (2, 2.0)]);
    }

    #[test]
    fn floyd_warshall_draws_one_chart_for_all_sizes() {
        let log = "FW_SR,1024,4.0,1\nFW_SR,1024,2.5,2\nFW_SR,2048,30.0,1\n";
        let jobs = Script::FloydWarshall
            .charts(&grouping(Script::FloydWarshall, log), None)
            .unwrap();

        assert_eq!(file_names(&jobs), ["classic-fw-init.png"]);
        let labels: Vec<&str> = jobs[0].chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["N=1024", "N=2048"]);
        assert_eq!(jobs[0].chart.x_desc, THREADS);
    }

    #[test]
    fn heat_diffusion_plots_speedup_against_processes() {
        let log = "jacobi X 6144 Y 6144 Px 1 Py 1 Iter 100 ComputationTime 9.0 TotalTime 10.0 midpoint 0.1 processes 1\n\
                   jacobi X 6144 Y 6144 Px 2 Py 2 Iter 100 ComputationTime 2.0 TotalTime 2.5 midpoint 0.1 processes 4\n";
        let jobs = Script::HeatDiffusion
            .charts(&grouping(Script::HeatDiffusion, log), Some("jacobi.png"))
            .unwrap();

        assert_eq!(file_names(&jobs), ["jacobi.png"]);
        let chart = &jobs[0].chart;
        assert_eq!(chart.x_desc, PROCESSES);
        assert_eq!(chart.series[0].label, "jacobi");
        assert_eq!(chart.series[0].points, vec![(1, 1.0), (4, 4.0)]);
    }

    #[test]
    fn heat_diffusion_without_serial_run_fails() {
        let log = "gauss X 6144 Y 6144 Px 2 Py 1 Iter 100 ComputationTime 2.0 TotalTime 5.0 midpoint 0.1 processes 2\n";
        let err = Script::HeatDiffusion
            .charts(&grouping(Script::HeatDiffusion, log), None)
            .unwrap_err();
        assert!(matches!(err, PlotError::MissingBaseline { .. }));
    }

    #[test]
    fn accounts_runs_are_labelled_by_ordinal() {
        let log: String = POW2_AXIS
            .degrees()
            .iter()
            .chain(POW2_AXIS.degrees())
            .map(|n| format!("Nthreads: {} Runtime(sec): 10 Throughput(Mops/sec): 3.5\n", n))
            .collect();
        let jobs = Script::Accounts
            .charts(&grouping(Script::Accounts, &log), None)
            .unwrap();

        assert_eq!(file_names(&jobs), ["accounts-final.png"]);
        let labels: Vec<&str> = jobs[0].chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["1st run", "2nd run"]);
        assert_eq!(jobs[0].chart.y_desc, MOPS);
    }

    #[test]
    fn locks_use_lock_names() {
        let log: String = POW2_AXIS
            .degrees()
            .iter()
            .map(|n| format!("Nthreads: {} Runtime(sec): 10 Throughput(Mops/sec): 1.0\n", n))
            .collect();
        let jobs = Script::Locks.charts(&grouping(Script::Locks, &log), None).unwrap();
        assert_eq!(file_names(&jobs), ["linked_list-16-nosync.png"]);
        assert_eq!(jobs[0].chart.series[0].label, "No Sync");
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
    }
}
