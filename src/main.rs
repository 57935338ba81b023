use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use schemars::schema_for;

use ghvfdt::classifiers::TreeConfig;
use ghvfdt::evaluation::{CurveFormat, ImbalancedClassificationEvaluator, Snapshot};
use ghvfdt::logging;
use ghvfdt::streams::arff::ArffFileStream;
use ghvfdt::streams::summarize_stream;
use ghvfdt::tasks::{PrequentialEvaluator, TrainTestEvaluator};
use ghvfdt::ui::cli::args::{Cli, Command, SchemaTarget, SummarizeArgs};
use ghvfdt::ui::types::build::{build_stream, build_tree};
use ghvfdt::ui::types::choices::{
    PrequentialParams, StreamChoice, TaskChoice, TrainTestParams, UIChoice,
};
use ghvfdt::utils::system::resident_set_size_gb;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_GREY: &str = "\x1b[90m";
const RULE: &str = "────────────────────────────────────────────────────────────────────────";

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("warning: logging disabled: {e}");
    }

    match cli.command {
        Command::Run(args) => match args.into_task_choice()? {
            TaskChoice::EvaluatePrequential(p) => run_prequential(p),
            TaskChoice::TrainTest(p) => run_train_test(p),
        },
        Command::TrainTest(args) => match args.into_task_choice()? {
            TaskChoice::TrainTest(p) => run_train_test(p),
            TaskChoice::EvaluatePrequential(p) => run_prequential(p),
        },
        Command::Summarize(args) => summarize(args),
        Command::Schema(args) => {
            let schema = match args.target {
                SchemaTarget::Tree => schema_for!(TreeConfig),
                SchemaTarget::Stream => StreamChoice::schema(),
                SchemaTarget::Task => TaskChoice::schema(),
            };
            let text = serde_json::to_string_pretty(&schema).context("failed to render schema")?;
            println!("{text}");
            Ok(())
        }
    }
}

fn run_prequential(p: PrequentialParams) -> Result<()> {
    let header: Vec<String> = vec![
        format!("{BOLD}{FG_CYAN}▶ Prequential Evaluation{RESET}"),
        format!(
            "{DIM}grace={} δ={} τ={}{RESET}  {DIM}sample_freq={} mem_check_freq={}{RESET}  {}",
            p.tree.grace_period,
            p.tree.split_confidence,
            p.tree.tie_threshold,
            p.sample_frequency,
            p.mem_check_frequency,
            timestamp_now()
        ),
        format!("{FG_GREY}{RULE}{RESET}"),
    ];

    let stream = build_stream(p.stream).context("failed to build stream")?;
    let tree = build_tree(p.tree).context("failed to build tree")?;

    let (tx, rx) = std::sync::mpsc::channel();
    let max_instances = p.max_instances;
    let max_seconds = p.max_seconds;
    let render: JoinHandle<()> = std::thread::spawn(move || {
        render_status_with_header(rx, header, 150, max_instances, max_seconds)
    });

    let mut runner = PrequentialEvaluator::new(
        Box::new(tree),
        stream,
        Box::new(ImbalancedClassificationEvaluator::new()),
        p.max_instances,
        p.max_seconds,
        p.sample_frequency,
        p.mem_check_frequency,
    )
    .context("failed to construct PrequentialEvaluator")?
    .with_progress(tx);

    runner.run().context("prequential evaluation failed")?;

    if let Some(path) = p.dump_file
        && !path.as_os_str().is_empty()
    {
        runner
            .curve()
            .export(&path, CurveFormat::from(p.dump_format))
            .with_context(|| format!("failed to export snapshots to {}", path.display()))?;
    }

    drop(runner);
    let _ = render.join();
    Ok(())
}

fn run_train_test(p: TrainTestParams) -> Result<()> {
    println!("{BOLD}{FG_CYAN}▶ Train / Test{RESET}  {}", timestamp_now());
    println!("{FG_GREY}{RULE}{RESET}");

    let train_path = p.train.path.display().to_string();
    let test_path = p.test.path.display().to_string();
    let train = build_stream(StreamChoice::ArffFile(p.train))
        .with_context(|| format!("failed to open training set {train_path}"))?;
    let test = build_stream(StreamChoice::ArffFile(p.test))
        .with_context(|| format!("failed to open test set {test_path}"))?;
    let tree = build_tree(p.tree).context("failed to build tree")?;

    let mut task = TrainTestEvaluator::new(tree, train, test).with_train_on_test(p.train_on_test);
    let report = task.run();

    println!("{FG_GREEN}{BOLD}train{RESET} {}", report.training);
    println!("{FG_MAGENTA}{BOLD}test{RESET}  {}", report.testing);
    println!("{DIM}tree{RESET}  {}", task.learner().stats());
    if let Some(gb) = resident_set_size_gb() {
        println!("{DIM}rss{RESET}   {gb:.6} GB");
    }
    Ok(())
}

fn summarize(args: SummarizeArgs) -> Result<()> {
    let path = args.path.display().to_string();
    let mut stream = ArffFileStream::new(args.path, args.class_index)
        .with_context(|| format!("failed to open {path}"))?;
    print!("{}", summarize_stream(&mut stream));
    Ok(())
}

/// Print header once, then refresh a single line with status.
pub fn render_status_with_header(
    rx: Receiver<Snapshot>,
    header_lines: Vec<String>,
    repaint_every_ms: u64,
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
) {
    for line in &header_lines {
        println!("{line}");
    }

    println!();
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut last_snap: Option<Snapshot> = None;

    loop {
        match rx.recv_timeout(tick) {
            Ok(s) => last_snap = Some(s),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(s) = last_snap.take() {
                    print!(
                        "\r{}\x1B[K\n",
                        format_status(&s, max_instances, max_seconds)
                    );
                    let _ = io::stdout().flush();
                }
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            if let Some(s) = last_snap.as_ref() {
                print!("\r{}\x1B[K", format_status(s, max_instances, max_seconds));
                let _ = io::stdout().flush();
            }
            last_draw = Instant::now();
        }
    }
}

fn format_status(s: &Snapshot, max_instances: Option<u64>, max_seconds: Option<u64>) -> String {
    let extra = |key: &str, label: &str| {
        s.extras
            .get(key)
            .map(|v| format!("  {DIM}{label}{RESET} {}", fmtf(*v, 4)))
            .unwrap_or_default()
    };

    let mut line = format!(
        "{FG_GREEN}{BOLD}seen{RESET} {:>9}  \
         {FG_CYAN}{BOLD}acc{RESET} {:>7}% \
         {FG_MAGENTA}{BOLD}κ{RESET} {:>7}% \
         {FG_YELLOW}{BOLD}G{RESET} {}{}{}  \
         {DIM}ram_h{RESET} {:>8.3e}  \
         {DIM}t{RESET} {:>7.3}s",
        s.instances_seen,
        fmtf(s.accuracy * 100.0, 4),
        fmtf(s.kappa * 100.0, 4),
        s.extras.get("g_mean").map_or_else(|| fmtf(f64::NAN, 4), |v| fmtf(*v, 4)),
        extra("recall", "R"),
        extra("specificity", "S"),
        s.ram_hours,
        s.seconds
    );

    let bar_w = 15usize;
    if let Some(mi) = max_instances {
        let inst_bar = progress_bar(s.instances_seen as f64, mi as f64, bar_w);
        line.push_str(&format!("  {DIM}[inst]{RESET} {}", inst_bar));
    }
    if let Some(ms) = max_seconds {
        let time_bar = progress_bar(s.seconds, ms as f64, bar_w);
        line.push_str(&format!("  {DIM}[time]{RESET} {}", time_bar));
    }

    line
}

fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if total.is_finite() && total > 0.0 {
        let ratio = (current / total).clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        let empty = width.saturating_sub(filled);
        return format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(empty),
            ratio * 100.0
        );
    }

    String::new()
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>1$.prec$}", x, 6, prec = prec)
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
