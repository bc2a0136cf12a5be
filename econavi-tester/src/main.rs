mod report;
mod scenarios;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use scenarios::{ScenarioResult, get_scenario, list_scenarios, run_scenario};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable colored summary
    Console,
    /// Machine-readable JSON array
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "econavi-tester", version = "0.1.0")]
#[command(about = "Automated QA scenarios for the EcoNavi rewards ledger")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let results = run_scenarios(&args, &expand_scenarios(&args.scenarios));
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🌱 EcoNavi Rewards Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.contains(&"all".to_string()) {
        scenarios.clear();
        scenarios.extend(list_scenarios().iter().map(|(key, _)| (*key).to_string()));
    }
    scenarios
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn run_scenarios(args: &Args, scenario_names: &[String]) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    for name in scenario_names {
        let Some(run) = get_scenario(name) else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            continue;
        };
        if args.verbose {
            println!("▶️  {name}");
        }
        let result = run_scenario(name, run);
        let status = if result.passed {
            "✅".to_string()
        } else {
            "❌".to_string()
        };
        println!("{status} {name} - {:?}", result.duration);
        results.push(result);
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let duration = start_time.elapsed();

    match args.report {
        ReportFormat::Json => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                report::generate_json_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                report::generate_console_report(&mut output_target, results, duration)?;
            }
        }
    }

    writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
