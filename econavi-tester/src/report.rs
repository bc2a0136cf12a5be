//! Console and JSON reports for scenario runs.

use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::scenarios::ScenarioResult;

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Scenario Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", failed.to_string().red())?;
    #[allow(clippy::cast_precision_loss)]
    let success_rate = (passed as f64 / total as f64) * 100.0;
    writeln!(out, "Success rate: {success_rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result.scenario_name.bold())?;
        writeln!(out, "   Time: {:?}", result.duration)?;
        if let Some(error) = &result.error {
            writeln!(out, "   • {}", error.red())?;
        }
        writeln!(out)?;
    }

    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}
