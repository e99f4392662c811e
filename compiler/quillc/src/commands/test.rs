//! The `test` command: run script test files, report results.

use std::path::PathBuf;

use crate::test::{TestOutcome, TestRunner, TestRunnerConfig, TestSummary};

/// Run the test files (or directories of them) at `paths`.
pub fn run_tests(paths: &[String], config: &TestRunnerConfig) {
    let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        eprintln!("Path not found: {}", missing.display());
        std::process::exit(1);
    }

    let runner = TestRunner::with_config(config.clone());
    let summary = runner.run(&paths);
    print_test_summary(&summary, config.verbose);
    std::process::exit(summary.exit_code());
}

fn print_test_summary(summary: &TestSummary, verbose: bool) {
    for file in &summary.files {
        if !file.errors.is_empty() {
            println!("\n{}", file.path.display());
            for result in &file.results {
                if let TestOutcome::Failed(msg) = &result.outcome {
                    println!("  FAIL: {} - {}", result.name, msg);
                }
            }
            for error in &file.errors {
                println!("  ERROR: {error}");
            }
            continue;
        }

        if verbose || file.has_failures() {
            println!("\n{}", file.path.display());
        }

        for result in &file.results {
            let status = match &result.outcome {
                TestOutcome::Passed if verbose => {
                    format!("  PASS: {} ({:.2?})", result.name, result.duration)
                }
                TestOutcome::Skipped(reason) if verbose => {
                    format!("  SKIP: {} - {}", result.name, reason)
                }
                TestOutcome::Passed | TestOutcome::Skipped(_) => continue,
                TestOutcome::Failed(msg) => format!("  FAIL: {} - {}", result.name, msg),
            };
            println!("{status}");
        }
    }

    println!();
    println!("Test Summary:");
    println!(
        "  {} passed, {} failed, {} skipped ({} total)",
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.total()
    );
    if summary.error_files > 0 {
        println!("  {} file(s) stopped with errors", summary.error_files);
    }
    println!("  Completed in {:.2?}", summary.duration);

    println!();
    if summary.has_failures() {
        println!("FAILED");
    } else if summary.total() == 0 {
        println!("NO TESTS FOUND");
    } else {
        println!("OK");
    }
}
