//! Quill CLI
//!
//! Tree-walking script runtime.

use quill_eval::EvalConfig;
use quillc::commands::{apply_limit_flag, check_file, lex_file, parse_file, run_file, run_tests};
use quillc::test::TestRunnerConfig;

fn main() {
    quillc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let mut config = EvalConfig::default();
            let mut file_path = None;

            for arg in args.iter().skip(2) {
                match apply_limit_flag(&mut config, arg) {
                    Ok(true) => {}
                    Ok(false) if !arg.starts_with('-') && file_path.is_none() => {
                        file_path = Some(arg.as_str());
                    }
                    Ok(false) => {
                        eprintln!("error: unexpected argument '{arg}'");
                        std::process::exit(1);
                    }
                    Err(msg) => {
                        eprintln!("error: {msg}");
                        std::process::exit(1);
                    }
                }
            }

            let Some(path) = file_path else {
                eprintln!("Usage: quill run <file.js> [--loop-limit=N] [--max-depth=N]");
                std::process::exit(1);
            };
            run_file(path, config);
        }
        "test" => {
            let mut paths = Vec::new();
            let mut config = TestRunnerConfig::default();

            for arg in args.iter().skip(2) {
                if let Some(filter) = arg.strip_prefix("--filter=") {
                    config.filter = Some(filter.to_string());
                } else if arg == "--verbose" || arg == "-v" {
                    config.verbose = true;
                } else {
                    match apply_limit_flag(&mut config.eval, arg) {
                        Ok(true) => {}
                        Ok(false) if !arg.starts_with('-') => paths.push(arg.clone()),
                        Ok(false) => {
                            eprintln!("error: unexpected argument '{arg}'");
                            std::process::exit(1);
                        }
                        Err(msg) => {
                            eprintln!("error: {msg}");
                            std::process::exit(1);
                        }
                    }
                }
            }

            if paths.is_empty() {
                paths.push(".".to_string());
            }
            run_tests(&paths, &config);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: quill check <file.js>");
                std::process::exit(1);
            }
            check_file(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: quill parse <file.js>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: quill lex <file.js>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Quill {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare script path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
            {
                run_file(command, EvalConfig::default());
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Quill script runtime");
    println!();
    println!("Usage: quill <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.js>        Evaluate a script");
    println!("  test [paths...]      Run script test files (default: current directory)");
    println!("  check <file.js>      Report syntax errors without running");
    println!("  parse <file.js>      Show resolved binding records");
    println!("  lex <file.js>        Tokenize and display tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run and test options:");
    println!("  --loop-limit=<n>     Iterations allowed per loop (default: 8192)");
    println!("  --max-depth=<n>      Nested calls allowed (default: 1000)");
    println!();
    println!("Test options:");
    println!("  --filter=<pattern>   Only run test(...) cases whose name contains pattern");
    println!("  --verbose, -v        Show passing and skipped cases");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=<filter>    Enable tracing, e.g. RUST_LOG=quill_eval=debug");
    println!();
    println!("Examples:");
    println!("  quill run main.js");
    println!("  quill run main.js --loop-limit=100000");
    println!("  quill test tests/ --filter=parser");
}
