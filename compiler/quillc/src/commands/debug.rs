//! Debug commands: `parse` and `lex` for inspecting the front end.

use quill_ir::{CaptureSource, FunctionFlags, Program};

use super::{read_file, report};

/// Parse a file and display the binding record of every function.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    let program = match quill_parse::parse_source(&content) {
        Ok(program) => program,
        Err(err) => {
            report(path, &err.to_diagnostic(), &content);
            std::process::exit(1);
        }
    };

    println!(
        "Binding records for '{}' ({} functions):",
        path,
        program.functions().count()
    );
    for (id, function) in program.functions() {
        let name = match &function.name {
            Some(name) => name.as_ref(),
            None if id == Program::ROOT => "<program>",
            None => "<anonymous>",
        };
        let arrow = if function.flags.contains(FunctionFlags::ARROW) {
            " (arrow)"
        } else {
            ""
        };
        let layout = &function.layout;
        println!();
        println!(
            "  fn#{} {name}{arrow} @ {}: depth {}, {} slots, {} captures",
            id.raw(),
            function.position,
            layout.depth,
            layout.slot_count(),
            layout.captures.len()
        );
        for local in &layout.locals {
            println!("    slot {} {} {}", local.slot, local.kind.as_str(), local.name);
        }
        for (index, capture) in layout.captures.iter().enumerate() {
            let source = match capture.source {
                CaptureSource::Local(slot) => format!("local#{slot}"),
                CaptureSource::Captured(cell) => format!("captured#{cell}"),
            };
            println!(
                "    capture {index} {} <- {source} ({} up)",
                capture.name, capture.depth
            );
        }
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let tokens = match quill_lexer::tokenize(&content) {
        Ok(tokens) => tokens,
        Err(err) => {
            report(path, &err.to_diagnostic(), &content);
            std::process::exit(1);
        }
    };

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        println!("  {:?} {:?} @ {}", token.kind, token.text, token.position);
    }
}
