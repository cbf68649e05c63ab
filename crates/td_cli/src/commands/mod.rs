use serde_json::json;
use td_core::{Context, Outputs};
use td_driver::{Driver, Error};
use td_ir::{BytecodeModule, MAGIC, Program};
use td_parser::SyntaxError;
use td_syntax::{SourceFile, render_diagnostic};

use crate::args::CliArgs;

pub(crate) mod ast;
pub(crate) mod compile;
pub(crate) mod dis;
pub(crate) mod exec;
pub(crate) mod run;

pub(crate) fn emit_syntax_error(source: &SourceFile, err: &SyntaxError, json_out: bool) {
    let d = &err.diagnostic;
    if json_out {
        let span = d.span.map(|s| json!({ "start": s.start.0, "end": s.end.0 }));
        let obj = json!({
            "severity": "error",
            "code": d.code,
            "message": d.message,
            "line": err.line,
            "span": span,
            "file": source.name,
        });
        println!("{obj}");
    } else {
        eprintln!("{}", render_diagnostic(source, d));
    }
}

/// Reports a pipeline failure and returns the exit code for it.
pub(crate) fn report(err: &Error) -> i32 {
    match err {
        Error::Io { .. } => {
            eprintln!("{err}");
            2
        }
        Error::Syntax(e) => {
            eprintln!("SyntaxError: {e}");
            1
        }
        Error::Decode(e) => {
            eprintln!("DecodeError: {e}");
            1
        }
        Error::Runtime(e) => {
            eprintln!("RuntimeError: {e}");
            1
        }
    }
}

/// Reads and parses `path`, rendering any syntax error against its source.
pub(crate) fn load_program(driver: &Driver, path: &str, json_out: bool) -> Result<Program, i32> {
    let source = driver.read_source(path).map_err(|e| report(&e))?;
    driver.parse_source(&source).map_err(|e| {
        emit_syntax_error(&source, &e, json_out);
        1
    })
}

/// Loads a bytecode module, or compiles `path` when it is a task file.
pub(crate) fn load_module(driver: &Driver, path: &str, json_out: bool) -> Result<BytecodeModule, i32> {
    let bytes = std::fs::read(path).map_err(|source| {
        report(&Error::Io {
            path: path.to_string(),
            source,
        })
    })?;
    if bytes.starts_with(&MAGIC) || std::str::from_utf8(&bytes).is_err() {
        return driver.decode(&bytes).map_err(|e| report(&e));
    }
    let program = load_program(driver, path, json_out)?;
    Ok(td_driver::compile(&program))
}

pub(crate) fn print_result(outputs: &Outputs, context: Option<&Context>) -> i32 {
    let obj = match context {
        Some(ctx) => json!({ "outputs": outputs, "context": ctx }),
        None => json!({ "outputs": outputs }),
    };
    match serde_json::to_string_pretty(&obj) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(e) => {
            eprintln!("failed to serialize result: {e}");
            2
        }
    }
}

pub(crate) fn require(args: &CliArgs, min: usize, max: usize, what: &str) -> Result<(), i32> {
    let n = args.positional.len();
    if n < min || n > max {
        eprintln!("Expected {what}");
        eprintln!("{}", crate::args::usage());
        return Err(2);
    }
    Ok(())
}
