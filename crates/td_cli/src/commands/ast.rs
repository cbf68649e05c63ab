use std::io::Write;

use td_driver::Driver;

use crate::args::CliArgs;
use crate::commands::{load_program, require};

pub(crate) fn run(args: &CliArgs, driver: &Driver) -> i32 {
    if let Err(code) = require(args, 1, 1, "<file>") {
        return code;
    }
    let program = match load_program(driver, &args.positional[0], args.json_out) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "{program:#?}") {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            return 0;
        }
        eprintln!("stdout error: {e}");
        return 2;
    }
    0
}
