use td_driver::{Driver, Error, compile};

use crate::args::CliArgs;
use crate::commands::{load_program, report, require};

pub(crate) fn run(args: &CliArgs, driver: &Driver) -> i32 {
    if let Err(code) = require(args, 2, 2, "<file> <out>") {
        return code;
    }
    let program = match load_program(driver, &args.positional[0], args.json_out) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let out = args.positional[1].as_str();
    let bytes = compile(&program).encode();
    if let Err(source) = std::fs::write(out, &bytes) {
        return report(&Error::Io {
            path: out.to_string(),
            source,
        });
    }
    tracing::info!(path = out, bytes = bytes.len(), "wrote module");
    0
}
