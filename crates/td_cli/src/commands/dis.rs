use td_driver::Driver;
use td_ir::disassemble;

use crate::args::CliArgs;
use crate::commands::{load_module, require};

pub(crate) fn run(args: &CliArgs, driver: &Driver) -> i32 {
    if let Err(code) = require(args, 1, 1, "<module|file>") {
        return code;
    }
    match load_module(driver, &args.positional[0], args.json_out) {
        Ok(module) => {
            print!("{}", disassemble(&module));
            0
        }
        Err(code) => code,
    }
}
