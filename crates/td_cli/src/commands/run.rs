use td_driver::{Driver, compile};
use td_runtime::{Runtime, VM};

use crate::args::CliArgs;
use crate::commands::{load_program, print_result, require};

pub(crate) fn run(args: &CliArgs, driver: &Driver) -> i32 {
    if let Err(code) = require(args, 1, 1, "<file>") {
        return code;
    }
    let program = match load_program(driver, &args.positional[0], args.json_out) {
        Ok(p) => p,
        Err(code) => return code,
    };

    if args.vm {
        let module = compile(&program);
        tracing::debug!(bytes = module.code.len(), consts = module.constants.len(), "compiled");
        let mut vm = VM::with_config(driver.config.clone());
        return match vm.run(&module, program.input()) {
            Ok(res) => print_result(&res.outputs, Some(&res.context)),
            Err(e) => {
                print_result(&vm.take_outputs(), None);
                eprintln!("RuntimeError: {e}");
                1
            }
        };
    }

    let mut rt = Runtime::with_config(driver.config.clone());
    match rt.execute(&program) {
        Ok(res) => print_result(&res.outputs, Some(&res.context)),
        Err(e) => {
            print_result(&rt.take_outputs(), Some(&rt.take_context()));
            eprintln!("RuntimeError: {e}");
            1
        }
    }
}
