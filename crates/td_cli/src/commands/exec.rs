use td_core::Value;
use td_driver::{Driver, Error};
use td_runtime::VM;

use crate::args::CliArgs;
use crate::commands::{print_result, report, require};

fn read(path: &str) -> Result<Vec<u8>, i32> {
    std::fs::read(path).map_err(|source| {
        report(&Error::Io {
            path: path.to_string(),
            source,
        })
    })
}

pub(crate) fn run(args: &CliArgs, driver: &Driver) -> i32 {
    if let Err(code) = require(args, 1, 2, "<module> [input.json]") {
        return code;
    }
    let bytes = match read(&args.positional[0]) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let module = match driver.decode(&bytes) {
        Ok(m) => m,
        Err(e) => return report(&e),
    };

    let input = match args.positional.get(1) {
        Some(path) => {
            let raw = match read(path) {
                Ok(b) => b,
                Err(code) => return code,
            };
            match serde_json::from_slice::<serde_json::Value>(&raw) {
                Ok(json) => Some(Value::from_json(json)),
                Err(e) => {
                    eprintln!("invalid input JSON in {path}: {e}");
                    return 2;
                }
            }
        }
        None => None,
    };

    let mut vm = VM::with_config(driver.config.clone());
    match vm.run(&module, input.as_ref()) {
        Ok(res) => print_result(&res.outputs, Some(&res.context)),
        Err(e) => {
            print_result(&vm.take_outputs(), None);
            eprintln!("RuntimeError: {e}");
            1
        }
    }
}
