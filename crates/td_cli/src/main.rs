mod args;
mod commands;

use td_driver::Driver;
use td_runtime::RuntimeConfig;
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// `RUST_LOG` overrides the level picked by `verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match args::parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            if e != args::usage() {
                eprintln!("{}", args::usage());
            }
            std::process::exit(2);
        }
    };
    init_logging(args.verbose);

    let driver = Driver::with_config(RuntimeConfig {
        trace_instructions: tracing::enabled!(tracing::Level::TRACE),
        ..RuntimeConfig::default()
    });

    let code = match args.cmd.as_str() {
        "ast" => commands::ast::run(&args, &driver),
        "run" => commands::run::run(&args, &driver),
        "compile" => commands::compile::run(&args, &driver),
        "exec" => commands::exec::run(&args, &driver),
        "dis" => commands::dis::run(&args, &driver),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("{}", args::usage());
            2
        }
    };
    std::process::exit(code);
}
