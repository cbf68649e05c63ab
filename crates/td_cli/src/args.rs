pub(crate) struct CliArgs {
    pub cmd: String,
    pub verbose: bool,
    pub vm: bool,
    pub json_out: bool,
    pub positional: Vec<String>,
}

pub(crate) fn usage() -> &'static str {
    "Usage: td <ast|run|compile|exec|dis> [verbose] [vm] [json] <file> [args]"
}

pub(crate) fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut argv = argv.into_iter();
    let cmd = argv.next().ok_or_else(|| usage().to_string())?;

    let mut verbose = false;
    let mut vm = false;
    let mut json_out = false;
    let mut positional: Vec<String> = Vec::new();

    for a in argv {
        if a.starts_with("--") {
            return Err(format!("Unknown option: {a}"));
        }
        match a.as_str() {
            "verbose" => verbose = true,
            "vm" => vm = true,
            "json" => json_out = true,
            _ => positional.push(a),
        }
    }

    Ok(CliArgs {
        cmd,
        verbose,
        vm,
        json_out,
        positional,
    })
}
