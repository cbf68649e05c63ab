//! Execution failures.

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    suggestion
        .map(|s| format!(" (did you mean `{s}`?)"))
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown model type `{ty}`{hint}", hint = did_you_mean(.suggestion))]
    UnknownModel {
        ty: String,
        suggestion: Option<&'static str>,
    },
    #[error("unknown sort algorithm `{name}`{hint}", hint = did_you_mean(.suggestion))]
    UnknownSortAlgorithm {
        name: String,
        suggestion: Option<&'static str>,
    },
    #[error("sort expects an array, got {found}")]
    SortInputNotArray { found: &'static str },

    #[error("instruction at byte {ip} runs past the end of the code")]
    TruncatedInstruction { ip: usize },
    #[error("constant #{index} referenced at byte {ip} is out of range")]
    ConstantOutOfRange { ip: usize, index: u32 },
    #[error("constant #{index} referenced at byte {ip} is not a name")]
    NameNotString { ip: usize, index: u32 },
    #[error("jump at byte {ip} targets byte {target}; only forward jumps are allowed")]
    JumpOutOfRange { ip: usize, target: i64 },
    #[error("operand stack underflow at byte {ip}")]
    StackUnderflow { ip: usize },
    #[error("operand stack exceeds {limit} values at byte {ip}")]
    StackOverflow { ip: usize, limit: usize },
}
