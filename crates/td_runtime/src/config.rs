/// Knobs shared by both interpreters.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Operand stack limit for the VM; deeper pushes fail instead of growing.
    pub max_stack: usize,
    /// Log every executed instruction at TRACE level.
    pub trace_instructions: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_stack: 1024,
            trace_instructions: false,
        }
    }
}
