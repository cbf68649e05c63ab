//! Bytecode virtual machine.
//!
//! Executes a decoded `BytecodeModule` once with a single operand stack. The module is
//! only borrowed, so one compiled module can serve many runs and threads.

mod dispatch;
mod stack;

use td_core::{Context, Outputs, Value};
use td_ir::BytecodeModule;

use crate::{ExecResult, RuntimeConfig, RuntimeError};

pub struct VM {
    config: RuntimeConfig,
    outputs: Outputs,
}

impl VM {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            outputs: Outputs::new(),
        }
    }

    pub fn run(
        &mut self,
        module: &BytecodeModule,
        input: Option<&Value>,
    ) -> Result<ExecResult, RuntimeError> {
        let mut ctx = Context::seeded(input);
        self.outputs = Outputs::new();
        dispatch::run_module(module, &mut ctx, &mut self.outputs, &self.config)?;
        Ok(ExecResult {
            outputs: std::mem::take(&mut self.outputs),
            context: ctx,
        })
    }

    /// Outputs emitted before a failed `run`.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}
