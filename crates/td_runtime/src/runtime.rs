use td_core::{Context, Outputs};
use td_ir::Program;

use crate::{RuntimeConfig, RuntimeError};

/// Final state of one execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecResult {
    pub outputs: Outputs,
    pub context: Context,
}

/// Tree-walking executor.
///
/// Each `execute` call starts from a freshly seeded context. When a statement fails, the
/// outputs written before it stay available through `take_outputs`.
pub struct Runtime {
    config: RuntimeConfig,
    pub(crate) ctx: Context,
    pub(crate) outputs: Outputs,
    pub(crate) task_id: String,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            ctx: Context::new(),
            outputs: Outputs::new(),
            task_id: String::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn execute(&mut self, program: &Program) -> Result<ExecResult, RuntimeError> {
        self.task_id.clone_from(&program.task_id);
        self.ctx = Context::seeded(program.input());
        self.outputs = Outputs::new();
        let span = tracing::debug_span!("execute", task = %program.task_id);
        let _guard = span.enter();
        for stmt in program.source_order() {
            self.exec_stmt(stmt)?;
        }
        tracing::debug!(outputs = self.outputs.len(), "task finished");
        Ok(ExecResult {
            outputs: std::mem::take(&mut self.outputs),
            context: std::mem::take(&mut self.ctx),
        })
    }

    /// Outputs emitted so far by a failed `execute`.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    /// Context as left by a failed `execute`.
    pub fn take_context(&mut self) -> Context {
        std::mem::take(&mut self.ctx)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
