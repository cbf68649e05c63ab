use td_ir::{Action, CondAction, Stmt, StmtKind};

use crate::{Runtime, RuntimeError, models};

impl Runtime {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match &stmt.kind {
            StmtKind::Input(_) | StmtKind::Node(_) | StmtKind::Edge(_) | StmtKind::Cond(_) => {}
            StmtKind::Model(model) => models::run_model(&mut self.ctx, model)?,
            StmtKind::Out(name) => {
                let value = self.ctx.preferred_value();
                self.outputs.emit(name.as_str(), &value);
            }
            StmtKind::Action(ca) => self.exec_action(ca),
            StmtKind::Let(binding) => {
                let value = self.eval_expr(&binding.expr);
                self.ctx.set(binding.name.as_str(), value);
            }
        }
        Ok(())
    }

    fn exec_action(&mut self, ca: &CondAction) {
        if !self.eval_condition(&ca.cond) {
            return;
        }
        match &ca.action {
            Action::Emit(name) => {
                let value = self.ctx.emit_value(self.ctx.get(name));
                self.outputs.emit(name.as_str(), &value);
            }
            Action::Log(message) => {
                tracing::info!(task = %self.task_id, "{message}");
            }
            Action::Set { name, value } => self.ctx.set(name.as_str(), value.to_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use td_core::Value;

    use crate::{Runtime, RuntimeError};

    fn run(src: &str) -> crate::ExecResult {
        let program = td_parser::parse(src).unwrap();
        Runtime::new().execute(&program).unwrap()
    }

    #[test]
    fn emit_prefers_bound_value_then_sorted() {
        let res = run(
            "@id: t\n%in: {\"confidence\": 0.92, \"list\": [3, 1, 2]}\n%model: sort\n!if confidence >= 0.8 then emit high\n!if confidence then emit confidence\n",
        );
        let sorted = Value::List(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
        assert_eq!(res.outputs.get("high"), Some(&sorted));
        assert_eq!(res.outputs.get("confidence"), Some(&Value::Number(0.92)));
    }

    #[test]
    fn false_condition_skips_action() {
        let res = run("@id: t\n%in: {\"confidence\": 0.5}\n!if confidence >= 0.8 then emit high\n");
        assert!(!res.outputs.contains("high"));
    }

    #[test]
    fn set_and_out_follow_source_order() {
        let res = run("@id: t\n%out: before\n!if input then set mode = \"fast\"\n%in: 7\n");
        assert_eq!(res.outputs.get("before"), Some(&Value::Number(7.0)));
        assert_eq!(res.context.get("mode"), Value::str("fast"));
    }

    #[test]
    fn out_without_input_is_null() {
        let res = run("@id: t\n%out: r\n");
        assert_eq!(res.outputs.get("r"), Some(&Value::Null));
    }

    #[test]
    fn tool_model_records_arguments() {
        let res = run("@id: t\n%model: tool{name=search, limit=2}\n");
        let requests = res.context.get("tool_requests");
        let first = &requests.as_list().unwrap()[0];
        assert_eq!(
            first.as_object().unwrap().keys().collect::<Vec<_>>(),
            ["name", "limit"]
        );
        assert_eq!(res.context.get("plan"), requests);
    }

    #[test]
    fn failure_keeps_earlier_outputs() {
        let program = td_parser::parse("@id: t\n%in: 1\n%out: first\n%model: rank\n").unwrap();
        let mut rt = Runtime::new();
        let err = rt.execute(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownModel { .. }));
        assert_eq!(rt.take_outputs().get("first"), Some(&Value::Number(1.0)));
    }
}
