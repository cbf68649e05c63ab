//! Program -> bytecode lowering.
//!
//! One pass over the statements in source order. Conditional actions use a forward
//! `JUMP_IF_FALSE` whose offset is written once the effect code length is known.

use hashbrown::HashMap;
use td_ir::{
    Action, BinaryOp, BytecodeModule, CompareOp, CondAction, Condition, Constant, Expr, Instr,
    NO_KEY, Program, StmtKind,
};

/// Lower `program` to a module. `tool` models and declarations without runtime effect
/// produce no code.
pub fn compile(program: &Program) -> BytecodeModule {
    let mut c = Compiler::new();
    for stmt in program.source_order() {
        c.compile_stmt(&stmt.kind);
    }
    c.emit(Instr::End);
    c.module
}

struct Compiler {
    module: BytecodeModule,
    /// (constant tag, serialized value) -> pool index.
    pool: HashMap<(u8, String), u32>,
}

impl Compiler {
    fn new() -> Self {
        Self {
            module: BytecodeModule::default(),
            pool: HashMap::new(),
        }
    }

    fn emit(&mut self, instr: Instr) {
        instr.encode(&mut self.module.code);
    }

    fn add_constant(&mut self, c: Constant) -> u32 {
        let constants = &mut self.module.constants;
        *self.pool.entry(c.dedup_key()).or_insert_with(|| {
            constants.push(c);
            (constants.len() - 1) as u32
        })
    }

    fn name(&mut self, s: &str) -> u32 {
        self.add_constant(Constant::Str(s.to_string()))
    }

    /// Emit `JUMP_IF_FALSE` with a zero offset and return the offset field's position.
    fn emit_jump_if_false(&mut self) -> usize {
        self.emit(Instr::JumpIfFalse(0));
        self.module.code.len() - 4
    }

    /// Point the jump whose offset field starts at `pos` at the current end of code.
    fn patch_jump(&mut self, pos: usize) {
        let offset = (self.module.code.len() - (pos + 4)) as i32;
        self.module.code[pos..pos + 4].copy_from_slice(&offset.to_le_bytes());
    }

    fn compile_stmt(&mut self, kind: &StmtKind) {
        match kind {
            StmtKind::Model(model) if model.ty == "sort" => {
                let algorithm = self.name(&model.sort_algorithm());
                let key = match model.sort_key() {
                    Some(k) => self.name(&k),
                    None => NO_KEY,
                };
                self.emit(Instr::Sort { algorithm, key });
            }
            StmtKind::Out(name) => {
                let idx = self.name(name);
                self.emit(Instr::EmitPreferred(idx));
            }
            StmtKind::Let(binding) => {
                self.compile_expr(&binding.expr);
                let idx = self.name(&binding.name);
                self.emit(Instr::SetCtx(idx));
            }
            StmtKind::Action(ca) => self.compile_action(ca),
            StmtKind::Model(_)
            | StmtKind::Input(_)
            | StmtKind::Node(_)
            | StmtKind::Edge(_)
            | StmtKind::Cond(_) => {}
        }
    }

    fn compile_action(&mut self, ca: &CondAction) {
        self.compile_condition(&ca.cond);
        let jump = self.emit_jump_if_false();
        match &ca.action {
            Action::Emit(name) => {
                let idx = self.name(name);
                self.emit(Instr::GetCtx(idx));
                self.emit(Instr::EmitPop(idx));
            }
            Action::Set { name, value } => {
                let c = self.add_constant(Constant::from(value));
                let idx = self.name(name);
                self.emit(Instr::PushConst(c));
                self.emit(Instr::SetCtx(idx));
            }
            Action::Log(_) => {}
        }
        self.patch_jump(jump);
    }

    fn compile_condition(&mut self, cond: &Condition) {
        let idx = self.name(&cond.name);
        self.emit(Instr::GetCtx(idx));
        if let Some((op, lit)) = &cond.compare {
            let c = self.add_constant(Constant::from(lit));
            self.emit(Instr::PushConst(c));
            self.emit(match op {
                CompareOp::Eq => Instr::Eq,
                CompareOp::Ge => Instr::Ge,
                CompareOp::Le => Instr::Le,
                CompareOp::Gt => Instr::Gt,
                CompareOp::Lt => Instr::Lt,
            });
        }
    }

    fn compile_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => {
                let c = self.add_constant(Constant::from(lit));
                self.emit(Instr::PushConst(c));
            }
            Expr::Ident(name) => {
                let idx = self.name(name);
                self.emit(Instr::GetCtx(idx));
            }
            Expr::Member { object, property } => {
                self.compile_expr(object);
                let idx = self.name(property);
                self.emit(Instr::GetMember(idx));
            }
            Expr::Binary { op, left, right } => {
                self.compile_expr(left);
                self.compile_expr(right);
                self.emit(match op {
                    BinaryOp::Add => Instr::Add,
                    BinaryOp::Sub => Instr::Sub,
                    BinaryOp::Mul => Instr::Mul,
                    BinaryOp::Div => Instr::Div,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use td_ir::{Constant, Fetch, Instr, fetch};

    use super::compile;

    fn instrs(src: &str) -> (Vec<Instr>, Vec<Constant>) {
        let module = compile(&td_parser::parse(src).unwrap());
        let mut out = Vec::new();
        let mut ip = 0;
        while let Ok(Fetch::Instr(i, next)) = fetch(&module.code, ip) {
            out.push(i);
            ip = next;
        }
        (out, module.constants)
    }

    #[test]
    fn action_jump_lands_after_effect() {
        let (code, constants) = instrs("@id: t\n!if score >= 0.8 then emit high\n");
        assert_eq!(
            code,
            vec![
                Instr::GetCtx(0),
                Instr::PushConst(1),
                Instr::Ge,
                Instr::JumpIfFalse(10),
                Instr::GetCtx(2),
                Instr::EmitPop(2),
                Instr::End,
            ]
        );
        assert_eq!(
            constants,
            vec![
                Constant::Str("score".into()),
                Constant::Number(0.8),
                Constant::Str("high".into()),
            ]
        );
    }

    #[test]
    fn log_action_jumps_over_nothing() {
        let (code, _) = instrs("@id: t\n!if ok then log \"hi\"\n");
        assert_eq!(
            code,
            vec![Instr::GetCtx(0), Instr::JumpIfFalse(0), Instr::End]
        );
    }

    #[test]
    fn sort_defaults_and_tool_is_skipped() {
        let (code, constants) = instrs("@id: t\n%model: sort\n%out: r\n");
        assert_eq!(
            code,
            vec![
                Instr::Sort {
                    algorithm: 0,
                    key: td_ir::NO_KEY
                },
                Instr::EmitPreferred(1),
                Instr::End,
            ]
        );
        assert_eq!(constants[0], Constant::Str("native".into()));

        let (code, constants) = instrs("@id: t\n%model: tool{name=x}\n");
        assert_eq!(code, vec![Instr::End]);
        assert!(constants.is_empty());
    }

    #[test]
    fn constants_are_deduplicated_by_type_and_value() {
        let (_, constants) = instrs(
            "@id: t\nlet a = 1 + 1.0 + \"1\" + x\n!if x = 1 then set x = \"1\"\n",
        );
        assert_eq!(
            constants,
            vec![
                Constant::Number(1.0),
                Constant::Str("1".into()),
                Constant::Str("x".into()),
                Constant::Str("a".into()),
            ]
        );
    }

    #[test]
    fn let_lowers_member_chains() {
        let (code, _) = instrs("@id: t\nlet z = obj.y.w * 2\n");
        assert_eq!(
            code,
            vec![
                Instr::GetCtx(0),
                Instr::GetMember(1),
                Instr::GetMember(2),
                Instr::PushConst(3),
                Instr::Mul,
                Instr::SetCtx(4),
                Instr::End,
            ]
        );
    }
}
