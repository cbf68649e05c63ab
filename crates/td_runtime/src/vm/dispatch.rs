use td_core::ops::{add, div, ge, get_member, gt, le, loose_eq, lt, mul, sub, truthy};
use td_core::{Context, Outputs, Value};
use td_ir::{BytecodeModule, Constant, Fetch, Instr, NO_KEY, fetch};

use super::stack::Stack;
use crate::{RuntimeConfig, RuntimeError, models};

fn name(module: &BytecodeModule, index: u32, ip: usize) -> Result<&str, RuntimeError> {
    match module.constant(index) {
        Some(Constant::Str(s)) => Ok(s),
        Some(_) => Err(RuntimeError::NameNotString { ip, index }),
        None => Err(RuntimeError::ConstantOutOfRange { ip, index }),
    }
}

fn flag(b: bool) -> Value {
    Value::Number(if b { 1.0 } else { 0.0 })
}

pub(crate) fn run_module(
    module: &BytecodeModule,
    ctx: &mut Context,
    outputs: &mut Outputs,
    config: &RuntimeConfig,
) -> Result<(), RuntimeError> {
    let code = &module.code;
    let mut stack = Stack::new(config.max_stack);
    let mut ip = 0usize;
    loop {
        let (instr, next) = match fetch(code, ip) {
            Ok(Fetch::Instr(instr, next)) => (instr, next),
            Ok(Fetch::Unknown(opcode)) => {
                tracing::debug!(ip, opcode, "unknown opcode, halting");
                return Ok(());
            }
            Ok(Fetch::Eof) => return Ok(()),
            Err(e) => return Err(RuntimeError::TruncatedInstruction { ip: e.ip }),
        };
        if config.trace_instructions {
            tracing::trace!(ip, op = instr.opcode().mnemonic(), depth = stack.len());
        }
        match instr {
            Instr::PushConst(index) => {
                let c = module
                    .constant(index)
                    .ok_or(RuntimeError::ConstantOutOfRange { ip, index })?;
                stack.push(c.to_value(), ip)?;
            }
            Instr::GetCtx(index) => {
                let v = ctx.get(name(module, index, ip)?);
                stack.push(v, ip)?;
            }
            Instr::SetCtx(index) => {
                let key = name(module, index, ip)?;
                let v = stack.pop(ip)?;
                ctx.set(key, v);
            }
            Instr::GetMember(index) => {
                let prop = name(module, index, ip)?;
                let obj = stack.pop(ip)?;
                stack.push(get_member(&obj, prop), ip)?;
            }
            Instr::Add | Instr::Sub | Instr::Mul | Instr::Div => {
                let (a, b) = stack.pop2(ip)?;
                let r = match instr {
                    Instr::Add => add(&a, &b),
                    Instr::Sub => sub(&a, &b),
                    Instr::Mul => mul(&a, &b),
                    _ => div(&a, &b),
                };
                stack.push(r, ip)?;
            }
            Instr::Eq | Instr::Ge | Instr::Le | Instr::Gt | Instr::Lt => {
                let (a, b) = stack.pop2(ip)?;
                let r = match instr {
                    Instr::Eq => loose_eq(&a, &b),
                    Instr::Ge => ge(&a, &b),
                    Instr::Le => le(&a, &b),
                    Instr::Gt => gt(&a, &b),
                    _ => lt(&a, &b),
                };
                stack.push(flag(r), ip)?;
            }
            Instr::JumpIfFalse(offset) => {
                let cond = stack.pop(ip)?;
                if !truthy(&cond) {
                    // Forward only: no instruction runs twice.
                    let target = next as i64 + i64::from(offset);
                    if offset < 0 {
                        return Err(RuntimeError::JumpOutOfRange { ip, target });
                    }
                    ip = target as usize;
                    continue;
                }
            }
            Instr::Sort { algorithm, key } => {
                let algorithm = name(module, algorithm, ip)?;
                let key = if key == NO_KEY {
                    None
                } else {
                    Some(name(module, key, ip)?)
                };
                models::sort(ctx, algorithm, key)?;
            }
            Instr::EmitPreferred(index) => {
                let out = name(module, index, ip)?;
                outputs.emit(out, &ctx.preferred_value());
            }
            Instr::EmitPop(index) => {
                let out = name(module, index, ip)?;
                let bound = stack.pop(ip)?;
                outputs.emit(out, &ctx.emit_value(bound));
            }
            Instr::End => return Ok(()),
        }
        ip = next;
    }
}

#[cfg(test)]
mod tests {
    use td_core::Value;
    use td_ir::{BytecodeModule, Constant, Instr};

    use crate::{RuntimeConfig, RuntimeError, VM};

    fn module(constants: Vec<Constant>, code: &[Instr]) -> BytecodeModule {
        let mut bytes = Vec::new();
        for instr in code {
            instr.encode(&mut bytes);
        }
        BytecodeModule {
            constants,
            code: bytes,
        }
    }

    fn s(v: &str) -> Constant {
        Constant::Str(v.into())
    }

    #[test]
    fn jump_skips_effect_when_condition_is_falsy() {
        // GET_CTX flag; JUMP_IF_FALSE +10; GET_CTX flag; EMIT_POP flag; END
        let m = module(
            vec![s("flag")],
            &[
                Instr::GetCtx(0),
                Instr::JumpIfFalse(10),
                Instr::GetCtx(0),
                Instr::EmitPop(0),
                Instr::End,
            ],
        );
        let mut vm = VM::new();
        let mut input = td_core::value::new_map();
        input.insert("flag".into(), Value::Number(0.0));
        let res = vm.run(&m, Some(&Value::Object(input.clone()))).unwrap();
        assert!(res.outputs.is_empty());

        input.insert("flag".into(), Value::Number(2.0));
        let res = vm.run(&m, Some(&Value::Object(input))).unwrap();
        assert_eq!(res.outputs.get("flag"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn unknown_opcode_halts_quietly() {
        let mut m = module(vec![s("r")], &[Instr::EmitPreferred(0)]);
        m.code.push(0x99);
        Instr::PushConst(7).encode(&mut m.code);
        let res = VM::new().run(&m, Some(&Value::Number(1.0))).unwrap();
        assert_eq!(res.outputs.get("r"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn malformed_streams_are_errors() {
        let cases: Vec<(BytecodeModule, RuntimeError)> = vec![
            (
                module(vec![], &[Instr::PushConst(3)]),
                RuntimeError::ConstantOutOfRange { ip: 0, index: 3 },
            ),
            (
                module(vec![Constant::Number(1.0)], &[Instr::GetCtx(0)]),
                RuntimeError::NameNotString { ip: 0, index: 0 },
            ),
            (
                module(vec![], &[Instr::Add]),
                RuntimeError::StackUnderflow { ip: 0 },
            ),
            (
                BytecodeModule {
                    constants: vec![],
                    code: vec![0x01, 0x00],
                },
                RuntimeError::TruncatedInstruction { ip: 0 },
            ),
            (
                module(vec![Constant::Null], &[Instr::PushConst(0), Instr::JumpIfFalse(-100)]),
                RuntimeError::JumpOutOfRange { ip: 5, target: -90 },
            ),
        ];
        for (m, expected) in cases {
            assert_eq!(VM::new().run(&m, None).unwrap_err(), expected);
        }
    }

    #[test]
    fn stack_limit_is_enforced() {
        let m = module(
            vec![Constant::Null],
            &[Instr::PushConst(0), Instr::PushConst(0), Instr::PushConst(0)],
        );
        let mut vm = VM::with_config(RuntimeConfig {
            max_stack: 2,
            ..RuntimeConfig::default()
        });
        assert_eq!(
            vm.run(&m, None).unwrap_err(),
            RuntimeError::StackOverflow { ip: 10, limit: 2 }
        );
    }

    #[test]
    fn outputs_survive_a_failing_instruction() {
        let m = module(vec![s("early")], &[Instr::EmitPreferred(0), Instr::Sub]);
        let mut vm = VM::new();
        assert!(vm.run(&m, Some(&Value::str("x"))).is_err());
        assert_eq!(vm.take_outputs().get("early"), Some(&Value::str("x")));
    }
}
