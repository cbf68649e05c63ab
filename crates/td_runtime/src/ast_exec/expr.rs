use td_core::Value;
use td_core::ops::{add, div, ge, get_member, gt, le, loose_eq, lt, mul, sub, truthy};
use td_ir::{BinaryOp, CompareOp, Condition, Expr};

use crate::Runtime;

impl Runtime {
    pub(crate) fn eval_expr(&self, expr: &Expr) -> Value {
        match expr {
            Expr::Literal(lit) => lit.to_value(),
            Expr::Ident(name) => self.ctx.get(name),
            Expr::Member { object, property } => get_member(&self.eval_expr(object), property),
            Expr::Binary { op, left, right } => {
                let a = self.eval_expr(left);
                let b = self.eval_expr(right);
                match op {
                    BinaryOp::Add => add(&a, &b),
                    BinaryOp::Sub => sub(&a, &b),
                    BinaryOp::Mul => mul(&a, &b),
                    BinaryOp::Div => div(&a, &b),
                }
            }
        }
    }

    pub(crate) fn eval_condition(&self, cond: &Condition) -> bool {
        let value = self.ctx.get(&cond.name);
        let Some((op, lit)) = &cond.compare else {
            return truthy(&value);
        };
        let rhs = lit.to_value();
        match op {
            CompareOp::Eq => loose_eq(&value, &rhs),
            CompareOp::Ge => ge(&value, &rhs),
            CompareOp::Le => le(&value, &rhs),
            CompareOp::Gt => gt(&value, &rhs),
            CompareOp::Lt => lt(&value, &rhs),
        }
    }
}
