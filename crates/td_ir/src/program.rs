//! Parsed task program.
//!
//! Statements are stored once, in source order. The categorized views (`input`, `model`,
//! `actions`, ...) are indices into that list, so bucket membership never drives
//! execution order.

use td_core::Value;

use crate::{CondAction, Condition, EdgeDecl, LetBinding, ModelDecl, NodeDecl, Stmt, StmtKind};

#[derive(Clone, Debug, Default, PartialEq)]
struct ProgramIndex {
    input: Option<usize>,
    model: Option<usize>,
    out: Option<usize>,
    nodes: Vec<usize>,
    edges: Vec<usize>,
    conditions: Vec<usize>,
    actions: Vec<usize>,
    lets: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub task_id: String,
    stmts: Vec<Stmt>,
    index: ProgramIndex,
}

/// Declaration that may occur at most once per program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SingletonKind {
    Input,
    Model,
    Out,
}

impl SingletonKind {
    pub fn directive(self) -> &'static str {
        match self {
            SingletonKind::Input => "%in",
            SingletonKind::Model => "%model",
            SingletonKind::Out => "%out",
        }
    }
}

impl Program {
    /// Every statement, in the order it must execute.
    pub fn source_order(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn input(&self) -> Option<&Value> {
        match &self.stmts[self.index.input?].kind {
            StmtKind::Input(v) => Some(v),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&ModelDecl> {
        match &self.stmts[self.index.model?].kind {
            StmtKind::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn out(&self) -> Option<&str> {
        match &self.stmts[self.index.out?].kind {
            StmtKind::Out(name) => Some(name),
            _ => None,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeDecl> {
        self.bucket(&self.index.nodes).filter_map(|k| match k {
            StmtKind::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeDecl> {
        self.bucket(&self.index.edges).filter_map(|k| match k {
            StmtKind::Edge(e) => Some(e),
            _ => None,
        })
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.bucket(&self.index.conditions).filter_map(|k| match k {
            StmtKind::Cond(c) => Some(c),
            _ => None,
        })
    }

    pub fn actions(&self) -> impl Iterator<Item = &CondAction> {
        self.bucket(&self.index.actions).filter_map(|k| match k {
            StmtKind::Action(a) => Some(a),
            _ => None,
        })
    }

    pub fn lets(&self) -> impl Iterator<Item = &LetBinding> {
        self.bucket(&self.index.lets).filter_map(|k| match k {
            StmtKind::Let(l) => Some(l),
            _ => None,
        })
    }

    fn bucket<'a>(&'a self, idxs: &'a [usize]) -> impl Iterator<Item = &'a StmtKind> + 'a {
        idxs.iter().map(move |&i| &self.stmts[i].kind)
    }
}

/// Assembles statements into a `Program`, enforcing the single `%in`/`%model`/`%out` rule.
#[derive(Debug)]
pub struct ProgramBuilder {
    task_id: String,
    stmts: Vec<Stmt>,
    index: ProgramIndex,
}

impl ProgramBuilder {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            stmts: Vec::with_capacity(16),
            index: ProgramIndex::default(),
        }
    }

    /// Append a statement; a second input, model or output declaration is rejected and
    /// leaves the builder unchanged.
    pub fn push(&mut self, stmt: Stmt) -> Result<(), SingletonKind> {
        let pos = self.stmts.len();
        let ix = &mut self.index;
        match &stmt.kind {
            StmtKind::Input(_) => claim(&mut ix.input, pos, SingletonKind::Input)?,
            StmtKind::Model(_) => claim(&mut ix.model, pos, SingletonKind::Model)?,
            StmtKind::Out(_) => claim(&mut ix.out, pos, SingletonKind::Out)?,
            StmtKind::Node(_) => ix.nodes.push(pos),
            StmtKind::Edge(_) => ix.edges.push(pos),
            StmtKind::Cond(_) => ix.conditions.push(pos),
            StmtKind::Action(_) => ix.actions.push(pos),
            StmtKind::Let(_) => ix.lets.push(pos),
        }
        self.stmts.push(stmt);
        Ok(())
    }

    pub fn finish(self) -> Program {
        Program {
            task_id: self.task_id,
            stmts: self.stmts,
            index: self.index,
        }
    }
}

fn claim(slot: &mut Option<usize>, pos: usize, kind: SingletonKind) -> Result<(), SingletonKind> {
    if slot.is_some() {
        return Err(kind);
    }
    *slot = Some(pos);
    Ok(())
}
