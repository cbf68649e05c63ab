//! Statement and expression trees.
use td_syntax::Span;

/// Literal scalar as written in source: model arguments, condition operands, `set` values
/// and expression literals.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Literal {
    pub fn to_value(&self) -> td_core::Value {
        match self {
            Literal::Null => td_core::Value::Null,
            Literal::Bool(b) => td_core::Value::Bool(*b),
            Literal::Number(n) => td_core::Value::Number(*n),
            Literal::Str(s) => td_core::Value::Str(s.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `=` and `==`, loose equality.
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub name: String,
    /// `None` tests the truthiness of `name`.
    pub compare: Option<(CompareOp, Literal)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Emit(String),
    Log(String),
    Set { name: String, value: Literal },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelDecl {
    pub ty: String,
    /// Arguments in declaration order.
    pub args: Vec<(String, Literal)>,
}

/// Algorithm used by `sort` when none is given.
pub const DEFAULT_SORT_ALGORITHM: &str = "native";

impl ModelDecl {
    pub fn arg(&self, name: &str) -> Option<&Literal> {
        self.args.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Argument rendered as a string; `null` counts as absent.
    pub fn str_arg(&self, name: &str) -> Option<String> {
        match self.arg(name)? {
            Literal::Null => None,
            lit => Some(td_core::ops::to_js_string(&lit.to_value())),
        }
    }

    pub fn sort_algorithm(&self) -> String {
        self.str_arg("algorithm")
            .unwrap_or_else(|| DEFAULT_SORT_ALGORITHM.to_string())
    }

    pub fn sort_key(&self) -> Option<String> {
        self.str_arg("key")
    }

    /// Arguments as an object in declaration order.
    pub fn args_object(&self) -> td_core::Value {
        let mut map = td_core::value::new_map();
        for (k, v) in &self.args {
            map.insert(k.clone(), v.to_value());
        }
        td_core::Value::Object(map)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDecl {
    pub name: String,
    pub ty: String,
    pub range: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDecl {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CondAction {
    pub cond: Condition,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetBinding {
    pub name: String,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Input(td_core::Value),
    Model(ModelDecl),
    Out(String),
    Node(NodeDecl),
    Edge(EdgeDecl),
    Cond(Condition),
    Action(CondAction),
    Let(LetBinding),
}

/// One parsed statement with the span of its source line(s).
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}
