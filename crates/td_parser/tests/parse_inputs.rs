use std::fs;
use std::path::PathBuf;

use td_parser::{Action, Expr, Literal, StmtKind, parse};

fn input(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("inputs")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn rank_task_keeps_every_statement() {
    let program = parse(&input("rank.td")).unwrap();
    assert_eq!(program.task_id, "rank-results");
    let kinds: Vec<&str> = program
        .source_order()
        .iter()
        .map(|s| match s.kind {
            StmtKind::Input(_) => "in",
            StmtKind::Model(_) => "model",
            StmtKind::Out(_) => "out",
            StmtKind::Node(_) => "node",
            StmtKind::Edge(_) => "edge",
            StmtKind::Cond(_) => "cond",
            StmtKind::Action(_) => "action",
            StmtKind::Let(_) => "let",
        })
        .collect();
    assert_eq!(
        kinds,
        ["in", "model", "out", "node", "edge", "cond", "action", "action"]
    );
    assert_eq!(program.nodes().count(), 1);
    assert_eq!(program.edges().count(), 1);
    assert_eq!(program.conditions().count(), 1);
    let model = program.model().unwrap();
    assert_eq!(model.arg("algorithm"), Some(&Literal::Str("bubble".into())));
    let logs: Vec<_> = program
        .actions()
        .filter_map(|a| match &a.action {
            Action::Log(m) => Some(m.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(logs, ["low confidence"]);
}

#[test]
fn arith_task_lets() {
    let program = parse(&input("arith.td")).unwrap();
    let lets: Vec<_> = program.lets().collect();
    assert_eq!(lets.len(), 2);
    assert_eq!(lets[0].name, "z");
    assert!(matches!(lets[1].expr, Expr::Binary { .. }));
    assert_eq!(program.actions().count(), 2);
}

#[test]
fn tool_arguments_keep_declaration_order() {
    let program = parse(&input("tool.td")).unwrap();
    let model = program.model().unwrap();
    let keys: Vec<_> = model.args.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["name", "query", "limit"]);
    assert_eq!(model.arg("limit"), Some(&Literal::Number(5.0)));
}

#[test]
fn malformed_lines_are_syntax_errors() {
    for (body, line) in [
        ("+badnode", 2),
        ("what is this", 2),
        ("%out:", 2),
        ("!if x then explode", 2),
        ("let = 3", 2),
        ("let y = 1.2.3", 2),
    ] {
        let src = format!("@id: t\n{body}\n");
        let err = parse(&src).unwrap_err();
        assert_eq!(err.line, line, "{body}");
        assert_eq!(err.text, body);
    }
}
