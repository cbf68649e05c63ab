use td_driver::{Driver, compile};
use td_ir::{BytecodeModule, disassemble};

const TASK: &str = r#"@id: triage
%in: {"confidence": 0.92, "list": [9, 1, 5, 6, 2, 5], "meta": {"owner": "ops"}}
%model: sort{algorithm=bubble}
%out: ranked
+ranker:sorter[0,1]
->ranker=>ranked
let owner = meta.owner
let boosted = confidence * 100 + 5
!if confidence >= 0.8 then emit high
!if boosted > 90 then set tier = "gold"
!if tier = gold then log "promoted"
!if owner == "ops" then emit owner
"#;

#[test]
fn compiling_twice_is_byte_identical() {
    let driver = Driver::new();
    let a = driver.compile_text("triage.td", TASK).unwrap().encode();
    let b = driver.compile_text("triage.td", TASK).unwrap().encode();
    assert_eq!(a, b);
}

#[test]
fn decoded_module_runs_like_the_original() {
    let driver = Driver::new();
    let parsed = driver.parse_text("triage.td", TASK).unwrap();
    let module = compile(&parsed.program);
    let decoded = BytecodeModule::decode(&module.encode()).unwrap();
    assert_eq!(decoded, module);

    let direct = driver.execute(&parsed.program).unwrap();
    let replayed = driver
        .run_module(&decoded, parsed.program.input())
        .unwrap();
    assert_eq!(direct.outputs, replayed.outputs);
    assert_eq!(direct.context, replayed.context);
    let names: Vec<_> = direct.outputs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["ranked", "high", "owner"]);
}

#[test]
fn disassembly_names_every_instruction() {
    let module = Driver::new().compile_text("triage.td", TASK).unwrap();
    let text = disassemble(&module);
    for mnemonic in [
        "SORT",
        "EMIT_PREFERRED",
        "GET_MEMBER",
        "MUL",
        "ADD",
        "SET_CTX",
        "GE",
        "GT",
        "EQ",
        "JUMP_IF_FALSE",
        "EMIT_POP",
        "END",
    ] {
        assert!(text.contains(mnemonic), "missing {mnemonic}:\n{text}");
    }
}
