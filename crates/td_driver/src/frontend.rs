use std::fs;

use td_ir::{BytecodeModule, Program};
use td_lexer::normalize_source;
use td_parser::SyntaxError;
use td_runtime::{ExecResult, Runtime, RuntimeConfig, VM};
use td_syntax::{SourceFile, SourceId};

use crate::{Error, compile};

#[derive(Clone, Debug)]
pub struct ParsedFile {
    pub path: String,
    pub source: SourceFile,
    pub program: Program,
}

/// Entry point for front ends: loads task files and runs them on either interpreter.
pub struct Driver {
    pub config: RuntimeConfig,
}

impl Driver {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Normalized source for `input`, ready for parsing and diagnostic rendering.
    pub fn source(&self, path: &str, input: &str) -> SourceFile {
        SourceFile::new(SourceId(0), path, normalize_source(input))
    }

    pub fn read_source(&self, path: &str) -> Result<SourceFile, Error> {
        let input = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(self.source(path, &input))
    }

    pub fn parse_source(&self, source: &SourceFile) -> Result<Program, SyntaxError> {
        td_parser::parse(source.text.as_str())
    }

    pub fn parse_text(&self, path: &str, input: &str) -> Result<ParsedFile, Error> {
        let source = self.source(path, input);
        let program = self.parse_source(&source)?;
        Ok(ParsedFile {
            path: path.to_string(),
            source,
            program,
        })
    }

    pub fn parse_file(&self, path: &str) -> Result<ParsedFile, Error> {
        let source = self.read_source(path)?;
        let program = self.parse_source(&source)?;
        Ok(ParsedFile {
            path: path.to_string(),
            source,
            program,
        })
    }

    pub fn compile_text(&self, path: &str, input: &str) -> Result<BytecodeModule, Error> {
        Ok(compile(&self.parse_text(path, input)?.program))
    }

    /// Run `program` on the tree-walking executor.
    pub fn execute(&self, program: &Program) -> Result<ExecResult, Error> {
        Ok(Runtime::with_config(self.config.clone()).execute(program)?)
    }

    /// Compile `program` and run the module on the VM with the program's own input.
    pub fn run_compiled(&self, program: &Program) -> Result<ExecResult, Error> {
        let module = compile(program);
        self.run_module(&module, program.input())
    }

    pub fn run_module(
        &self,
        module: &BytecodeModule,
        input: Option<&td_core::Value>,
    ) -> Result<ExecResult, Error> {
        Ok(VM::with_config(self.config.clone()).run(module, input)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<BytecodeModule, Error> {
        Ok(BytecodeModule::decode(bytes)?)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_before_parsing() {
        let driver = Driver::new();
        let parsed = driver
            .parse_text("t.td", "\u{feff}@id: t\r\n%in: [2, 1]\r\n%model: sort\r\n%out: r\r\n")
            .unwrap();
        assert!(!parsed.source.text.as_str().contains('\r'));
        let res = driver.run_compiled(&parsed.program).unwrap();
        assert_eq!(
            res.outputs.get("r"),
            Some(&td_core::Value::List(vec![
                td_core::Value::Number(1.0),
                td_core::Value::Number(2.0)
            ]))
        );
    }

    #[test]
    fn errors_unify() {
        let driver = Driver::new();
        assert!(matches!(
            driver.parse_text("t.td", "%out: x"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(driver.decode(b"XXXX"), Err(Error::Decode(_))));
        assert!(matches!(
            driver.read_source("/definitely/not/here.td"),
            Err(Error::Io { .. })
        ));
        let parsed = driver.parse_text("t.td", "@id: t\n%in: 3\n%model: sort\n").unwrap();
        assert!(matches!(
            driver.execute(&parsed.program),
            Err(Error::Runtime(_))
        ));
    }
}
