//! MiniLang Compiler
//!
//! Compiles MiniLang source to textual LLVM IR: lex, parse into an AST,
//! then emit. Producing an object file or executable from the IR is left
//! to an external toolchain (`clang`/`llc`) -- this crate's job ends at
//! the `.ll` text.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod types;

pub use ast::Program;
pub use codegen::{CodeGen, CodeGenError};
pub use config::{CompilerConfig, ConfigError};
pub use lexer::{LexError, Token, TokenKind};
pub use parser::ParseError;
pub use types::Type;

use std::fs;
use std::path::Path;

/// Any stage of the pipeline failing, in source order: lexing is folded
/// into parsing (the parser is the only thing that calls the lexer), so
/// this has one variant per remaining stage.
#[derive(Debug)]
pub enum CompileError {
    Parse(ParseError),
    CodeGen(CodeGenError),
    Io(String),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::CodeGen(e) => write!(f, "{}", e),
            CompileError::Io(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<CodeGenError> for CompileError {
    fn from(e: CodeGenError) -> Self {
        CompileError::CodeGen(e)
    }
}

/// Compile a MiniLang source string to textual LLVM IR.
pub fn compile_source(source: &str, config: CompilerConfig) -> Result<String, CompileError> {
    let program = parser::parse(source)?;
    let ir = CodeGen::new(config).emit(&program)?;
    Ok(ir)
}

/// Read a MiniLang source file and compile it to textual LLVM IR.
pub fn compile_file(source_path: &Path, config: CompilerConfig) -> Result<String, CompileError> {
    let source = fs::read_to_string(source_path)
        .map_err(|e| CompileError::Io(format!("failed to read '{}': {}", source_path.display(), e)))?;
    compile_source(&source, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_program_end_to_end() {
        let ir = compile_source("print(1 + 2)", CompilerConfig::default()).unwrap();
        assert!(ir.contains("define i32 @main()"));
        assert!(ir.contains("add i64"));
    }

    #[test]
    fn surfaces_parse_errors() {
        let err = compile_source("let x: int =", CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn surfaces_codegen_errors() {
        let err = compile_source("break", CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::CodeGen(_)));
    }
}
