//! String literal interning and global-variable emission.

use super::state::GlobalVar;
use super::{CodeGen, CodeGenError};
use crate::ast::Expr;
use crate::types::Type;
use std::fmt::Write as _;

impl CodeGen {
    /// Escape a string for an LLVM IR string literal.
    pub(super) fn escape_llvm_string(s: &str) -> Result<String, std::fmt::Error> {
        let mut result = String::new();
        for ch in s.chars() {
            match ch {
                ' '..='!' | '#'..='[' | ']'..='~' => result.push(ch),
                '\\' => result.push_str(r"\\"),
                '"' => result.push_str(r#"\22"#),
                '\n' => result.push_str(r"\0A"),
                '\r' => result.push_str(r"\0D"),
                '\t' => result.push_str(r"\09"),
                _ => {
                    for byte in ch.to_string().as_bytes() {
                        write!(&mut result, r"\{:02X}", byte)?;
                    }
                }
            }
        }
        Ok(result)
    }

    /// Get or create the global constant backing a string literal,
    /// deduplicating identical literals (spec.md §3 "String literals have
    /// internal linkage and are constant").
    pub(super) fn get_string_global(&mut self, s: &str) -> Result<String, CodeGenError> {
        if let Some(name) = self.string_constants.get(s) {
            return Ok(name.clone());
        }
        let name = format!("@.str.{}", self.string_counter);
        self.string_counter += 1;

        let escaped = Self::escape_llvm_string(s)?;
        let len = s.len() + 1;
        writeln!(
            &mut self.string_globals,
            "{} = private unnamed_addr constant [{} x i8] c\"{}\\00\"",
            name, len, escaped
        )?;

        self.string_constants.insert(s.to_string(), name.clone());
        Ok(name)
    }

    /// The literal global `print` selects for a `bool` value (spec.md
    /// §4.4.4 "print" / "Builtin to_str").
    pub(super) fn get_bool_literal_global(&mut self, value: bool) -> Result<String, CodeGenError> {
        self.get_string_global(if value { "true" } else { "false" })
    }

    /// Declare a top-level `global`. Constant-foldable initializers become
    /// the LLVM initializer directly; anything else gets a zero/null
    /// initializer and is queued for deferred assignment in `main`'s
    /// prolog (spec.md §4.4.3 step 2, §7 "non-constant initializer for a
    /// global that is not a function call").
    pub(super) fn declare_global(
        &mut self,
        ir: &mut String,
        name: &str,
        ty: &Type,
        value: &Expr,
    ) -> Result<(), CodeGenError> {
        let ir_name = format!("@{}", name);
        // A struct-typed global holds the handle a constructor call hands
        // back, not the bare aggregate -- same reasoning as
        // `llvm_value_type` for locals and parameters.
        let llvm_ty = if matches!(ty, Type::Struct(_)) {
            "ptr".to_string()
        } else {
            super::types::llvm_type(ty)
        };

        match Self::const_fold(value) {
            Some(init) => {
                let literal = self.const_literal(ty, &init)?;
                writeln!(ir, "{} = global {} {}", ir_name, llvm_ty, literal)?;
            }
            None => {
                if !matches!(value, Expr::Call { .. }) {
                    return Err(CodeGenError::Logic(format!(
                        "global '{}' has a non-constant, non-call initializer",
                        name
                    )));
                }
                let zero = Self::zero_literal(ty);
                writeln!(ir, "{} = global {} {}", ir_name, llvm_ty, zero)?;
                self.deferred_globals
                    .push((name.to_string(), ty.clone(), value.clone()));
            }
        }

        self.globals.insert(
            name.to_string(),
            GlobalVar {
                ir_name,
                ty: ty.clone(),
            },
        );
        Ok(())
    }

    /// Recognize a literal-only constant expression (spec.md §4.2: "Only
    /// `global` is allowed with constant initializer expressions
    /// (literals and arithmetic over literals)"). Returns the folded
    /// literal, or `None` if `value` is not constant-foldable.
    fn const_fold(value: &Expr) -> Option<Expr> {
        match value {
            Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Bool(_) | Expr::Null => {
                Some(value.clone())
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = Self::const_fold(lhs)?;
                let r = Self::const_fold(rhs)?;
                crate::codegen::expressions::fold_const_binary(*op, &l, &r)
            }
            _ => None,
        }
    }

    fn const_literal(&mut self, ty: &Type, value: &Expr) -> Result<String, CodeGenError> {
        match (ty, value) {
            (Type::Int, Expr::Int(n)) => Ok(n.to_string()),
            (Type::Float, Expr::Float(f)) => Ok(format!("{:?}", f)),
            (Type::Float, Expr::Int(n)) => Ok(format!("{:?}", *n as f64)),
            (Type::Bool, Expr::Bool(b)) => Ok(if *b { "1".to_string() } else { "0".to_string() }),
            (Type::String, Expr::Str(s)) => {
                let global = self.get_string_global(s)?;
                Ok(global)
            }
            (Type::Reference(_), Expr::Null) => Ok("null".to_string()),
            (other, _) => Err(CodeGenError::Logic(format!(
                "initializer does not match declared type {}",
                other.describe()
            ))),
        }
    }

    fn zero_literal(ty: &Type) -> &'static str {
        match ty {
            Type::Int => "0",
            Type::Float => "0.0",
            Type::Bool => "0",
            Type::String | Type::Reference(_) | Type::Array(_, None) | Type::Null | Type::Struct(_) => {
                "null"
            }
            Type::Array(_, Some(_)) => "zeroinitializer",
            Type::Void | Type::Function(..) => "zeroinitializer",
        }
    }

    pub(super) fn emit_string_globals(&self, ir: &mut String) -> Result<(), CodeGenError> {
        if !self.string_globals.is_empty() {
            ir.push_str(&self.string_globals);
            writeln!(ir)?;
        }
        Ok(())
    }
}
