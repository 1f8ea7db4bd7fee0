//! Per-statement lowering (spec.md §4.4.4), plus the `print` builtin's
//! dispatch -- the one piece of statement-level codegen involved enough
//! to deserve its own helpers rather than living inline in the match arm.

use std::fmt::Write as _;

use super::state::LocalSlot;
use super::types::{format_specifier, llvm_type, llvm_value_type};
use super::{CodeGen, CodeGenError};
use crate::ast::{ArrayAssignTarget, Expr, Statement};
use crate::types::Type;

impl CodeGen {
    /// Lower one statement. `struct`, `global` and `func` are hoisted by
    /// the generation order in `program.rs` and never reach here except
    /// when nested inside a body, which spec.md treats as a definitional
    /// construct out of place -- an error, not a silent no-op.
    pub(super) fn lower_statement(&mut self, statement: &Statement) -> Result<(), CodeGenError> {
        if self.config.emit_comments {
            self.emit_statement_comment(statement)?;
        }
        match statement {
            Statement::Let { name, ty, value } => self.lower_let(name, ty, value),
            Statement::Global { .. } => Err(CodeGenError::Logic(
                "'global' declarations must appear at the top level".to_string(),
            )),
            Statement::Print(expr) => self.lower_print(expr),
            Statement::If {
                cond,
                then_branch,
                else_branch,
            } => self.lower_if(cond, then_branch, else_branch),
            Statement::While { cond, body } => self.lower_while(cond, body),
            Statement::Break => self.lower_break(),
            Statement::FuncDef(_) => Err(CodeGenError::Logic(
                "function definitions must appear at the top level".to_string(),
            )),
            Statement::Return(expr) => self.lower_return(expr.as_ref()),
            Statement::StructDef(_) => Err(CodeGenError::Logic(
                "struct definitions must appear at the top level".to_string(),
            )),
            Statement::Assign { name, value } => self.lower_assign(name, value),
            Statement::ArrayAssign {
                target,
                index,
                value,
            } => self.lower_array_assign(target, index, value),
            Statement::FieldAssign { base, path, value } => {
                self.lower_field_assign(base, path, value)
            }
            Statement::ExprStmt(expr) => self.lower_expr(expr).map(|_| ()),
        }
    }

    fn lower_let(&mut self, name: &str, ty: &Type, value: &Expr) -> Result<(), CodeGenError> {
        if ty.is_inline_array() {
            let elem = ty
                .array_element()
                .cloned()
                .ok_or_else(|| CodeGenError::Logic(format!("'{}' has no element type", name)))?;
            let n = ty
                .array_size()
                .ok_or_else(|| CodeGenError::Logic(format!("'{}' has no fixed size", name)))?;
            let array_ty = format!("[{} x {}]", n, llvm_type(&elem));
            let slot = self.fresh_reg();
            writeln!(self.output, "  {} = alloca {}", slot, array_ty)?;
            self.init_inline_array(&slot, &elem, n, value)?;
            self.locals.insert(
                name.to_string(),
                LocalSlot {
                    ptr: slot,
                    ty: ty.clone(),
                    is_direct: false,
                },
            );
        } else {
            let (val, vty) = self.lower_expr(value)?;
            let val = self.coerce_value(&val, &vty, ty)?;
            let llvm_ty = llvm_value_type(ty);
            let slot = self.fresh_reg();
            writeln!(self.output, "  {} = alloca {}", slot, llvm_ty)?;
            writeln!(self.output, "  store {} {}, ptr {}", llvm_ty, val, slot)?;
            self.locals.insert(
                name.to_string(),
                LocalSlot {
                    ptr: slot,
                    ty: ty.clone(),
                    is_direct: false,
                },
            );
        }
        Ok(())
    }

    fn lower_assign(&mut self, name: &str, value: &Expr) -> Result<(), CodeGenError> {
        if let Some(slot) = self.locals.get(name) {
            if slot.is_direct {
                return Err(CodeGenError::Logic(format!(
                    "cannot reassign array parameter '{}'",
                    name
                )));
            }
        }
        let (addr, ty) = self.variable_address(name)?;
        if ty.is_inline_array() {
            return Err(CodeGenError::Logic(format!(
                "cannot assign directly to fixed-size array '{}'; use indexed assignment instead",
                name
            )));
        }
        let (val, vty) = self.lower_expr(value)?;
        let val = self.coerce_value(&val, &vty, &ty)?;
        writeln!(
            self.output,
            "  store {} {}, ptr {}",
            llvm_value_type(&ty),
            val,
            addr
        )?;
        Ok(())
    }

    fn lower_return(&mut self, expr: Option<&Expr>) -> Result<(), CodeGenError> {
        if self.in_main {
            if let Some(e) = expr {
                self.lower_expr(e)?;
            }
            self.emit_cleanup()?;
            writeln!(self.output, "  ret i32 0")?;
        } else {
            let ret_ty = self.current_return_type.clone();
            if ret_ty == Type::Void {
                if let Some(e) = expr {
                    self.lower_expr(e)?;
                }
                self.emit_cleanup()?;
                writeln!(self.output, "  ret void")?;
            } else {
                let e = expr.ok_or_else(|| {
                    CodeGenError::Logic("missing return value in non-void function".to_string())
                })?;
                let (val, vty) = self.lower_expr(e)?;
                let val = self.coerce_value(&val, &vty, &ret_ty)?;
                self.emit_cleanup()?;
                writeln!(self.output, "  ret {} {}", llvm_value_type(&ret_ty), val)?;
            }
        }
        self.block_terminated = true;
        Ok(())
    }

    // ---------------------------------------------------------------
    // print (spec.md §4.4.4 "print")
    // ---------------------------------------------------------------

    fn lower_print(&mut self, expr: &Expr) -> Result<(), CodeGenError> {
        if let Some(target) = self.print_array_target(expr) {
            return self.print_array(&target);
        }
        let (val, ty) = self.lower_expr(expr)?;
        self.print_scalar(&val, &ty)
    }

    /// If `expr` statically denotes an array-typed identifier or
    /// struct-field, return the `ArrayAssignTarget` it corresponds to so
    /// the array-printing path (bracketed, comma-joined elements) can
    /// reuse the same pointer/element/size derivation as index assignment.
    fn print_array_target(&self, expr: &Expr) -> Option<ArrayAssignTarget> {
        match expr {
            Expr::Identifier(name) => match self.variable_type(name) {
                Ok(Type::Array(_, _)) => Some(ArrayAssignTarget::Var(name.clone())),
                _ => None,
            },
            Expr::FieldAccess { base, field } => {
                let Expr::Identifier(base_name) = base.as_ref() else {
                    return None;
                };
                let Ok(Type::Struct(s)) = self.variable_type(base_name) else {
                    return None;
                };
                let layout = self.struct_registry.get(&s.name).ok()?;
                let (_, fty, _) = layout.field(field)?;
                if matches!(fty, Type::Array(_, _)) {
                    Some(ArrayAssignTarget::Field {
                        base: base_name.clone(),
                        field: field.clone(),
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn print_array(&mut self, target: &ArrayAssignTarget) -> Result<(), CodeGenError> {
        let (base_val, elem, size) = self.array_base(target)?;
        let n = size.unwrap_or(0);

        let open = self.get_string_global("[")?;
        let close = self.get_string_global("]\n")?;
        let sep = self.get_string_global(", ")?;

        self.call_printf_str(&open)?;
        let elem_llvm = llvm_value_type(&elem);
        let array_ty = format!("[{} x {}]", n, llvm_type(&elem));
        for i in 0..n {
            if i > 0 {
                self.call_printf_str(&sep)?;
            }
            let gep = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 {}",
                gep, array_ty, base_val, i
            )?;
            let v = self.fresh_reg();
            writeln!(self.output, "  {} = load {}, ptr {}", v, elem_llvm, gep)?;
            self.print_value(&v, &elem)?;
        }
        self.call_printf_str(&close)
    }

    fn print_scalar(&mut self, val: &str, ty: &Type) -> Result<(), CodeGenError> {
        self.print_value(val, ty)?;
        let nl = self.get_string_global("\n")?;
        self.call_printf_str(&nl)
    }

    /// Print one value (no trailing newline), selecting a format
    /// specifier from its type, with `bool` handled separately since it
    /// has no printf conversion of its own.
    fn print_value(&mut self, val: &str, ty: &Type) -> Result<(), CodeGenError> {
        if *ty == Type::Bool {
            let t = self.get_bool_literal_global(true)?;
            let f = self.get_bool_literal_global(false)?;
            let sel = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = select i1 {}, ptr {}, ptr {}",
                sel, val, t, f
            )?;
            let fmt = self.get_string_global("%s")?;
            let discard = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = call i32 (ptr, ...) @printf(ptr {}, ptr {})",
                discard, fmt, sel
            )?;
            return Ok(());
        }
        let spec = format_specifier(ty)?;
        let fmt = self.get_string_global(spec)?;
        let arg_llvm = llvm_value_type(ty);
        let discard = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = call i32 (ptr, ...) @printf(ptr {}, {} {})",
            discard, fmt, arg_llvm, val
        )?;
        Ok(())
    }

    fn call_printf_str(&mut self, global: &str) -> Result<(), CodeGenError> {
        let discard = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = call i32 (ptr, ...) @printf(ptr {})",
            discard, global
        )?;
        Ok(())
    }

    /// `CompilerConfig::emit_comments` annotation: a one-line `;` comment
    /// naming the MiniLang construct about to be lowered, for readers of
    /// the generated `.ll` rather than for `llc`/`opt`, which ignore it.
    fn emit_statement_comment(&mut self, statement: &Statement) -> Result<(), CodeGenError> {
        let desc = match statement {
            Statement::Let { name, .. } => format!("let {}", name),
            Statement::Global { name, .. } => format!("global {}", name),
            Statement::Print(_) => "print".to_string(),
            Statement::If { .. } => "if".to_string(),
            Statement::While { .. } => "while".to_string(),
            Statement::Break => "break".to_string(),
            Statement::FuncDef(f) => format!("func {}", f.name),
            Statement::Return(_) => "return".to_string(),
            Statement::StructDef(s) => format!("struct {}", s.name),
            Statement::Assign { name, .. } => format!("{} =", name),
            Statement::ArrayAssign { target, .. } => match target {
                ArrayAssignTarget::Var(name) => format!("{}[..] =", name),
                ArrayAssignTarget::Field { base, field } => format!("{}.{}[..] =", base, field),
            },
            Statement::FieldAssign { base, path, .. } => {
                format!("{}.{} =", base, path.join("."))
            }
            Statement::ExprStmt(_) => "expr".to_string(),
        };
        writeln!(self.output, "  ; {}", desc)?;
        Ok(())
    }
}
