//! Top-level driver: the module generation order from spec.md §4.4.3.
//!
//! 1. Pre-pass every `struct` definition into the layout registry, so
//!    field access never depends on declaration order.
//! 2. Declare every top-level `global`, folding constant initializers and
//!    queuing non-constant (call) initializers for `main`'s prolog.
//! 3. Register every top-level function's signature, so forward calls
//!    resolve regardless of definition order.
//! 4. Emit `main`: the allocation tracker, the Windows console setup,
//!    the deferred global assignments, then every remaining top-level
//!    statement, in source order.
//! 5. Emit each user function's body.

use std::fmt::Write as _;

use super::state::{FuncSig, LocalSlot};
use super::types::llvm_value_type;
use super::{CodeGen, CodeGenError};
use crate::ast::{FuncDef, Program, Statement};
use crate::types::Type;

impl CodeGen {
    /// Compile a whole program into a textual LLVM IR module.
    pub fn emit(&mut self, program: &Program) -> Result<String, CodeGenError> {
        for stmt in &program.statements {
            if let Statement::StructDef(def) = stmt {
                let fields: Vec<(String, Type)> = def
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.ty.clone()))
                    .collect();
                self.struct_registry.define(&def.name, &fields)?;
            }
        }

        let mut globals_ir = String::new();
        for stmt in &program.statements {
            if let Statement::Global { name, ty, value } = stmt {
                self.declare_global(&mut globals_ir, name, ty, value)?;
            }
        }

        for stmt in &program.statements {
            if let Statement::FuncDef(f) = stmt {
                let params = f.params.iter().map(|p| p.ty.clone()).collect();
                self.functions.insert(
                    f.name.clone(),
                    FuncSig {
                        params,
                        return_type: f.return_type.clone(),
                    },
                );
            }
        }

        let main_ir = self.emit_main(program)?;

        let mut funcs_ir = String::new();
        for stmt in &program.statements {
            if let Statement::FuncDef(f) = stmt {
                funcs_ir.push_str(&self.emit_function(f)?);
            }
        }

        let mut ir = String::new();
        writeln!(
            ir,
            "target triple = \"{}\"",
            super::platform::get_target_triple()
        )?;
        writeln!(ir)?;
        self.struct_registry.emit_all_type_decls(&mut ir)?;
        writeln!(ir)?;
        super::runtime::emit_runtime_decls(&mut ir, super::platform::targeting_windows())?;
        if !globals_ir.is_empty() {
            ir.push_str(&globals_ir);
            writeln!(ir)?;
        }
        self.emit_string_globals(&mut ir)?;
        ir.push_str(&main_ir);
        ir.push_str(&funcs_ir);
        Ok(ir)
    }

    /// Emit the synthesized entry point: every remaining top-level
    /// statement runs inside `main`, which always returns `0`
    /// (spec.md §4.4.3 step 4).
    fn emit_main(&mut self, program: &Program) -> Result<String, CodeGenError> {
        self.begin_function(Type::Int, true);
        self.setup_alloc_tracker()?;

        if super::platform::targeting_windows() {
            writeln!(self.output, "  call i32 @SetConsoleOutputCP(i32 65001)")?;
        }

        let deferred = self.deferred_globals.clone();
        for (name, ty, value) in &deferred {
            let (val, vty) = self.lower_expr(value)?;
            let val = self.coerce_value(&val, &vty, ty)?;
            let llvm_ty = llvm_value_type(ty);
            writeln!(self.output, "  store {} {}, ptr @{}", llvm_ty, val, name)?;
        }

        for stmt in &program.statements {
            if self.block_terminated {
                break;
            }
            match stmt {
                Statement::StructDef(_) | Statement::Global { .. } | Statement::FuncDef(_) => {}
                other => self.lower_statement(other)?,
            }
        }

        if !self.block_terminated {
            self.emit_cleanup()?;
            writeln!(self.output, "  ret i32 0")?;
        }

        Ok(format!(
            "define i32 @main() {{\nentry:\n{}}}\n\n",
            self.output
        ))
    }

    /// Emit one user function (spec.md §4.4.5): a stack slot and
    /// store-on-entry for every scalar/struct parameter, array parameters
    /// passed through as bare pointers, a default zero-valued `ret` if the
    /// body falls off the end without one.
    fn emit_function(&mut self, f: &FuncDef) -> Result<String, CodeGenError> {
        self.begin_function(f.return_type.clone(), false);
        self.setup_alloc_tracker()?;

        let param_decls: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} %arg.{}", llvm_value_type(&p.ty), p.name))
            .collect();

        for p in &f.params {
            let incoming = format!("%arg.{}", p.name);
            if matches!(p.ty, Type::Array(_, _)) {
                self.locals.insert(
                    p.name.clone(),
                    LocalSlot {
                        ptr: incoming,
                        ty: p.ty.clone(),
                        is_direct: true,
                    },
                );
            } else {
                let llvm_ty = llvm_value_type(&p.ty);
                let slot = self.fresh_reg();
                writeln!(self.output, "  {} = alloca {}", slot, llvm_ty)?;
                writeln!(self.output, "  store {} {}, ptr {}", llvm_ty, incoming, slot)?;
                self.locals.insert(
                    p.name.clone(),
                    LocalSlot {
                        ptr: slot,
                        ty: p.ty.clone(),
                        is_direct: false,
                    },
                );
            }
        }

        self.lower_statements(&f.body)?;

        if !self.block_terminated {
            self.emit_cleanup()?;
            if f.return_type == Type::Void {
                writeln!(self.output, "  ret void")?;
            } else {
                let zero = super::expressions::zero_value_literal(&f.return_type);
                writeln!(
                    self.output,
                    "  ret {} {}",
                    llvm_value_type(&f.return_type),
                    zero
                )?;
            }
        }

        let ret_llvm = llvm_value_type(&f.return_type);
        Ok(format!(
            "define {} @{}({}) {{\nentry:\n{}}}\n\n",
            ret_llvm,
            f.name,
            param_decls.join(", "),
            self.output
        ))
    }
}
