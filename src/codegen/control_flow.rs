//! `if`/`while`/`break` lowering (spec.md §4.4.4).

use std::fmt::Write as _;

use super::{CodeGen, CodeGenError};
use crate::ast::{Expr, Statement};

impl CodeGen {
    pub(super) fn lower_if(
        &mut self,
        cond: &Expr,
        then_branch: &[Statement],
        else_branch: &Option<Vec<Statement>>,
    ) -> Result<(), CodeGenError> {
        let (cv, ct) = self.lower_expr(cond)?;
        let cv = self.to_bool(&cv, &ct)?;

        let then_lbl = self.fresh_label("ifthen");
        let else_lbl = self.fresh_label("ifelse");
        let end_lbl = self.fresh_label("ifend");
        let has_else = else_branch.is_some();

        writeln!(
            self.output,
            "  br i1 {}, label %{}, label %{}",
            cv,
            then_lbl,
            if has_else { else_lbl.clone() } else { end_lbl.clone() }
        )?;
        self.block_terminated = true;

        self.open_block(&then_lbl)?;
        self.lower_statements(then_branch)?;
        self.branch_to(&end_lbl)?;

        if let Some(else_stmts) = else_branch {
            self.open_block(&else_lbl)?;
            self.lower_statements(else_stmts)?;
            self.branch_to(&end_lbl)?;
        }

        self.open_block(&end_lbl)
    }

    pub(super) fn lower_while(&mut self, cond: &Expr, body: &[Statement]) -> Result<(), CodeGenError> {
        let cond_lbl = self.fresh_label("whilecond");
        let body_lbl = self.fresh_label("whilebody");
        let end_lbl = self.fresh_label("whileend");

        self.branch_to(&cond_lbl)?;

        self.open_block(&cond_lbl)?;
        let (cv, ct) = self.lower_expr(cond)?;
        let cv = self.to_bool(&cv, &ct)?;
        writeln!(
            self.output,
            "  br i1 {}, label %{}, label %{}",
            cv, body_lbl, end_lbl
        )?;
        self.block_terminated = true;

        self.open_block(&body_lbl)?;
        self.break_stack.push(end_lbl.clone());
        self.lower_statements(body)?;
        self.break_stack.pop();
        self.branch_to(&cond_lbl)?;

        self.open_block(&end_lbl)
    }

    pub(super) fn lower_break(&mut self) -> Result<(), CodeGenError> {
        let target = self
            .break_stack
            .last()
            .cloned()
            .ok_or_else(|| CodeGenError::Logic("'break' used outside of a loop".to_string()))?;
        self.branch_to(&target)
    }

    /// Lower a statement list, stopping early (without erroring) once a
    /// block has already been terminated -- e.g. a `return` partway
    /// through an `if` arm makes the remaining statements in that arm
    /// unreachable, and unreachable MiniLang source is not an error
    /// (spec.md §9).
    pub(super) fn lower_statements(&mut self, stmts: &[Statement]) -> Result<(), CodeGenError> {
        for stmt in stmts {
            if self.block_terminated {
                break;
            }
            self.lower_statement(stmt)?;
        }
        Ok(())
    }
}
