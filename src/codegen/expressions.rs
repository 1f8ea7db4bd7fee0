//! Expression lowering (spec.md §4.4.4).
//!
//! Every lowering routine here returns `(value, ty)`: `value` is the LLVM
//! IR textual operand (a literal, a global name, or an SSA register) ready
//! to be dropped straight into an instruction operand position, and `ty`
//! is the MiniLang type the value carries forward for the caller to act
//! on (pick a format specifier, decide whether a coercion is needed, ...).

use std::fmt::Write as _;

use super::state::ALLOC_TRACKER_CAPACITY;
use super::types::{llvm_type, llvm_value_type};
use super::{CodeGen, CodeGenError};
use crate::ast::{BinOp, Expr};
use crate::types::Type;

impl CodeGen {
    /// Set up this activation's allocation tracker: a zero-length counter
    /// and a fixed-capacity buffer of pointers, both stack-allocated so the
    /// cleanup epilogue can read them from any block (spec.md §5).
    pub(super) fn setup_alloc_tracker(&mut self) -> Result<(), CodeGenError> {
        let buf = self.fresh_reg();
        let count = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = alloca [{} x ptr]",
            buf, ALLOC_TRACKER_CAPACITY
        )?;
        writeln!(self.output, "  {} = alloca i64", count)?;
        writeln!(self.output, "  store i64 0, ptr {}", count)?;
        self.alloc_buf = buf;
        self.alloc_count = count;
        Ok(())
    }

    /// Record a heap pointer for the bulk-free cleanup pass. Appends to the
    /// tracker buffer at the current runtime count, then increments it.
    pub(super) fn track_alloc(&mut self, ptr: &str) -> Result<(), CodeGenError> {
        let idx = self.fresh_reg();
        writeln!(self.output, "  {} = load i64, ptr {}", idx, self.alloc_count)?;
        let slot = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds [{} x ptr], ptr {}, i64 0, i64 {}",
            slot, ALLOC_TRACKER_CAPACITY, self.alloc_buf, idx
        )?;
        writeln!(self.output, "  store ptr {}, ptr {}", ptr, slot)?;
        let next = self.fresh_reg();
        writeln!(self.output, "  {} = add i64 {}, 1", next, idx)?;
        writeln!(self.output, "  store i64 {}, ptr {}", next, self.alloc_count)?;
        Ok(())
    }

    /// Emit the bulk-free loop: `for i in 0..count { free(buf[i]) }`. Safe
    /// to call at more than one exit point (each use gets fresh labels) and
    /// safe regardless of which blocks actually allocated anything, since
    /// it only ever reads from the tracker's own memory.
    pub(super) fn emit_cleanup(&mut self) -> Result<(), CodeGenError> {
        let cond_lbl = self.fresh_label("freecond");
        let body_lbl = self.fresh_label("freebody");
        let end_lbl = self.fresh_label("freeend");
        let count = self.fresh_reg();
        writeln!(self.output, "  {} = load i64, ptr {}", count, self.alloc_count)?;
        let pred = self.current_block.clone();
        self.branch_to(&cond_lbl)?;

        self.open_block(&cond_lbl)?;
        let i = self.fresh_reg();
        let i_next = format!("{}.next", i.trim_start_matches('%'));
        writeln!(
            self.output,
            "  {} = phi i64 [0, %{}], [%{}, %{}]",
            i, pred, i_next, body_lbl
        )?;
        let cond = self.fresh_reg();
        writeln!(self.output, "  {} = icmp slt i64 {}, {}", cond, i, count)?;
        writeln!(
            self.output,
            "  br i1 {}, label %{}, label %{}",
            cond, body_lbl, end_lbl
        )?;
        self.block_terminated = true;

        self.open_block(&body_lbl)?;
        let slot = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds [{} x ptr], ptr {}, i64 0, i64 {}",
            slot, ALLOC_TRACKER_CAPACITY, self.alloc_buf, i
        )?;
        let ptr = self.fresh_reg();
        writeln!(self.output, "  {} = load ptr, ptr {}", ptr, slot)?;
        writeln!(self.output, "  call void @free(ptr {})", ptr)?;
        writeln!(self.output, "  %{} = add i64 {}, 1", i_next, i)?;
        self.branch_to(&cond_lbl)?;

        self.open_block(&end_lbl)
    }

    // ----------------------------------------------------------------
    // Top-level dispatch
    // ----------------------------------------------------------------

    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<(String, Type), CodeGenError> {
        match expr {
            Expr::Int(n) => Ok((n.to_string(), Type::Int)),
            Expr::Float(f) => Ok((format!("{:?}", f), Type::Float)),
            Expr::Str(s) => {
                let g = self.get_string_global(s)?;
                Ok((g, Type::String))
            }
            Expr::Bool(b) => Ok((if *b { "1".to_string() } else { "0".to_string() }, Type::Bool)),
            Expr::Null => Ok(("null".to_string(), Type::Null)),
            Expr::Identifier(name) => self.load_variable(name),
            Expr::ArrayLiteral(elems) => self.lower_array_literal(elems),
            Expr::Zeros(n) => self.lower_zeros(n, &Type::Int),
            Expr::Index { base, index } => self.lower_index(base, index),
            Expr::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs),
            Expr::Not(e) => self.lower_not(e),
            Expr::Cast { ty, expr } => self.lower_cast(ty, expr),
            Expr::Concat(l, r) => {
                let (lv, lt) = self.lower_expr(l)?;
                let (rv, rt) = self.lower_expr(r)?;
                if lt != Type::String || rt != Type::String {
                    return Err(CodeGenError::Logic(
                        "concatenation requires two string operands".to_string(),
                    ));
                }
                self.lower_concat_values(&lv, &rv)
            }
            Expr::RefOf(e) => self.lower_refof(e),
            Expr::FieldAccess { base, field } => self.lower_field_access(base, field),
            Expr::Call { name, args } => self.lower_call(name, args),
            Expr::StructConstructor { name, args } => self.lower_struct_constructor(name, args),
        }
    }

    // ----------------------------------------------------------------
    // Identifiers and lvalues
    // ----------------------------------------------------------------

    /// Declared type of a local, parameter or global, with no IR emitted.
    /// Used by builtins that dispatch on static shape (`length`, `to_str`,
    /// array `print`) rather than on an evaluated value.
    pub(super) fn variable_type(&self, name: &str) -> Result<Type, CodeGenError> {
        if let Some(l) = self.locals.get(name) {
            return Ok(l.ty.clone());
        }
        if let Some(g) = self.globals.get(name) {
            return Ok(g.ty.clone());
        }
        Err(CodeGenError::Logic(format!("undefined variable '{}'", name)))
    }

    /// The address backing a variable: an inline array's own base address,
    /// an array parameter's incoming pointer, a scalar local's `alloca`, or
    /// a global's IR name. Used by `ref` and by assignment targets.
    pub(super) fn variable_address(&self, name: &str) -> Result<(String, Type), CodeGenError> {
        if let Some(l) = self.locals.get(name) {
            return Ok((l.ptr.clone(), l.ty.clone()));
        }
        if let Some(g) = self.globals.get(name) {
            return Ok((g.ir_name.clone(), g.ty.clone()));
        }
        Err(CodeGenError::Logic(format!("undefined variable '{}'", name)))
    }

    /// Identifier load (spec.md §4.4.4 "Identifier load"): locals/params
    /// load from their slot unless it already holds a pointer (inline
    /// arrays decay to their base address; array parameters are already a
    /// pointer value); globals likewise, with inline-array globals decayed
    /// via GEP `[0, 0]`.
    fn load_variable(&mut self, name: &str) -> Result<(String, Type), CodeGenError> {
        if let Some(slot) = self.locals.get(name).cloned() {
            if slot.is_direct || slot.ty.is_inline_array() {
                return Ok((slot.ptr, slot.ty));
            }
            let llvm_ty = llvm_value_type(&slot.ty);
            let reg = self.fresh_reg();
            writeln!(self.output, "  {} = load {}, ptr {}", reg, llvm_ty, slot.ptr)?;
            return Ok((reg, slot.ty));
        }
        if let Some(g) = self.globals.get(name).cloned() {
            if let Type::Array(elem, Some(n)) = &g.ty {
                let array_llvm = format!("[{} x {}]", n, llvm_type(elem));
                let reg = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 0",
                    reg, array_llvm, g.ir_name
                )?;
                return Ok((reg, g.ty.clone()));
            }
            let llvm_ty = llvm_value_type(&g.ty);
            let reg = self.fresh_reg();
            writeln!(self.output, "  {} = load {}, ptr {}", reg, llvm_ty, g.ir_name)?;
            return Ok((reg, g.ty.clone()));
        }
        Err(CodeGenError::Logic(format!("undefined variable '{}'", name)))
    }

    // ----------------------------------------------------------------
    // Array literals, zeros
    // ----------------------------------------------------------------

    fn lower_array_literal(&mut self, elems: &[Expr]) -> Result<(String, Type), CodeGenError> {
        if elems.is_empty() {
            return Err(CodeGenError::Logic("array literal cannot be empty".to_string()));
        }
        let (first_val, elem_ty) = self.lower_expr(&elems[0])?;
        let elem_size = self.scalar_byte_size(&elem_ty)?;
        let bytes = elem_size * elems.len() as u64;
        let raw = self.fresh_reg();
        writeln!(self.output, "  {} = call ptr @malloc(i64 {})", raw, bytes)?;
        self.track_alloc(&raw)?;

        let elem_llvm = llvm_value_type(&elem_ty);
        self.store_array_element(&raw, &elem_llvm, 0, &first_val)?;
        for (i, e) in elems.iter().enumerate().skip(1) {
            let (val, ty) = self.lower_expr(e)?;
            let val = self.coerce_value(&val, &ty, &elem_ty)?;
            self.store_array_element(&raw, &elem_llvm, i as u64, &val)?;
        }
        Ok((raw, Type::Array(Box::new(elem_ty), None)))
    }

    fn store_array_element(
        &mut self,
        base: &str,
        elem_llvm: &str,
        index: u64,
        value: &str,
    ) -> Result<(), CodeGenError> {
        let slot = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds {}, ptr {}, i64 {}",
            slot, elem_llvm, base, index
        )?;
        writeln!(self.output, "  store {} {}, ptr {}", elem_llvm, value, slot)?;
        Ok(())
    }

    /// Heap-backed `zeros(n)` with no declared-type context: defaults the
    /// element type to `int` (no annotation is available to say otherwise)
    /// and supports a runtime-valued `n` via an actual zeroing loop, since
    /// the resulting size can't be unrolled at compile time.
    fn lower_zeros(&mut self, n: &Expr, elem_ty: &Type) -> Result<(String, Type), CodeGenError> {
        let (n_val, n_ty) = self.lower_expr(n)?;
        let n_val = self.coerce_value(&n_val, &n_ty, &Type::Int)?;
        let elem_size = self.scalar_byte_size(elem_ty)?;
        let bytes = self.fresh_reg();
        writeln!(self.output, "  {} = mul i64 {}, {}", bytes, n_val, elem_size)?;
        let raw = self.fresh_reg();
        writeln!(self.output, "  {} = call ptr @malloc(i64 {})", raw, bytes)?;
        self.track_alloc(&raw)?;
        self.emit_zero_fill_loop(&raw, elem_ty, &n_val)?;
        Ok((raw, Type::Array(Box::new(elem_ty.clone()), None)))
    }

    fn emit_zero_fill_loop(
        &mut self,
        buf: &str,
        elem_ty: &Type,
        n_val: &str,
    ) -> Result<(), CodeGenError> {
        let cond_lbl = self.fresh_label("zeroscond");
        let body_lbl = self.fresh_label("zerosbody");
        let end_lbl = self.fresh_label("zerosend");
        let pred = self.current_block.clone();
        self.branch_to(&cond_lbl)?;

        self.open_block(&cond_lbl)?;
        let i = self.fresh_reg();
        let i_next = format!("{}.next", i.trim_start_matches('%'));
        writeln!(
            self.output,
            "  {} = phi i64 [0, %{}], [%{}, %{}]",
            i, pred, i_next, body_lbl
        )?;
        let cond = self.fresh_reg();
        writeln!(self.output, "  {} = icmp slt i64 {}, {}", cond, i, n_val)?;
        writeln!(
            self.output,
            "  br i1 {}, label %{}, label %{}",
            cond, body_lbl, end_lbl
        )?;
        self.block_terminated = true;

        self.open_block(&body_lbl)?;
        let elem_llvm = llvm_value_type(elem_ty);
        let slot = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds {}, ptr {}, i64 {}",
            slot, elem_llvm, buf, i
        )?;
        writeln!(
            self.output,
            "  store {} {}, ptr {}",
            elem_llvm,
            zero_value_literal(elem_ty),
            slot
        )?;
        writeln!(self.output, "  %{} = add i64 {}, 1", i_next, i)?;
        self.branch_to(&cond_lbl)?;

        self.open_block(&end_lbl)
    }

    /// Initialize a `let`/`global` whose declared type is a fixed-size
    /// inline array directly into its stack slot, skipping the heap path
    /// entirely: there is no sense allocating a temporary buffer only to
    /// copy it into the already-reserved inline storage.
    pub(super) fn init_inline_array(
        &mut self,
        slot: &str,
        elem: &Type,
        n: u64,
        value: &Expr,
    ) -> Result<(), CodeGenError> {
        let array_llvm = format!("[{} x {}]", n, llvm_type(elem));
        let elem_llvm = llvm_value_type(elem);
        match value {
            Expr::ArrayLiteral(elems) => {
                if elems.len() as u64 != n {
                    return Err(CodeGenError::Logic(format!(
                        "array literal has {} elements, expected {}",
                        elems.len(),
                        n
                    )));
                }
                for (i, e) in elems.iter().enumerate() {
                    let (val, ty) = self.lower_expr(e)?;
                    let val = self.coerce_value(&val, &ty, elem)?;
                    let gep = self.fresh_reg();
                    writeln!(
                        self.output,
                        "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 {}",
                        gep, array_llvm, slot, i
                    )?;
                    writeln!(self.output, "  store {} {}, ptr {}", elem_llvm, val, gep)?;
                }
            }
            Expr::Zeros(_) => {
                for i in 0..n {
                    let gep = self.fresh_reg();
                    writeln!(
                        self.output,
                        "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 {}",
                        gep, array_llvm, slot, i
                    )?;
                    writeln!(
                        self.output,
                        "  store {} {}, ptr {}",
                        elem_llvm,
                        zero_value_literal(elem),
                        gep
                    )?;
                }
            }
            other => {
                return Err(CodeGenError::Logic(format!(
                    "inline array initializer must be a literal or zeros(), found {:?}",
                    other
                )))
            }
        }
        Ok(())
    }

    // ----------------------------------------------------------------
    // Array/string indexing
    // ----------------------------------------------------------------

    fn lower_index_value(&mut self, index: &Expr) -> Result<String, CodeGenError> {
        let (v, ty) = self.lower_expr(index)?;
        self.coerce_value(&v, &ty, &Type::Int)
    }

    fn lower_index(&mut self, base: &Expr, index: &Expr) -> Result<(String, Type), CodeGenError> {
        let (base_val, base_ty) = self.lower_expr(base)?;
        let idx_val = self.lower_index_value(index)?;
        match &base_ty {
            Type::String => {
                let slot = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds i8, ptr {}, i64 {}",
                    slot, base_val, idx_val
                )?;
                let byte = self.fresh_reg();
                writeln!(self.output, "  {} = load i8, ptr {}", byte, slot)?;
                let widened = self.fresh_reg();
                writeln!(self.output, "  {} = zext i8 {} to i64", widened, byte)?;
                Ok((widened, Type::Int))
            }
            Type::Array(elem, Some(n)) => {
                let array_llvm = format!("[{} x {}]", n, llvm_type(elem));
                let slot = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 {}",
                    slot, array_llvm, base_val, idx_val
                )?;
                self.load_elem(&slot, elem)
            }
            Type::Array(elem, None) => {
                let elem_llvm = llvm_value_type(elem);
                let slot = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds {}, ptr {}, i64 {}",
                    slot, elem_llvm, base_val, idx_val
                )?;
                self.load_elem(&slot, elem)
            }
            other => Err(CodeGenError::Logic(format!(
                "cannot index into a value of type {}",
                other.describe()
            ))),
        }
    }

    fn load_elem(&mut self, slot: &str, elem: &Type) -> Result<(String, Type), CodeGenError> {
        let elem_llvm = llvm_value_type(elem);
        let reg = self.fresh_reg();
        writeln!(self.output, "  {} = load {}, ptr {}", reg, elem_llvm, slot)?;
        Ok((reg, elem.clone()))
    }

    /// Resolve an `ArrayAssignTarget`/array-`print` base to its backing
    /// pointer and array element type/size, navigating one struct field
    /// when given the dotted `var.field` form.
    pub(super) fn array_base(
        &mut self,
        target: &crate::ast::ArrayAssignTarget,
    ) -> Result<(String, Type, Option<u64>), CodeGenError> {
        use crate::ast::ArrayAssignTarget;
        let (ptr, ty) = match target {
            ArrayAssignTarget::Var(name) => self.load_variable(name)?,
            ArrayAssignTarget::Field { base, field } => {
                let (sptr, sname) = self.struct_pointer_of(&Expr::Identifier(base.clone()))?;
                let layout = self.struct_registry.get(&sname)?.clone();
                let (_, fty, _) = layout
                    .field(field)
                    .cloned()
                    .ok_or_else(|| CodeGenError::Logic(format!("undefined field '{}'", field)))?;
                let idx = layout.field_index(field).unwrap();
                let gep = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds %struct.{}, ptr {}, i32 0, i32 {}",
                    gep, sname, sptr, idx
                )?;
                match &fty {
                    Type::Array(_, Some(_)) => (gep, fty),
                    _ => {
                        let loaded = self.fresh_reg();
                        writeln!(
                            self.output,
                            "  {} = load {}, ptr {}",
                            loaded,
                            llvm_value_type(&fty),
                            gep
                        )?;
                        (loaded, fty)
                    }
                }
            }
        };
        match ty {
            Type::Array(elem, size) => Ok((ptr, *elem, size)),
            other => Err(CodeGenError::Logic(format!(
                "expected an array, found {}",
                other.describe()
            ))),
        }
    }

    pub(super) fn lower_array_assign(
        &mut self,
        target: &crate::ast::ArrayAssignTarget,
        index: &Expr,
        value: &Expr,
    ) -> Result<(), CodeGenError> {
        let (base_val, elem, size) = self.array_base(target)?;
        let idx_val = self.lower_index_value(index)?;
        let elem_llvm = llvm_value_type(&elem);
        let slot = self.fresh_reg();
        match size {
            Some(n) => {
                let array_llvm = format!("[{} x {}]", n, llvm_type(&elem));
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds {}, ptr {}, i64 0, i64 {}",
                    slot, array_llvm, base_val, idx_val
                )?;
            }
            None => {
                writeln!(
                    self.output,
                    "  {} = getelementptr inbounds {}, ptr {}, i64 {}",
                    slot, elem_llvm, base_val, idx_val
                )?;
            }
        }
        let (val, val_ty) = self.lower_expr(value)?;
        let val = self.coerce_value(&val, &val_ty, &elem)?;
        writeln!(self.output, "  store {} {}, ptr {}", elem_llvm, val, slot)?;
        Ok(())
    }

    // ----------------------------------------------------------------
    // Struct field access/assignment, struct constructor
    // ----------------------------------------------------------------

    /// Resolve `expr` to a struct pointer value and the name of the struct
    /// it points to, whatever shape `expr` has (identifier, nested field
    /// access, call, ...). Reference-to-struct values are already the raw
    /// pointer under opaque pointers, so no bitcast is needed here.
    pub(super) fn struct_pointer_of(&mut self, expr: &Expr) -> Result<(String, String), CodeGenError> {
        let (val, ty) = self.lower_expr(expr)?;
        match ty {
            Type::Struct(s) => Ok((val, s.name)),
            Type::Reference(inner) => match *inner {
                Type::Struct(s) => Ok((val, s.name)),
                other => Err(CodeGenError::Logic(format!(
                    "expected a reference to a struct, found ref {}",
                    other.describe()
                ))),
            },
            other => Err(CodeGenError::Logic(format!(
                "field access on a non-struct value of type {}",
                other.describe()
            ))),
        }
    }

    fn lower_field_access(&mut self, base: &Expr, field: &str) -> Result<(String, Type), CodeGenError> {
        let (ptr, sname) = self.struct_pointer_of(base)?;
        let layout = self.struct_registry.get(&sname)?.clone();
        let (_, fty, _) = layout
            .field(field)
            .cloned()
            .ok_or_else(|| CodeGenError::Logic(format!("struct '{}' has no field '{}'", sname, field)))?;
        let idx = layout.field_index(field).unwrap();
        let field_llvm = llvm_type(&fty);
        let gep = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds %struct.{}, ptr {}, i32 0, i32 {}",
            gep, sname, ptr, idx
        )?;
        match &fty {
            Type::Struct(_) | Type::Array(_, Some(_)) => Ok((gep, fty)),
            _ => {
                let val = self.fresh_reg();
                writeln!(self.output, "  {} = load {}, ptr {}", val, field_llvm, gep)?;
                Ok((val, fty))
            }
        }
    }

    /// `base.path[0].path[1]... = value` (spec.md §4.4.4 "Struct field
    /// assignment"). Every field but the last is navigated; an
    /// intermediate `ref Struct` field that is currently null is
    /// auto-allocated, stored back into the parent, and used as the
    /// navigation pointer going forward, merged via `phi` with the
    /// already-non-null case.
    pub(super) fn lower_field_assign(
        &mut self,
        base: &str,
        path: &[String],
        value: &Expr,
    ) -> Result<(), CodeGenError> {
        let (mut ptr, mut sname) = self.struct_pointer_of(&Expr::Identifier(base.to_string()))?;

        for field in &path[..path.len() - 1] {
            let layout = self.struct_registry.get(&sname)?.clone();
            let (_, fty, _) = layout.field(field).cloned().ok_or_else(|| {
                CodeGenError::Logic(format!("struct '{}' has no field '{}'", sname, field))
            })?;
            let idx = layout.field_index(field).unwrap();
            let gep = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = getelementptr inbounds %struct.{}, ptr {}, i32 0, i32 {}",
                gep, sname, ptr, idx
            )?;
            match &fty {
                Type::Reference(inner) => {
                    let target_name = match inner.as_ref() {
                        Type::Struct(s) => s.name.clone(),
                        other => {
                            return Err(CodeGenError::Logic(format!(
                                "intermediate field '{}' is a reference to {}, not a struct",
                                field,
                                other.describe()
                            )))
                        }
                    };
                    let loaded = self.fresh_reg();
                    writeln!(self.output, "  {} = load ptr, ptr {}", loaded, gep)?;
                    let is_null = self.fresh_reg();
                    writeln!(self.output, "  {} = icmp eq ptr {}, null", is_null, loaded)?;

                    let alloc_lbl = self.fresh_label("autoalloc");
                    let merge_lbl = self.fresh_label("autoallocmerge");
                    let pre_lbl = self.current_block.clone();
                    writeln!(
                        self.output,
                        "  br i1 {}, label %{}, label %{}",
                        is_null, alloc_lbl, merge_lbl
                    )?;
                    self.block_terminated = true;

                    self.open_block(&alloc_lbl)?;
                    let target_layout = self.struct_registry.get(&target_name)?.clone();
                    let raw = self.fresh_reg();
                    writeln!(
                        self.output,
                        "  {} = call ptr @malloc(i64 {})",
                        raw, target_layout.size
                    )?;
                    self.track_alloc(&raw)?;
                    writeln!(self.output, "  store ptr {}, ptr {}", raw, gep)?;
                    self.branch_to(&merge_lbl)?;

                    self.open_block(&merge_lbl)?;
                    let merged = self.fresh_reg();
                    writeln!(
                        self.output,
                        "  {} = phi ptr [ {}, %{} ], [ {}, %{} ]",
                        merged, raw, alloc_lbl, loaded, pre_lbl
                    )?;
                    ptr = merged;
                    sname = target_name;
                }
                Type::Struct(s) => {
                    ptr = gep;
                    sname = s.name.clone();
                }
                other => {
                    return Err(CodeGenError::Logic(format!(
                        "intermediate field '{}' is not a struct or a reference to one (found {})",
                        field,
                        other.describe()
                    )))
                }
            }
        }

        let last = path.last().expect("FieldAssign path is never empty");
        let layout = self.struct_registry.get(&sname)?.clone();
        let (_, fty, _) = layout
            .field(last)
            .cloned()
            .ok_or_else(|| CodeGenError::Logic(format!("struct '{}' has no field '{}'", sname, last)))?;
        let idx = layout.field_index(last).unwrap();
        let field_llvm = llvm_type(&fty);
        let gep = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = getelementptr inbounds %struct.{}, ptr {}, i32 0, i32 {}",
            gep, sname, ptr, idx
        )?;
        let (val, val_ty) = self.lower_expr(value)?;
        let val = self.coerce_value(&val, &val_ty, &fty)?;
        writeln!(self.output, "  store {} {}, ptr {}", field_llvm, val, gep)?;
        Ok(())
    }

    fn lower_struct_constructor(&mut self, name: &str, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        let layout = self.struct_registry.get(name)?.clone();
        if args.len() != layout.fields.len() {
            return Err(CodeGenError::Logic(format!(
                "struct '{}' expects {} field(s), found {} argument(s)",
                name,
                layout.fields.len(),
                args.len()
            )));
        }
        let raw = self.fresh_reg();
        writeln!(self.output, "  {} = call ptr @malloc(i64 {})", raw, layout.size)?;
        self.track_alloc(&raw)?;

        for (i, ((_, fty, _), arg)) in layout.fields.iter().zip(args.iter()).enumerate() {
            let (val, val_ty) = self.lower_expr(arg)?;
            let val = self.coerce_value(&val, &val_ty, fty)?;
            let gep = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = getelementptr inbounds %struct.{}, ptr {}, i32 0, i32 {}",
                gep, name, raw, i
            )?;
            writeln!(self.output, "  store {} {}, ptr {}", llvm_type(fty), val, gep)?;
        }

        let fields = layout
            .fields
            .iter()
            .map(|(n, t, _)| (n.clone(), t.clone()))
            .collect();
        Ok((
            raw,
            Type::Struct(crate::types::StructType {
                name: name.to_string(),
                fields,
            }),
        ))
    }

    // ----------------------------------------------------------------
    // ref-of, casts, concatenation
    // ----------------------------------------------------------------

    fn lower_refof(&mut self, expr: &Expr) -> Result<(String, Type), CodeGenError> {
        if let Expr::Identifier(name) = expr {
            let (addr, ty) = self.variable_address(name)?;
            if ty.is_pointer_like() {
                let (v, t) = self.load_variable(name)?;
                return Ok((v, Type::Reference(Box::new(t))));
            }
            return Ok((addr, Type::Reference(Box::new(ty))));
        }
        let (v, ty) = self.lower_expr(expr)?;
        Ok((v, Type::Reference(Box::new(ty))))
    }

    fn lower_cast(&mut self, ty: &Type, expr: &Expr) -> Result<(String, Type), CodeGenError> {
        let (val, src) = self.lower_expr(expr)?;
        match ty {
            Type::Int => match src {
                Type::Int => Ok((val, Type::Int)),
                Type::Float => {
                    let reg = self.fresh_reg();
                    writeln!(self.output, "  {} = fptosi double {} to i64", reg, val)?;
                    Ok((reg, Type::Int))
                }
                // Preserved quirk (spec.md §9): casting a string to int is a
                // stub that always returns 0, not an error.
                Type::String => Ok(("0".to_string(), Type::Int)),
                other => Err(CodeGenError::Logic(format!(
                    "unsupported cast source {} for int",
                    other.describe()
                ))),
            },
            Type::Float => match src {
                Type::Float => Ok((val, Type::Float)),
                Type::Int => {
                    let reg = self.fresh_reg();
                    writeln!(self.output, "  {} = sitofp i64 {} to double", reg, val)?;
                    Ok((reg, Type::Float))
                }
                other => Err(CodeGenError::Logic(format!(
                    "unsupported cast source {} for float",
                    other.describe()
                ))),
            },
            Type::String => match src {
                Type::String => Ok((val, Type::String)),
                Type::Int => self.sprintf_to_string("%lld", "i64", &val),
                Type::Float => self.sprintf_to_string("%f", "double", &val),
                other => Err(CodeGenError::Logic(format!(
                    "unsupported cast source {} for string",
                    other.describe()
                ))),
            },
            Type::Bool => {
                let b = self.to_bool(&val, &src)?;
                Ok((b, Type::Bool))
            }
            other => Err(CodeGenError::Logic(format!(
                "unsupported cast target {}",
                other.describe()
            ))),
        }
    }

    fn sprintf_to_string(
        &mut self,
        fmt: &str,
        llvm_arg_ty: &str,
        val: &str,
    ) -> Result<(String, Type), CodeGenError> {
        let fmt_global = self.get_string_global(fmt)?;
        let buf = self.fresh_reg();
        writeln!(self.output, "  {} = call ptr @malloc(i64 256)", buf)?;
        self.track_alloc(&buf)?;
        let discard = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = call i32 (ptr, ptr, ...) @sprintf(ptr {}, ptr {}, {} {})",
            discard, buf, fmt_global, llvm_arg_ty, val
        )?;
        Ok((buf, Type::String))
    }

    fn lower_concat_values(&mut self, lv: &str, rv: &str) -> Result<(String, Type), CodeGenError> {
        let llen = self.fresh_reg();
        writeln!(self.output, "  {} = call i64 @strlen(ptr {})", llen, lv)?;
        let rlen = self.fresh_reg();
        writeln!(self.output, "  {} = call i64 @strlen(ptr {})", rlen, rv)?;
        let sum = self.fresh_reg();
        writeln!(self.output, "  {} = add i64 {}, {}", sum, llen, rlen)?;
        let total = self.fresh_reg();
        writeln!(self.output, "  {} = add i64 {}, 1", total, sum)?;
        let buf = self.fresh_reg();
        writeln!(self.output, "  {} = call ptr @malloc(i64 {})", buf, total)?;
        self.track_alloc(&buf)?;
        let discard1 = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = call ptr @strcpy(ptr {}, ptr {})",
            discard1, buf, lv
        )?;
        let discard2 = self.fresh_reg();
        writeln!(
            self.output,
            "  {} = call ptr @strcat(ptr {}, ptr {})",
            discard2, buf, rv
        )?;
        Ok((buf, Type::String))
    }

    // ----------------------------------------------------------------
    // Arithmetic, comparisons, logical ops
    // ----------------------------------------------------------------

    fn lower_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<(String, Type), CodeGenError> {
        if matches!(op, BinOp::And | BinOp::Or) {
            let (lv, lt) = self.lower_expr(lhs)?;
            let lb = self.to_bool(&lv, &lt)?;
            let (rv, rt) = self.lower_expr(rhs)?;
            let rb = self.to_bool(&rv, &rt)?;
            let reg = self.fresh_reg();
            let inst = if op == BinOp::And { "and" } else { "or" };
            writeln!(self.output, "  {} = {} i1 {}, {}", reg, inst, lb, rb)?;
            return Ok((reg, Type::Bool));
        }

        let (lv, lt) = self.lower_expr(lhs)?;
        let (rv, rt) = self.lower_expr(rhs)?;

        if op == BinOp::Add && lt == Type::String && rt == Type::String {
            return self.lower_concat_values(&lv, &rv);
        }
        if lt == Type::String || rt == Type::String {
            return Err(CodeGenError::Logic(format!(
                "unsupported operator on types {} and {}",
                lt.describe(),
                rt.describe()
            )));
        }

        if matches!(op, BinOp::Gt | BinOp::Lt | BinOp::Ge | BinOp::Le | BinOp::Eq | BinOp::Ne) {
            return self.lower_comparison(op, &lv, &lt, &rv, &rt);
        }

        let is_float = lt == Type::Float || rt == Type::Float;
        if is_float {
            let lv = self.coerce_value(&lv, &lt, &Type::Float)?;
            let rv = self.coerce_value(&rv, &rt, &Type::Float)?;
            let reg = self.fresh_reg();
            match op {
                BinOp::Add => writeln!(self.output, "  {} = fadd double {}, {}", reg, lv, rv)?,
                BinOp::Sub => writeln!(self.output, "  {} = fsub double {}, {}", reg, lv, rv)?,
                BinOp::Mul => writeln!(self.output, "  {} = fmul double {}, {}", reg, lv, rv)?,
                BinOp::Div => writeln!(self.output, "  {} = fdiv double {}, {}", reg, lv, rv)?,
                BinOp::Mod => writeln!(
                    self.output,
                    "  {} = call double @fmod(double {}, double {})",
                    reg, lv, rv
                )?,
                _ => unreachable!(),
            }
            Ok((reg, Type::Float))
        } else {
            let reg = self.fresh_reg();
            match op {
                BinOp::Add => writeln!(self.output, "  {} = add i64 {}, {}", reg, lv, rv)?,
                BinOp::Sub => writeln!(self.output, "  {} = sub i64 {}, {}", reg, lv, rv)?,
                BinOp::Mul => writeln!(self.output, "  {} = mul i64 {}, {}", reg, lv, rv)?,
                BinOp::Div => writeln!(self.output, "  {} = sdiv i64 {}, {}", reg, lv, rv)?,
                BinOp::Mod => writeln!(self.output, "  {} = srem i64 {}, {}", reg, lv, rv)?,
                _ => unreachable!(),
            }
            Ok((reg, Type::Int))
        }
    }

    fn lower_comparison(
        &mut self,
        op: BinOp,
        lv: &str,
        lt: &Type,
        rv: &str,
        rt: &Type,
    ) -> Result<(String, Type), CodeGenError> {
        let reg = self.fresh_reg();
        if lt == &Type::Float || rt == &Type::Float {
            let lv = self.coerce_value(lv, lt, &Type::Float)?;
            let rv = self.coerce_value(rv, rt, &Type::Float)?;
            let pred = match op {
                BinOp::Gt => "ogt",
                BinOp::Lt => "olt",
                BinOp::Ge => "oge",
                BinOp::Le => "ole",
                BinOp::Eq => "oeq",
                BinOp::Ne => "one",
                _ => unreachable!(),
            };
            writeln!(self.output, "  {} = fcmp {} double {}, {}", reg, pred, lv, rv)?;
            return Ok((reg, Type::Bool));
        }

        if lt.is_pointer_like() || rt.is_pointer_like() || *lt == Type::Null || *rt == Type::Null {
            let pred = match op {
                BinOp::Eq => "eq",
                BinOp::Ne => "ne",
                _ => "ne",
            };
            writeln!(self.output, "  {} = icmp {} ptr {}, {}", reg, pred, lv, rv)?;
            return Ok((reg, Type::Bool));
        }

        // Preserved quirk (spec.md §9): comparing `bool` against a wider
        // integer coerces the wider side down to `bool` via a `!= 0` test,
        // rather than widening the `bool` side up.
        if (lt == &Type::Bool) != (rt == &Type::Bool) {
            let (lv, rv) = if lt == &Type::Bool {
                let rv_b = self.fresh_reg();
                writeln!(self.output, "  {} = icmp ne i64 {}, 0", rv_b, rv)?;
                (lv.to_string(), rv_b)
            } else {
                let lv_b = self.fresh_reg();
                writeln!(self.output, "  {} = icmp ne i64 {}, 0", lv_b, lv)?;
                (lv_b, rv.to_string())
            };
            let pred = match op {
                BinOp::Eq => "eq",
                BinOp::Ne => "ne",
                _ => "ne",
            };
            writeln!(self.output, "  {} = icmp {} i1 {}, {}", reg, pred, lv, rv)?;
            return Ok((reg, Type::Bool));
        }

        let width = if *lt == Type::Bool { "i1" } else { "i64" };
        let pred = match op {
            BinOp::Gt => "sgt",
            BinOp::Lt => "slt",
            BinOp::Ge => "sge",
            BinOp::Le => "sle",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            _ => unreachable!(),
        };
        writeln!(self.output, "  {} = icmp {} {} {}, {}", reg, pred, width, lv, rv)?;
        Ok((reg, Type::Bool))
    }

    fn lower_not(&mut self, expr: &Expr) -> Result<(String, Type), CodeGenError> {
        let (v, ty) = self.lower_expr(expr)?;
        let b = self.to_bool(&v, &ty)?;
        let reg = self.fresh_reg();
        writeln!(self.output, "  {} = xor i1 {}, true", reg, b)?;
        Ok((reg, Type::Bool))
    }

    /// Coerce `val` of type `ty` to `i1`, per spec.md §4.4.4's cast-to-bool
    /// rule, reused for `if`/`while` conditions and `&`/`|`/`!`.
    pub(super) fn to_bool(&mut self, val: &str, ty: &Type) -> Result<String, CodeGenError> {
        match ty {
            Type::Bool => Ok(val.to_string()),
            Type::Int => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = icmp ne i64 {}, 0", reg, val)?;
                Ok(reg)
            }
            Type::Float => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = fcmp one double {}, 0.0", reg, val)?;
                Ok(reg)
            }
            other if other.is_pointer_like() || *other == Type::Null => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = icmp ne ptr {}, null", reg, val)?;
                Ok(reg)
            }
            other => Err(CodeGenError::Logic(format!(
                "cannot use a value of type {} as a condition",
                other.describe()
            ))),
        }
    }

    // ----------------------------------------------------------------
    // Calls: builtins, raw libc passthroughs, user functions
    // ----------------------------------------------------------------

    fn lower_call(&mut self, name: &str, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        match name {
            "to_str" => self.lower_to_str(args),
            "array_to_str" => self.lower_array_to_str(args),
            "to_int" => {
                let (v, ty) = self.lower_expr(&args[0])?;
                let v = self.coerce_value(&v, &ty, &Type::Float)?;
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call i64 @to_int(double {})", reg, v)?;
                Ok((reg, Type::Int))
            }
            "to_float" => {
                let (v, ty) = self.lower_expr(&args[0])?;
                let v = self.coerce_value(&v, &ty, &Type::Int)?;
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call double @to_float(i64 {})", reg, v)?;
                Ok((reg, Type::Float))
            }
            "ord" => {
                let (v, ty) = self.lower_expr(&args[0])?;
                match ty {
                    Type::String => {
                        let byte = self.fresh_reg();
                        writeln!(self.output, "  {} = load i8, ptr {}", byte, v)?;
                        let reg = self.fresh_reg();
                        writeln!(self.output, "  {} = zext i8 {} to i64", reg, byte)?;
                        Ok((reg, Type::Int))
                    }
                    Type::Int => Ok((v, Type::Int)),
                    other => Err(CodeGenError::Logic(format!(
                        "ord() expects a string or byte, found {}",
                        other.describe()
                    ))),
                }
            }
            "length" => {
                if let Expr::Identifier(name) = &args[0] {
                    match self.variable_type(name)? {
                        Type::Array(_, Some(n)) => Ok((n.to_string(), Type::Int)),
                        Type::Array(_, None) => Ok(("0".to_string(), Type::Int)),
                        other => Err(CodeGenError::Logic(format!(
                            "length() expects an array, found {}",
                            other.describe()
                        ))),
                    }
                } else {
                    Err(CodeGenError::Logic(
                        "length() requires an array identifier argument".to_string(),
                    ))
                }
            }
            _ if super::runtime::is_libc_passthrough(name) => self.lower_libc_call(name, args),
            _ if self.struct_registry.contains(name) => self.lower_struct_constructor(name, args),
            _ => self.lower_user_call(name, args),
        }
    }

    fn lower_to_str(&mut self, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        if let Expr::Identifier(name) = &args[0] {
            if let Type::Array(elem, size) = self.variable_type(name)? {
                return self.array_to_str(name, &elem, size);
            }
        }
        let (v, ty) = self.lower_expr(&args[0])?;
        match ty {
            Type::Int => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call ptr @to_str_int(i64 {})", reg, v)?;
                self.track_alloc(&reg)?;
                Ok((reg, Type::String))
            }
            Type::Float => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call ptr @to_str_float(double {})", reg, v)?;
                self.track_alloc(&reg)?;
                Ok((reg, Type::String))
            }
            other => Err(CodeGenError::Logic(format!(
                "to_str() does not support {}",
                other.describe()
            ))),
        }
    }

    fn lower_array_to_str(&mut self, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        let name = match &args[0] {
            Expr::Identifier(name) => name.clone(),
            _ => {
                return Err(CodeGenError::Logic(
                    "array_to_str() requires an array identifier argument".to_string(),
                ))
            }
        };
        match self.variable_type(&name)? {
            Type::Array(elem, size) => self.array_to_str(&name, &elem, size),
            other => Err(CodeGenError::Logic(format!(
                "array_to_str() expects an array, found {}",
                other.describe()
            ))),
        }
    }

    fn array_to_str(&mut self, name: &str, elem: &Type, size: Option<u64>) -> Result<(String, Type), CodeGenError> {
        let (ptr, _) = self.load_variable(name)?;
        let n = size.unwrap_or(0);
        let reg = self.fresh_reg();
        match elem {
            Type::Int => writeln!(
                self.output,
                "  {} = call ptr @array_to_str_int(ptr {}, i64 {})",
                reg, ptr, n
            )?,
            Type::Float => writeln!(
                self.output,
                "  {} = call ptr @array_to_str_float(ptr {}, i64 {})",
                reg, ptr, n
            )?,
            other => {
                return Err(CodeGenError::Logic(format!(
                    "array_to_str() does not support arrays of {}",
                    other.describe()
                )))
            }
        }
        self.track_alloc(&reg)?;
        Ok((reg, Type::String))
    }

    fn lower_libc_call(&mut self, name: &str, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        let mut arg_strs = Vec::with_capacity(args.len());
        for a in args {
            let (v, ty) = self.lower_expr(a)?;
            arg_strs.push(format!("{} {}", llvm_value_type(&ty), v));
        }
        let joined = arg_strs.join(", ");
        match name {
            "printf" => {
                let reg = self.fresh_reg();
                writeln!(
                    self.output,
                    "  {} = call i32 (ptr, ...) @printf({})",
                    reg, joined
                )?;
                Ok((reg, Type::Int))
            }
            "malloc" => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call ptr @malloc({})", reg, joined)?;
                Ok((reg, Type::Array(Box::new(Type::Int), None)))
            }
            "free" => {
                writeln!(self.output, "  call void @free({})", joined)?;
                Ok(("0".to_string(), Type::Void))
            }
            "strlen" => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call i64 @strlen({})", reg, joined)?;
                Ok((reg, Type::Int))
            }
            "strcpy" | "strcat" => {
                let reg = self.fresh_reg();
                writeln!(self.output, "  {} = call ptr @{}({})", reg, name, joined)?;
                Ok((reg, Type::String))
            }
            _ => unreachable!("is_libc_passthrough() and this match must agree"),
        }
    }

    fn lower_user_call(&mut self, name: &str, args: &[Expr]) -> Result<(String, Type), CodeGenError> {
        let sig = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| CodeGenError::Logic(format!("undefined function '{}'", name)))?;
        if args.len() != sig.params.len() {
            return Err(CodeGenError::Logic(format!(
                "function '{}' expects {} argument(s), found {}",
                name,
                sig.params.len(),
                args.len()
            )));
        }
        let mut arg_strs = Vec::with_capacity(args.len());
        for (a, pty) in args.iter().zip(sig.params.iter()) {
            let (v, ty) = self.lower_expr(a)?;
            let v = self.coerce_value(&v, &ty, pty)?;
            arg_strs.push(format!("{} {}", llvm_value_type(pty), v));
        }
        let joined = arg_strs.join(", ");
        if sig.return_type == Type::Void {
            writeln!(self.output, "  call void @{}({})", name, joined)?;
            Ok(("0".to_string(), Type::Void))
        } else {
            let reg = self.fresh_reg();
            writeln!(
                self.output,
                "  {} = call {} @{}({})",
                reg,
                llvm_value_type(&sig.return_type),
                name,
                joined
            )?;
            Ok((reg, sig.return_type))
        }
    }

    // ----------------------------------------------------------------
    // Coercion, sizing
    // ----------------------------------------------------------------

    /// Adapt a value already lowered as `from` to be usable where `to` is
    /// expected. Under opaque pointers, any pointer-like-to-pointer-like
    /// coercion (including `null`) is a pure no-op; the only real
    /// conversion handled here is int-to-float promotion.
    pub(super) fn coerce_value(&mut self, val: &str, from: &Type, to: &Type) -> Result<String, CodeGenError> {
        if from == to {
            return Ok(val.to_string());
        }
        if *from == Type::Int && *to == Type::Float {
            let reg = self.fresh_reg();
            writeln!(self.output, "  {} = sitofp i64 {} to double", reg, val)?;
            return Ok(reg);
        }
        Ok(val.to_string())
    }

    /// Natural size in bytes of a scalar-ish value type, used to size
    /// `malloc` calls for array literals, `zeros()`, and struct fields of
    /// array type.
    pub(super) fn scalar_byte_size(&self, ty: &Type) -> Result<u64, CodeGenError> {
        match ty {
            Type::Int | Type::Float => Ok(8),
            Type::Bool => Ok(1),
            Type::String | Type::Reference(_) | Type::Array(_, None) | Type::Null => Ok(8),
            Type::Struct(s) => Ok(self.struct_registry.get(&s.name)?.size),
            Type::Array(elem, Some(n)) => Ok(self.scalar_byte_size(elem)? * n),
            other => Err(CodeGenError::Logic(format!(
                "type {} has no well-defined element size",
                other.describe()
            ))),
        }
    }
}

/// Constant-fold a binary op over two already-folded literal operands
/// (spec.md §4.2 "literals and arithmetic over literals"). Used only for
/// global initializers; division/modulo by a literal zero is not
/// constant-foldable and falls back to the deferred-initializer path.
pub(super) fn fold_const_binary(op: BinOp, l: &Expr, r: &Expr) -> Option<Expr> {
    if let (Expr::Int(a), Expr::Int(b)) = (l, r) {
        return match op {
            BinOp::Add => Some(Expr::Int(a.wrapping_add(*b))),
            BinOp::Sub => Some(Expr::Int(a.wrapping_sub(*b))),
            BinOp::Mul => Some(Expr::Int(a.wrapping_mul(*b))),
            BinOp::Div if *b != 0 => Some(Expr::Int(a / b)),
            BinOp::Mod if *b != 0 => Some(Expr::Int(a % b)),
            _ => None,
        };
    }
    let a = as_f64(l)?;
    let b = as_f64(r)?;
    match op {
        BinOp::Add => Some(Expr::Float(a + b)),
        BinOp::Sub => Some(Expr::Float(a - b)),
        BinOp::Mul => Some(Expr::Float(a * b)),
        BinOp::Div => Some(Expr::Float(a / b)),
        BinOp::Mod => Some(Expr::Float(a % b)),
        _ => None,
    }
}

fn as_f64(e: &Expr) -> Option<f64> {
    match e {
        Expr::Int(n) => Some(*n as f64),
        Expr::Float(f) => Some(*f),
        _ => None,
    }
}

/// Zero/null literal for a scalar value type, used by `zeros()` fills and
/// by a function falling off its end without an explicit `return`.
pub(super) fn zero_value_literal(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "0",
        Type::Float => "0.0",
        Type::Bool => "0",
        _ => "null",
    }
}
