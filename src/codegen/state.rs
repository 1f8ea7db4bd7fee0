//! CodeGen state: the single emit-context struct threaded through every
//! lowering routine, per spec.md §9's explicit redesign guidance away
//! from process-global mutable maps.

use super::structs::StructRegistry;
use super::CodeGenError;
use crate::ast::Expr;
use crate::config::CompilerConfig;
use crate::types::Type;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Where a local name's value lives.
#[derive(Debug, Clone)]
pub(super) struct LocalSlot {
    /// Either an `alloca`'d address (normal locals) or, for array
    /// parameters, the incoming pointer value itself (spec.md §4.4.5:
    /// "array parameters ... remain as pointer values to avoid an extra
    /// indirection").
    pub ptr: String,
    pub ty: Type,
    /// True for array-typed parameters: `ptr` already holds the value,
    /// skip both the entry-store and any later load/decay.
    pub is_direct: bool,
}

#[derive(Debug, Clone)]
pub(super) struct GlobalVar {
    pub ir_name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub(super) struct FuncSig {
    pub params: Vec<Type>,
    pub return_type: Type,
}

pub struct CodeGen {
    // Module-wide symbol environments (spec.md §3).
    pub(super) struct_registry: StructRegistry,
    pub(super) globals: HashMap<String, GlobalVar>,
    pub(super) functions: HashMap<String, FuncSig>,

    /// Non-constant global initializers, queued during the global
    /// declaration pass and assigned at the top of `main`
    /// (spec.md §4.4.3 step 2, §8 "Global deferred init").
    pub(super) deferred_globals: Vec<(String, Type, Expr)>,

    // Per-function state, reset at the start of each function/`main`.
    pub(super) locals: HashMap<String, LocalSlot>,
    /// Addresses of the current function's allocation-tracker buffer and
    /// live count (spec.md §5 "a fixed-capacity array of pointers and a
    /// count"), set up once in the function's prolog. Both are `alloca`'d
    /// memory so the cleanup epilogue can read them from any block
    /// regardless of which blocks actually ran, independent of LLVM
    /// dominance rules for SSA values.
    pub(super) alloc_buf: String,
    pub(super) alloc_count: String,
    pub(super) break_stack: Vec<String>,
    pub(super) current_return_type: Type,
    /// Whether the function currently being lowered is the synthesized
    /// `main` (spec.md §4.4.3 step 4): `return` at top level falls through
    /// to `main`'s own `ret i32 0` instead of `ret void`.
    pub(super) in_main: bool,
    /// Label of the basic block currently being appended to. Updated by
    /// `open_block`; read by `phi` emitters that need to name their
    /// incoming edge.
    pub(super) current_block: String,
    /// Whether the current block has already been closed with a
    /// terminator (`br`, `ret`). Branch helpers no-op instead of emitting
    /// a second terminator when a branch already ended in `return`/`break`.
    pub(super) block_terminated: bool,

    // String literal interning (module-wide; literals are deduplicated
    // and live for the whole program, spec.md §3 "Lifecycles").
    pub(super) string_constants: HashMap<String, String>,
    pub(super) string_globals: String,
    pub(super) string_counter: usize,

    // Fresh-name counters. Never reset between functions: LLVM only
    // requires uniqueness within one function, but a monotonically
    // increasing module-wide counter is simpler and just as correct.
    pub(super) temp_counter: usize,
    pub(super) block_counter: usize,

    pub(super) config: CompilerConfig,

    /// Accumulated IR for the body of the function currently being
    /// emitted (main or a user function). Flushed into the module's
    /// function section when the function is finished.
    pub(super) output: String,
}

/// Maximum number of tracked heap allocations per function activation
/// (spec.md §9: "the capacity-100 pointer array limitation encoded in the
/// source"). Kept generous since exceeding it silently drops cleanup for
/// the overflowing allocations rather than erroring.
pub(super) const ALLOC_TRACKER_CAPACITY: u64 = 256;

impl CodeGen {
    pub fn new(config: CompilerConfig) -> Self {
        CodeGen {
            struct_registry: StructRegistry::new(),
            globals: HashMap::new(),
            functions: HashMap::new(),
            deferred_globals: Vec::new(),
            locals: HashMap::new(),
            alloc_buf: String::new(),
            alloc_count: String::new(),
            break_stack: Vec::new(),
            current_return_type: Type::Void,
            in_main: false,
            current_block: "entry".to_string(),
            block_terminated: false,
            string_constants: HashMap::new(),
            string_globals: String::new(),
            string_counter: 0,
            temp_counter: 0,
            block_counter: 0,
            config,
            output: String::new(),
        }
    }

    pub(super) fn fresh_reg(&mut self) -> String {
        format!("%{}", self.fresh_temp())
    }

    pub(super) fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    pub(super) fn fresh_label(&mut self, hint: &str) -> String {
        let name = format!("{}{}", hint, self.block_counter);
        self.block_counter += 1;
        name
    }

    /// Reset all per-function state. Called once before lowering `main`
    /// and once before lowering each user function.
    pub(super) fn begin_function(&mut self, return_type: Type, is_main: bool) {
        self.locals.clear();
        self.alloc_buf.clear();
        self.alloc_count.clear();
        self.break_stack.clear();
        self.current_return_type = return_type;
        self.in_main = is_main;
        self.current_block = "entry".to_string();
        self.block_terminated = false;
        self.output.clear();
    }

    /// Close the current block (if still open) with an unconditional
    /// branch to `label`, then open `label` as the new current block.
    /// A no-op branch when the current block already ended in a
    /// terminator (e.g. a `return` inside an `if` arm).
    pub(super) fn branch_to(&mut self, label: &str) -> Result<(), CodeGenError> {
        if !self.block_terminated {
            writeln!(self.output, "  br label %{}", label)?;
            self.block_terminated = true;
        }
        Ok(())
    }

    /// Start appending to a new basic block, emitting its label line.
    pub(super) fn open_block(&mut self, label: &str) -> Result<(), CodeGenError> {
        writeln!(self.output, "{}:", label)?;
        self.current_block = label.to_string();
        self.block_terminated = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_are_unique_and_monotonic() {
        let mut cg = CodeGen::new(CompilerConfig::default());
        let a = cg.fresh_temp();
        let b = cg.fresh_temp();
        assert_ne!(a, b);
    }
}
