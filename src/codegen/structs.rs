//! Struct registry: lowered layout, field ordinals, and declared field
//! types, keyed by struct name (spec.md §3 "Struct registry").
//!
//! Populated in a single pre-pass over every top-level `struct`
//! definition (spec.md §4.4.3 step 1) before any function body is
//! lowered, so forward references through `ref` fields always resolve.

use super::CodeGenError;
use crate::types::Type;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// One struct's lowered layout.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct StructLayout {
    /// Declaration-order field list: name, declared type, byte offset.
    pub fields: Vec<(String, Type, u64)>,
    pub size: u64,
    pub align: u64,
}

impl StructLayout {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _, _)| n == name)
    }

    pub fn field(&self, name: &str) -> Option<&(String, Type, u64)> {
        self.fields.iter().find(|(n, _, _)| n == name)
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct StructRegistry {
    layouts: BTreeMap<String, StructLayout>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&StructLayout, CodeGenError> {
        self.layouts
            .get(name)
            .ok_or_else(|| CodeGenError::Logic(format!("undefined struct '{}'", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Natural size/alignment of a field type, in bytes. Reference fields
    /// are always a single machine pointer regardless of target
    /// (spec.md §4.4.2), matching the `ptr`-everywhere IR type mapping.
    fn scalar_layout(&self, ty: &Type) -> Result<(u64, u64), CodeGenError> {
        match ty {
            Type::Int | Type::Float => Ok((8, 8)),
            Type::Bool => Ok((1, 1)),
            Type::String | Type::Reference(_) | Type::Array(_, None) | Type::Null => Ok((8, 8)),
            Type::Array(elem, Some(n)) => {
                let (esize, ealign) = self.scalar_layout(elem)?;
                Ok((esize * n, ealign))
            }
            Type::Struct(s) => {
                let layout = self.get(&s.name)?;
                Ok((layout.size, layout.align))
            }
            Type::Void | Type::Function(..) => Err(CodeGenError::Logic(
                "void/function type cannot be a struct field".to_string(),
            )),
        }
    }

    /// Register a struct's field list and compute its layout.
    ///
    /// This is the "deterministic manual fallback" spec.md §4.4.2
    /// describes: each field is aligned to its own natural alignment,
    /// and the whole structure is padded to its maximum field alignment.
    /// A real LLVM-backed emitter would instead ask the target data
    /// layout for the ABI size; this text emitter has no such oracle
    /// available, so the manual computation is authoritative here.
    pub fn define(&mut self, name: &str, fields: &[(String, Type)]) -> Result<(), CodeGenError> {
        let mut offset: u64 = 0;
        let mut max_align: u64 = 1;
        let mut laid_out = Vec::with_capacity(fields.len());
        for (fname, fty) in fields {
            let (size, align) = self.scalar_layout(fty)?;
            max_align = max_align.max(align);
            let padded = align_up(offset, align);
            laid_out.push((fname.clone(), fty.clone(), padded));
            offset = padded + size;
        }
        let size = align_up(offset, max_align).max(max_align);
        self.layouts.insert(
            name.to_string(),
            StructLayout {
                fields: laid_out,
                size,
                align: max_align,
            },
        );
        Ok(())
    }

    /// Emit `%struct.Name = type { ... }` for every registered struct, in
    /// a deterministic (name-sorted) order. Field order within each named
    /// type matches declaration order, which is what field-index GEPs
    /// rely on; struct types may reference each other regardless of
    /// textual order since LLVM module-level type declarations are not
    /// order-sensitive.
    pub fn emit_all_type_decls(&self, ir: &mut String) -> Result<(), CodeGenError> {
        for (name, layout) in &self.layouts {
            let field_tys: Vec<String> = layout
                .fields
                .iter()
                .map(|(_, ty, _)| super::types::llvm_type(ty))
                .collect();
            writeln!(ir, "%struct.{} = type {{ {} }}", name, field_tys.join(", "))?;
        }
        Ok(())
    }
}

fn align_up(offset: u64, align: u64) -> u64 {
    if align == 0 {
        return offset;
    }
    offset.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_offsets_follow_declaration_order() {
        let mut reg = StructRegistry::new();
        reg.define(
            "N",
            &[
                ("v".to_string(), Type::Int),
                ("next".to_string(), Type::Reference(Box::new(Type::Struct(
                    crate::types::StructType::placeholder("N"),
                )))),
            ],
        )
        .unwrap();
        let layout = reg.get("N").unwrap();
        assert_eq!(layout.field_index("v"), Some(0));
        assert_eq!(layout.field_index("next"), Some(1));
        assert_eq!(layout.field("v").unwrap().2, 0);
        assert_eq!(layout.field("next").unwrap().2, 8);
        assert_eq!(layout.size, 16);
    }

    #[test]
    fn identical_definitions_are_deterministic() {
        let mut a = StructRegistry::new();
        a.define("P", &[("x".to_string(), Type::Bool), ("y".to_string(), Type::Int)])
            .unwrap();
        let mut b = StructRegistry::new();
        b.define("P", &[("x".to_string(), Type::Bool), ("y".to_string(), Type::Int)])
            .unwrap();
        let la = a.get("P").unwrap();
        let lb = b.get("P").unwrap();
        assert_eq!(la.fields, lb.fields);
        assert_eq!(la.size, lb.size);
    }
}
