//! Mapping from MiniLang [`Type`]s to LLVM IR type syntax, per spec.md
//! §4.4's fixed table.
//!
//! This emitter targets opaque pointers (LLVM 15+, matching the teacher
//! crate's own convention): every pointer-like type lowers to the single
//! IR type `ptr`. Under opaque pointers, spec.md's "bitcast at use" for
//! reference-to-struct fields and pointer retagging generally costs
//! nothing -- the same `ptr` SSA value is simply reused for whatever
//! pointee the current context needs, with no `bitcast` instruction
//! emitted, which is the textual no-op the spec describes.

use super::CodeGenError;
use crate::types::Type;

/// `Int→i64`, `Float→double`, `Bool→i1`, `String→ptr`, `Void→void`,
/// `Array(T,n)→[n x T̂]` when inline, `Array(T,·)→ptr` otherwise,
/// `Struct→named struct type`, `Reference(_)→ptr` (struct and non-struct
/// targets alike, since both are opaque pointers here).
pub(super) fn llvm_type(ty: &Type) -> String {
    match ty {
        Type::Int => "i64".to_string(),
        Type::Float => "double".to_string(),
        Type::Bool => "i1".to_string(),
        Type::String => "ptr".to_string(),
        Type::Void => "void".to_string(),
        Type::Null => "ptr".to_string(),
        Type::Array(elem, Some(n)) => format!("[{} x {}]", n, llvm_type(elem)),
        Type::Array(_, None) => "ptr".to_string(),
        Type::Struct(s) => format!("%struct.{}", s.name),
        Type::Reference(_) => "ptr".to_string(),
        Type::Function(..) => "ptr".to_string(),
    }
}

/// The LLVM type of a *value* of type `ty` as seen at a use site -- equal
/// to [`llvm_type`] except that an inline array always appears as a
/// decayed element pointer (spec.md §4.4.4 "Identifier load").
pub(super) fn llvm_value_type(ty: &Type) -> String {
    match ty {
        Type::Array(_, Some(_)) => "ptr".to_string(),
        // A struct-typed local, parameter or return value is always the
        // handle a constructor call hands back, never the bare aggregate
        // (spec.md §4.4.4 "Struct constructor": `malloc`, never a stack
        // value). Only a *field* embedded by value inside another struct's
        // layout uses the bare `%struct.Name` aggregate form.
        Type::Struct(_) => "ptr".to_string(),
        other => llvm_type(other),
    }
}

/// Printf/sprintf-style format specifier for a scalar MiniLang type.
/// Bool has no single specifier of its own: the caller selects between the
/// `"true"`/`"false"` literal globals instead (spec.md §4.4.4 "print").
pub(super) fn format_specifier(ty: &Type) -> Result<&'static str, CodeGenError> {
    match ty {
        Type::Int => Ok("%lld"),
        Type::Float => Ok("%f"),
        Type::String => Ok("%s"),
        Type::Struct(_) | Type::Reference(_) | Type::Null | Type::Array(_, None) => Ok("%p"),
        other => Err(CodeGenError::Logic(format!(
            "no format specifier for type {}",
            other.describe()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_mapping() {
        assert_eq!(llvm_type(&Type::Int), "i64");
        assert_eq!(llvm_type(&Type::Float), "double");
        assert_eq!(llvm_type(&Type::Bool), "i1");
        assert_eq!(llvm_type(&Type::String), "ptr");
        assert_eq!(llvm_type(&Type::Void), "void");
    }

    #[test]
    fn inline_array_is_aggregate_heap_array_is_pointer() {
        assert_eq!(
            llvm_type(&Type::Array(Box::new(Type::Int), Some(3))),
            "[3 x i64]"
        );
        assert_eq!(llvm_type(&Type::Array(Box::new(Type::Int), None)), "ptr");
    }

    #[test]
    fn reference_to_struct_and_to_scalar_are_both_ptr() {
        use crate::types::StructType;
        assert_eq!(
            llvm_type(&Type::Reference(Box::new(Type::Struct(
                StructType::placeholder("N")
            )))),
            "ptr"
        );
        assert_eq!(llvm_type(&Type::Reference(Box::new(Type::Int))), "ptr");
    }
}
