//! Type system for MiniLang
//!
//! Types are pure data: they attach to AST nodes and drive IR lowering, but
//! there is no unification or inference. Every type is either written
//! explicitly in source or derived structurally (e.g. the result of `a + b`
//! is the wider of `a` and `b`'s types).

use std::collections::BTreeMap;

/// A MiniLang type.
///
/// Equality is structural for primitives, arrays and references; nominal
/// (by name only) for structs, since two `Struct` nodes with the same name
/// always refer to the same registry entry once resolved.
#[derive(Debug, Clone)]
pub enum Type {
    /// 64-bit signed integer.
    Int,
    /// 64-bit IEEE-754 floating point.
    Float,
    /// Pointer to a null-terminated byte sequence. String literals are
    /// immutable globals; `str` is a parser-level alias, never a distinct
    /// variant.
    String,
    /// 1-bit boolean.
    Bool,
    /// Only valid as a function return type.
    Void,
    /// `size = Some(n)` is an inline fixed-size array (`[n x T]` in IR);
    /// `size = None` is a heap pointer to elements (`T*` in IR).
    Array(Box<Type>, Option<u64>),
    /// Nominal record type. `fields` is empty until the definition is
    /// processed; until then this is an opaque placeholder used only
    /// through `Reference`.
    Struct(StructType),
    /// Pointer-like handle. For a struct target this always lowers to a
    /// raw byte pointer so self- and mutually-referential structs never
    /// require a cyclic layout.
    Reference(Box<Type>),
    /// Function signature. Not a first-class value.
    Function(Vec<Type>, Box<Type>),
    /// Sentinel compatible with any pointer-typed location.
    Null,
}

/// A nominal struct type: name plus an ordered field list.
///
/// Field order is declaration order and is load-bearing: it fixes both the
/// struct-constructor argument order and the IR field ordinal.
#[derive(Debug, Clone)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

impl StructType {
    /// An unresolved forward reference: no fields yet. Callers must not
    /// read layout information from a placeholder; they go through the
    /// struct registry (`codegen::structs::StructRegistry`) to find the
    /// real definition once it exists.
    pub fn placeholder(name: impl Into<String>) -> Self {
        StructType {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        use Type::*;
        match (self, other) {
            (Int, Int) | (Float, Float) | (String, String) | (Bool, Bool) | (Void, Void)
            | (Null, Null) => true,
            (Array(a, sa), Array(b, sb)) => a == b && sa == sb,
            (Struct(a), Struct(b)) => a.name == b.name,
            (Reference(a), Reference(b)) => a == b,
            (Function(pa, ra), Function(pb, rb)) => pa == pb && ra == rb,
            _ => false,
        }
    }
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_pointer_like(&self) -> bool {
        matches!(
            self,
            Type::String
                | Type::Array(_, None)
                | Type::Struct(_)
                | Type::Reference(_)
                | Type::Null
        )
    }

    /// True when this type's IR representation is a fixed-size inline
    /// aggregate (`[n x T]`) rather than a scalar or a bare pointer.
    pub fn is_inline_array(&self) -> bool {
        matches!(self, Type::Array(_, Some(_)))
    }

    pub fn array_element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem, _) => Some(elem),
            _ => None,
        }
    }

    pub fn array_size(&self) -> Option<u64> {
        match self {
            Type::Array(_, size) => *size,
            _ => None,
        }
    }

    /// Name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Type::Int => "int".to_string(),
            Type::Float => "float".to_string(),
            Type::String => "string".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Void => "void".to_string(),
            Type::Null => "null".to_string(),
            Type::Array(elem, Some(n)) => format!("{}[{}]", elem.describe(), n),
            Type::Array(elem, None) => format!("{}[]", elem.describe()),
            Type::Struct(s) => s.name.clone(),
            Type::Reference(t) => format!("ref {}", t.describe()),
            Type::Function(params, ret) => format!(
                "func({}) -> {}",
                params
                    .iter()
                    .map(Type::describe)
                    .collect::<Vec<_>>()
                    .join(", "),
                ret.describe()
            ),
        }
    }
}

/// Names the parser has seen defined so far, used only for syntactic
/// disambiguation (is this identifier a struct constructor?). The emitter
/// owns the authoritative layout-bearing registry in `codegen::structs`.
#[derive(Debug, Clone, Default)]
pub struct TypeNames {
    pub structs: BTreeMap<String, StructType>,
}

impl TypeNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_struct(&mut self, st: StructType) {
        self.structs.insert(st.name.clone(), st);
    }

    pub fn is_struct(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn lookup_struct(&self, name: &str) -> Option<&StructType> {
        self.structs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_equality_is_structural() {
        assert_eq!(Type::Int, Type::Int);
        assert_ne!(Type::Int, Type::Float);
    }

    #[test]
    fn struct_equality_is_nominal() {
        let a = Type::Struct(StructType {
            name: "Node".into(),
            fields: vec![("v".into(), Type::Int)],
        });
        let b = Type::Struct(StructType::placeholder("Node"));
        assert_eq!(a, b);
    }

    #[test]
    fn array_equality_considers_size() {
        let a = Type::Array(Box::new(Type::Int), Some(3));
        let b = Type::Array(Box::new(Type::Int), None);
        assert_ne!(a, b);
    }
}
