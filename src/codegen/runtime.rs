//! External/runtime function declarations (spec.md §4.4.1).
//!
//! Declared once per module with external linkage and the C calling
//! convention. The six casting helpers (`to_str_int`, `to_str_float`,
//! `array_to_str_int`, `array_to_str_float`, `to_int`, `to_float`) are
//! declared and called by this crate but never defined here -- their
//! bodies are an external collaborator (spec.md §1).

use std::fmt::Write as _;

use super::CodeGenError;

/// Names recognized as direct libc passthroughs in call position
/// (spec.md §4.2 builtin list: `printf malloc free strlen strcpy strcat`).
pub(super) fn is_libc_passthrough(name: &str) -> bool {
    matches!(
        name,
        "printf" | "malloc" | "free" | "strlen" | "strcpy" | "strcat"
    )
}

/// Emit every extern declaration spec.md §4.4.1 lists, plus the Windows
/// console-setup import when targeting Windows.
pub(super) fn emit_runtime_decls(ir: &mut String, windows: bool) -> Result<(), CodeGenError> {
    writeln!(ir, "declare i32 @printf(ptr, ...)")?;
    writeln!(ir, "declare ptr @malloc(i64)")?;
    writeln!(ir, "declare void @free(ptr)")?;
    writeln!(ir, "declare i64 @strlen(ptr)")?;
    writeln!(ir, "declare ptr @strcpy(ptr, ptr)")?;
    writeln!(ir, "declare ptr @strcat(ptr, ptr)")?;
    writeln!(ir, "declare i32 @sprintf(ptr, ptr, ...)")?;
    writeln!(ir, "declare double @fmod(double, double)")?;
    writeln!(ir)?;
    writeln!(ir, "declare ptr @to_str_int(i64)")?;
    writeln!(ir, "declare ptr @to_str_float(double)")?;
    writeln!(ir, "declare ptr @array_to_str_int(ptr, i64)")?;
    writeln!(ir, "declare ptr @array_to_str_float(ptr, i64)")?;
    writeln!(ir, "declare i64 @to_int(double)")?;
    writeln!(ir, "declare double @to_float(i64)")?;
    if windows {
        writeln!(ir)?;
        writeln!(ir, "declare i32 @SetConsoleOutputCP(i32)")?;
    }
    writeln!(ir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_casting_helpers_and_libc() {
        let mut ir = String::new();
        emit_runtime_decls(&mut ir, false).unwrap();
        assert!(ir.contains("declare ptr @to_str_int(i64)"));
        assert!(ir.contains("declare ptr @array_to_str_float(ptr, i64)"));
        assert!(ir.contains("declare i64 @to_int(double)"));
        assert!(ir.contains("declare ptr @malloc(i64)"));
        assert!(!ir.contains("SetConsoleOutputCP"));
    }

    #[test]
    fn windows_adds_console_setup_import() {
        let mut ir = String::new();
        emit_runtime_decls(&mut ir, true).unwrap();
        assert!(ir.contains("declare i32 @SetConsoleOutputCP(i32)"));
    }

    #[test]
    fn recognizes_libc_passthrough_names() {
        assert!(is_libc_passthrough("printf"));
        assert!(is_libc_passthrough("malloc"));
        assert!(!is_libc_passthrough("to_str"));
    }
}
