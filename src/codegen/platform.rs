//! Platform detection. The emitter targets the host triple (spec.md §4.4:
//! "Uses a single module, native target triple and native data layout").

/// The target triple for the host the compiler itself runs on.
pub(super) fn get_target_triple() -> &'static str {
    #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
    {
        "arm64-apple-macosx14.0.0"
    }

    #[cfg(all(target_os = "macos", target_arch = "x86_64"))]
    {
        "x86_64-apple-darwin"
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    {
        "x86_64-unknown-linux-gnu"
    }

    #[cfg(all(target_os = "linux", target_arch = "aarch64"))]
    {
        "aarch64-unknown-linux-gnu"
    }

    #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
    {
        "x86_64-pc-windows-msvc"
    }

    #[cfg(not(any(
        all(target_os = "macos", target_arch = "aarch64"),
        all(target_os = "macos", target_arch = "x86_64"),
        all(target_os = "linux", target_arch = "x86_64"),
        all(target_os = "linux", target_arch = "aarch64"),
        all(target_os = "windows", target_arch = "x86_64"),
    )))]
    {
        "unknown"
    }
}

/// Whether `main`'s prolog should emit the Windows console UTF-8 setup
/// call (spec.md §4.4.1/§4.4.3: "On Windows, also `SetConsoleOutputCP` ...
/// `main` calls `SetConsoleOutputCP(65001)` at entry").
pub(super) fn targeting_windows() -> bool {
    cfg!(target_os = "windows")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_is_non_empty() {
        assert!(!get_target_triple().is_empty());
    }
}
