//! Whole-program integration tests: compile MiniLang source through the
//! full pipeline and check the shape of the emitted LLVM IR. There is no
//! JIT/interpreter available to actually run these (out of scope), so
//! these assert on IR substrings the way the codegen unit tests do,
//! just over full concrete programs from spec.md's worked scenarios.

use minilangc::{compile_source, CompilerConfig};

fn ir(src: &str) -> String {
    compile_source(src, CompilerConfig::default()).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn arithmetic_and_print() {
    let out = ir("let x: int = 10 print(x + 2)");
    assert!(out.contains("define i32 @main()"));
    assert!(out.contains("add i64"));
    assert!(out.contains("%lld"));
}

#[test]
fn array_literal_index_assign_and_print() {
    let out = ir("let a: int[3] = [1,2,3] a[0] = a[1]+a[2] print(a)");
    assert!(out.contains("[3 x i64]"));
    assert!(out.contains(r#"constant [3 x i8] c"[\00""#));
    assert!(out.contains(", "));
}

#[test]
fn recursive_factorial() {
    let out = ir(
        "func fact(n: int) -> int \
           if n < 2 then return 1 end \
           return n * fact(n-1) \
         end \
         print(fact(5))",
    );
    assert!(out.contains("define i64 @fact(i64 %arg.n)"));
    assert!(out.contains("call i64 @fact"));
}

#[test]
fn struct_reference_chain() {
    let out = ir(
        "struct N v:int, next:ref N end \
         let a: N = N(1, null) \
         a.next = N(2, null) \
         a.next.next = N(3, null) \
         print(a.next.next.v)",
    );
    assert!(out.contains("%struct.N = type { i64, ptr }"));
    assert!(out.contains("call ptr @malloc"));
}

#[test]
fn string_concat_via_to_str() {
    let out = ir(r#"let s: string = "hi" + to_str(42) print(s)"#);
    assert!(out.contains("call ptr @to_str_int"));
    assert!(out.contains("call ptr @strcat"));
}

#[test]
fn string_plus_int_is_a_type_error() {
    let program = minilangc::compile_source(r#"print("a" + 1)"#, CompilerConfig::default());
    assert!(program.is_err());
}

#[test]
fn boolean_array_prints_true_false_literals() {
    let out = ir("let b: bool[2] = [true, false] print(b)");
    assert!(out.contains(r#"c"true\00""#));
    assert!(out.contains(r#"c"false\00""#));
}

#[test]
fn float_division_promotes_but_int_division_truncates() {
    let out = ir("print(1/2) print(1.0/2)");
    assert!(out.contains("sdiv i64"));
    assert!(out.contains("fdiv double"));
}

#[test]
fn break_targets_only_innermost_loop() {
    let out = ir(
        "let i: int = 0 \
         while i < 3 do \
           let j: int = 0 \
           while j < 3 do \
             if j == 1 then break end \
             j = j + 1 \
           end \
           print(i) \
           i = i + 1 \
         end",
    );
    assert!(out.contains("br label %whilecond"));
}

#[test]
fn deferred_global_initializer_runs_before_first_use() {
    let out = ir(
        "func f() -> int return 7 end \
         global g: int = f() \
         print(g)",
    );
    assert!(out.contains("@g = global i64 0"));
    let main_start = out.find("define i32 @main()").unwrap();
    let call_pos = out[main_start..].find("call i64 @f").unwrap() + main_start;
    let store_pos = out[main_start..].find("store i64 %").unwrap() + main_start;
    assert!(call_pos < store_pos);
}
