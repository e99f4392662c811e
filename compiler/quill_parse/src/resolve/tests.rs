use pretty_assertions::assert_eq;
use quill_diagnostic::ErrorCode;
use quill_ir::{
    BindingKind, Block, Capture, CaptureSource, FuncId, FunctionBody, Program, StmtKind, Storage,
    ARGUMENTS_SLOT, THIS_SLOT,
};

use crate::parse_source;

/// Storage of every occurrence of `name`, in source order.
fn storages(program: &Program, name: &str) -> Vec<Storage> {
    program
        .vars()
        .filter(|(_, v)| &*v.name == name)
        .map(|(_, v)| v.storage.clone())
        .collect()
}

fn root_block(program: &Program) -> &Block {
    let FunctionBody::Block(body) = program.root().body else {
        panic!("root body is a block");
    };
    match &program.stmt(body).kind {
        StmtKind::Block(block) => block,
        other => panic!("expected block, found {other:?}"),
    }
}

fn error_code(source: &str) -> ErrorCode {
    parse_source(source).unwrap_err().code
}

#[test]
fn top_level_bindings_are_local() {
    let program = parse_source("let x = 1; const y = x; y;").unwrap();
    assert_eq!(storages(&program, "x"), vec![Storage::Local(0); 2]);
    assert_eq!(storages(&program, "y"), vec![Storage::Local(1); 2]);
    assert_eq!(program.root().layout.slot_count(), 2);
}

#[test]
fn unknown_names_are_global() {
    let program = parse_source("print(1);").unwrap();
    assert_eq!(storages(&program, "print"), vec![Storage::Global("print".into())]);
}

#[test]
fn outer_variable_is_captured() {
    let program = parse_source("let x = 1; function f() { return x + x; }").unwrap();
    assert_eq!(
        storages(&program, "x"),
        vec![Storage::Local(0), Storage::Captured(0), Storage::Captured(0)]
    );
    let layout = &program.function(FuncId::new(1)).layout;
    assert_eq!(
        layout.captures,
        vec![Capture {
            name: "x".into(),
            depth: 1,
            source: CaptureSource::Local(0),
        }]
    );
    assert_eq!(layout.locals[THIS_SLOT as usize].name.as_ref(), "this");
    assert_eq!(layout.locals[ARGUMENTS_SLOT as usize].name.as_ref(), "arguments");
}

#[test]
fn capture_threads_through_intermediate_functions() {
    let program = parse_source("let x = 1; function f() { return () => x; }").unwrap();
    let outer = &program.function(FuncId::new(1)).layout;
    let inner = &program.function(FuncId::new(2)).layout;
    assert_eq!(outer.captures[0].source, CaptureSource::Local(0));
    assert_eq!(
        inner.captures,
        vec![Capture {
            name: "x".into(),
            depth: 2,
            source: CaptureSource::Captured(0),
        }]
    );
    assert_eq!(inner.depth, 2);
}

#[test]
fn inner_block_shadows_outer() {
    let program = parse_source("let x = 1; { let x = 2; x; } x;").unwrap();
    assert_eq!(
        storages(&program, "x"),
        vec![
            Storage::Local(0),
            Storage::Local(1),
            Storage::Local(1),
            Storage::Local(0)
        ]
    );
}

#[test]
fn shadowed_names_capture_separately() {
    let program =
        parse_source("let x = 1; { let x = 2; function g() { return x; } } function h() { return x; }")
            .unwrap();
    let g = &program.function(FuncId::new(1)).layout;
    let h = &program.function(FuncId::new(2)).layout;
    assert_eq!(g.captures[0].source, CaptureSource::Local(1));
    assert_eq!(h.captures[0].source, CaptureSource::Local(0));
}

#[test]
fn this_resolution() {
    let program = parse_source("this; function f() { this; return () => this; }").unwrap();
    assert_eq!(
        storages(&program, "this"),
        vec![
            Storage::Global("this".into()),
            Storage::Local(THIS_SLOT),
            Storage::Captured(0),
        ]
    );
}

#[test]
fn function_declarations_hoist() {
    let program = parse_source("f(); function f() { return f; }").unwrap();
    assert_eq!(
        storages(&program, "f"),
        vec![Storage::Local(0), Storage::Local(0), Storage::Captured(0)]
    );
    let block = root_block(&program);
    assert_eq!(block.scope.hoisted.len(), 1);
    assert_eq!(block.scope.fresh_slots, vec![0]);
}

#[test]
fn use_before_declaration_is_rejected() {
    assert_eq!(error_code("x; let x = 1;"), ErrorCode::E2004);
    assert_eq!(error_code("let x = 1; { x; let x = 2; }"), ErrorCode::E2004);
}

#[test]
fn nested_function_may_reference_later_declaration() {
    let program = parse_source("function get() { return later; } let later = 1;").unwrap();
    assert_eq!(storages(&program, "later")[0], Storage::Captured(0));
}

#[test]
fn self_reference_in_initializer_is_local() {
    let program = parse_source("const fact = n => n ? n * fact(n - 1) : 1;").unwrap();
    assert_eq!(storages(&program, "fact")[1], Storage::Captured(0));
}

#[test]
fn duplicate_declarations() {
    assert_eq!(error_code("let a = 1; let a = 2;"), ErrorCode::E2001);
    assert_eq!(error_code("function f(a, a) {}"), ErrorCode::E2001);
    assert_eq!(error_code("function f(a) { let a = 1; }"), ErrorCode::E2001);
    assert_eq!(error_code("let f = 1; function f() {}"), ErrorCode::E2001);
    assert!(parse_source("let a = 1; { let a = 2; }").is_ok());
}

#[test]
fn reserved_words() {
    assert_eq!(error_code("let class = 1;"), ErrorCode::E2002);
    assert_eq!(error_code("function f(yield) {}"), ErrorCode::E2002);
    assert_eq!(error_code("new Foo();"), ErrorCode::E2002);
    assert!(parse_source("obj.class;").is_ok());
}

#[test]
fn const_assignment_in_same_function_is_static() {
    assert_eq!(error_code("const x = 1; x = 2;"), ErrorCode::E2003);
    assert_eq!(error_code("const x = 1; x++;"), ErrorCode::E2003);
    assert_eq!(error_code("const x = 1; x += 2;"), ErrorCode::E2003);
}

#[test]
fn const_assignment_across_functions_is_flagged() {
    let program = parse_source("const x = 1; function f() { x = 2; }").unwrap();
    let flags: Vec<bool> = program
        .vars()
        .filter(|(_, v)| &*v.name == "x")
        .map(|(_, v)| v.constant)
        .collect();
    assert_eq!(flags, vec![true, true]);
}

#[test]
fn for_header_bindings_are_per_iteration() {
    let program = parse_source("for (let i = 0, j = 1; i < 3; i++) {}").unwrap();
    let block = root_block(&program);
    let StmtKind::For { per_iteration, .. } = &program.stmt(block.body[0]).kind else {
        panic!("expected for");
    };
    assert_eq!(per_iteration, &vec![0, 1]);
}

#[test]
fn named_function_expression_binds_itself() {
    let program = parse_source("const f = function g(n) { return g; };").unwrap();
    let function = program.function(FuncId::new(1));
    let self_binding = function.self_binding.unwrap();
    assert_eq!(program.var(self_binding).storage, Storage::Local(2));
    assert_eq!(function.layout.locals[2].kind, BindingKind::Function);
    assert_eq!(storages(&program, "g")[1], Storage::Local(2));
    assert!(parse_source("(function g(g) { let n = g; })").is_ok());
}

#[test]
fn arrows_have_no_implicit_slots() {
    let program = parse_source("const f = (a, b) => arguments;").unwrap();
    let layout = &program.function(FuncId::new(1)).layout;
    assert_eq!(layout.slot_count(), 2);
    assert_eq!(
        storages(&program, "arguments"),
        vec![Storage::Global("arguments".into())]
    );
}
