use pretty_assertions::assert_eq;
use quill_ir::Number;

use crate::errors::EvalErrorKind;
use crate::print_handler::{buffer_handler, silent_handler};
use crate::{Interpreter, ScriptError, Value};

fn interpreter() -> Interpreter {
    Interpreter::builder().print_handler(silent_handler()).build()
}

fn run(source: &str) -> Value {
    interpreter().run_source(source).unwrap()
}

fn run_str(source: &str) -> String {
    run(source).to_string()
}

fn error(source: &str) -> String {
    interpreter().run_source(source).unwrap_err().to_string()
}

fn output(source: &str) -> String {
    let handler = buffer_handler();
    let mut interp = Interpreter::builder()
        .print_handler(handler.clone())
        .build();
    interp.run_source(source).unwrap();
    handler.get_output()
}

#[test]
fn completion_is_last_expression_statement() {
    assert_eq!(run("1 + 2"), Value::from(3));
    assert_eq!(run("let x = 4; x * 2; let y = 1;"), Value::from(8));
    assert_eq!(run("let x = 1;"), Value::Undefined);
}

#[test]
fn numeric_tiers() {
    assert!(matches!(run("2147483647 + 1"), Value::Number(Number::Long(2_147_483_648))));
    assert!(matches!(run("6 / 3"), Value::Number(Number::Int(2))));
    assert_eq!(run("7 / 2"), Value::from(3.5));
    assert_eq!(run_str("1 / 0"), "NaN");
    assert_eq!(run_str("0.1 + 0.2"), "0.30000000000000004");
    assert_eq!(run_str("2 ** 10"), "1024");
}

#[test]
fn concatenation_and_coercion() {
    assert_eq!(run_str("1 + 2 + 'a' + 3"), "3a3");
    assert_eq!(run_str("'5' - 2"), "3");
    assert_eq!(run_str("[1, 2] + 1"), "1,21");
    assert_eq!(run_str("({}) + ''"), "[object Object]");
    assert_eq!(run_str("const n = 2; `n=${n * 2}`"), "n=4");
}

#[test]
fn equality() {
    assert_eq!(run("'5' == 5"), Value::Bool(true));
    assert_eq!(run("'5' === 5"), Value::Bool(false));
    assert_eq!(run("null == undefined"), Value::Bool(true));
    assert_eq!(run("null === undefined"), Value::Bool(false));
    assert_eq!(run("[] == []"), Value::Bool(false));
    assert_eq!(run("const a = []; a == a"), Value::Bool(true));
    assert_eq!(run("1 === 1.0"), Value::Bool(true));
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(run_str("null ?? 'd'"), "d");
    assert_eq!(run_str("0 ?? 'x'"), "0");
    assert_eq!(run_str("0 || 'x'"), "x");
    assert_eq!(run_str("[] || 'empty'"), "empty");
    assert_eq!(run_str("'a' && 'b'"), "b");
}

#[test]
fn typeof_operator() {
    assert_eq!(run_str("typeof undeclared"), "undefined");
    assert_eq!(run_str("typeof 1"), "number");
    assert_eq!(run_str("typeof []"), "array");
    assert_eq!(run_str("typeof null"), "null");
    assert_eq!(run_str("typeof (() => 1)"), "function");
}

#[test]
fn closures_in_loops_keep_their_iteration() {
    let source = "
        let fns = [];
        for (let i = 0; i < 3; i++) { fns.push(() => i); }
        fns.map(f => f()).join(',')
    ";
    assert_eq!(run_str(source), "0,1,2");
}

#[test]
fn closures_share_captured_bindings() {
    let source = "
        function counter() {
            let n = 0;
            return { inc: () => ++n, get: () => n };
        }
        const c = counter();
        c.inc();
        c.inc();
        c.get()
    ";
    assert_eq!(run(source), Value::from(2));
}

#[test]
fn parameters() {
    let source = "
        function f(a, b = a + 1, ...rest) {
            return [a, b, rest.length, arguments.length].join();
        }
        f(1) + ' ' + f(1, 5, 6, 7)
    ";
    assert_eq!(run_str(source), "1,2,0,1 1,5,2,4");
}

#[test]
fn named_function_expression_sees_itself() {
    let source = "const fact = function me(n) { return n <= 1 ? 1 : n * me(n - 1); }; fact(5)";
    assert_eq!(run(source), Value::from(120));
}

#[test]
fn this_binding() {
    let source = "
        const o = { n: 2, double() { return this.n * 2; } };
        const f = o.double;
        [o.double(), f()].join()
    ";
    assert_eq!(run_str(source), "4,4");

    let source = "
        const o = { n: 1, m() { return [1].map(() => this.n)[0]; } };
        o.m()
    ";
    assert_eq!(run(source), Value::from(1));

    let source = "
        function who() { return this.name; }
        const b = who.bind({ name: 'x' });
        b() + who.call({ name: 'y' })
    ";
    assert_eq!(run_str(source), "xy");
}

#[test]
fn top_level_this_is_the_global_object() {
    assert_eq!(run("this.answer = 42; answer"), Value::from(42));
}

#[test]
fn optional_chaining() {
    assert_eq!(run("const o = { a: { b: 1 } }; o?.a?.b"), Value::from(1));
    assert_eq!(run("const o = {}; o.x?.y"), Value::Undefined);
    assert_eq!(run("const o = {}; o.f?.()"), Value::Undefined);
    assert_eq!(run("null?.x"), Value::Undefined);
    assert_eq!(
        error("const o = {}; o.a.b"),
        "TypeError: Cannot read properties of undefined (reading 'b')"
    );
}

#[test]
fn destructuring() {
    let source = "
        const [a, , b = 5, ...rest] = [1, 2, undefined, 4, 5];
        const { x, y: z = 3, ...others } = { x: 1, w: 2, v: 3 };
        [a, b, rest.join('|'), x, z, Object.keys(others).join('|')].join()
    ";
    assert_eq!(run_str(source), "1,5,4|5,1,3,w|v");
    assert_eq!(
        error("const { a } = null;"),
        "TypeError: Cannot destructure 'null' as it is null."
    );
}

#[test]
fn spread() {
    assert_eq!(run("Math.max(...[1, 5, 3])"), Value::from(5));
    assert_eq!(run_str("[...'ab', ...[1]].join('-')"), "a-b-1");
    assert_eq!(
        run_str("Object.keys({ ...{ a: 1, b: 2 }, c: 3 }).join()"),
        "a,b,c"
    );
}

#[test]
fn property_updates() {
    assert_eq!(run("const o = { n: 1 }; o.n++; o.n += 2; o.n"), Value::from(4));
    assert_eq!(run("const a = [1]; a[3] = 4; a.length"), Value::from(4));
    assert_eq!(run("const a = [1]; a[3] = 4; a[1]"), Value::Undefined);
    assert_eq!(run_str("const a = [1, 2, 3]; a.length = 1; a.join()"), "1");
    assert_eq!(
        error("const a = []; a.foo = 1;"),
        "RangeError: Invalid array index 'foo'"
    );
    assert_eq!(
        error("const s = 'abc'; s[0] = 'x';"),
        "TypeError: Cannot assign to read only property '0' of string"
    );
}

#[test]
fn array_growth_is_bounded_by_loop_limit() {
    let mut interp = Interpreter::builder()
        .loop_limit(100)
        .print_handler(silent_handler())
        .build();
    let err = interp.run_source("const a = []; a[500] = 1;").unwrap_err();
    assert_eq!(err.to_string(), "RangeError: Invalid array index '500'");
}

#[test]
fn string_lengths_count_characters() {
    assert_eq!(run("'abc'.length + 'héllo'.length"), Value::from(8));
    assert_eq!(run_str("'héllo'[1]"), "é");
}

#[test]
fn loops() {
    assert_eq!(run("let n = 0; do { n++; } while (false); n"), Value::from(1));
    let source = "let s = 0; for (let i = 0; i < 5; i++) { if (i % 2) continue; s += i; } s";
    assert_eq!(run(source), Value::from(6));
    let source = "let i = 0; while (true) { if (++i > 3) break; } i";
    assert_eq!(run(source), Value::from(4));
    let source = "let keys = []; for (const k in { a: 1, b: 2 }) keys.push(k); keys.join()";
    assert_eq!(run_str(source), "a,b");
    let source = "let t = 0; for (const i in [5, 6]) t += i; t";
    assert_eq!(run(source), Value::from(1));
}

#[test]
fn for_of_sees_pushes_during_iteration() {
    let source = "
        const xs = [1, 2];
        let n = 0;
        for (const x of xs) { if (xs.length < 5) xs.push(x); n++; }
        n
    ";
    assert_eq!(run(source), Value::from(5));
    assert_eq!(run_str("let s = ''; for (const c of 'abc') s = c + s; s"), "cba");
    assert_eq!(error("for (const x of 5) {}"), "TypeError: number is not iterable");
}

#[test]
fn loop_limit_is_fatal_and_skips_finally() {
    let handler = buffer_handler();
    let mut interp = Interpreter::builder()
        .loop_limit(10)
        .print_handler(handler.clone())
        .build();
    let err = interp
        .run_source("try { while (true) {} } catch (e) { print('caught'); } finally { print('finally'); }")
        .unwrap_err();
    let ScriptError::Eval(err) = err else {
        panic!("expected a runtime error");
    };
    assert!(matches!(err.kind, EvalErrorKind::LoopLimitExceeded { limit: 10 }));
    assert_eq!(err.to_string(), "infinite loop detected (more than 10 iterations)");
    assert_eq!(handler.get_output(), "");

    assert_eq!(
        interp.run_source("let i = 0; while (i < 10) { i++; } i").unwrap(),
        Value::from(10)
    );
}

#[test]
fn try_finally_ordering() {
    let source = "
        let log = [];
        function f() {
            try { log.push('try'); return 1; }
            finally { log.push('finally'); }
        }
        const r = f();
        log.push(r);
        log.join()
    ";
    assert_eq!(run_str(source), "try,finally,1");
    let source = "function g() { try { return 1; } finally { return 2; } } g()";
    assert_eq!(run(source), Value::from(2));
}

#[test]
fn catch_receives_thrown_values_and_error_text() {
    assert_eq!(
        run_str("try { null.x } catch (e) { e }"),
        "TypeError: Cannot read properties of null (reading 'x')"
    );
    assert_eq!(run("try { throw { code: 42 }; } catch (e) { e.code }"), Value::from(42));
    assert_eq!(error("throw 'boom';"), "boom");
    assert_eq!(run_str("let e = 'outer'; try { throw 1; } catch (e) {} e"), "outer");
}

#[test]
fn switch_statement() {
    let source = "
        function name(n) {
            switch (n) {
                case 1: return 'one';
                case 2:
                case 3: return 'few';
                default: return 'many';
            }
        }
        [name(1), name(3), name(9)].join(' ')
    ";
    assert_eq!(run_str(source), "one few many");
    let source = "
        let out = '';
        switch (2) {
            case 1: out += 'a';
            case 2: out += 'b';
            case 3: out += 'c'; break;
            case 4: out += 'd';
        }
        out
    ";
    assert_eq!(run_str(source), "bc");
    assert_eq!(
        run_str("let r = ''; switch ('1') { case 1: r = 'num'; break; default: r = 'other'; } r"),
        "other"
    );
}

#[test]
fn uninitialized_binding_read_from_closure() {
    assert_eq!(
        error("function f() { return x; } f(); let x = 1;"),
        "ReferenceError: Cannot access 'x' before initialization"
    );
}

#[test]
fn const_assignment_from_nested_function() {
    assert_eq!(
        error("const k = 1; function f() { k = 2; } f();"),
        "TypeError: Assignment to constant variable 'k'"
    );
}

#[test]
fn undeclared_names() {
    assert_eq!(error("missing + 1"), "ReferenceError: missing is not defined");
    assert_eq!(error("x += 1;"), "ReferenceError: x is not defined");
    assert_eq!(error("const x = 1; x();"), "TypeError: number is not a function");
}

#[test]
fn assignment_creates_globals() {
    assert_eq!(run("x = 5; x"), Value::from(5));
    assert_eq!(run("function f() { y = 3; } f(); y"), Value::from(3));
    assert_eq!(run("z = 1; this.z"), Value::from(1));
}

#[test]
fn call_depth_is_limited() {
    let mut interp = Interpreter::builder()
        .max_call_depth(50)
        .print_handler(silent_handler())
        .build();
    let source = "function r(n) { return r(n + 1); } r(0)";
    assert_eq!(
        interp.run_source(source).unwrap_err().to_string(),
        "RangeError: Maximum call stack size exceeded"
    );
    let source = "function r(n) { return r(n + 1); } try { r(0) } catch (e) { 'caught' }";
    assert_eq!(interp.run_source(source).unwrap(), Value::from("caught"));
}

#[test]
fn runtime_errors_carry_positions() {
    let err = interpreter().run_source("let a = 1;\nnull.b;").unwrap_err();
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.position.line, 2);
}

#[test]
fn print_writes_to_handler() {
    assert_eq!(
        output("print('a', 1, [1, 2]); console.log({});"),
        "a 1 1,2\n[object Object]\n"
    );
}

#[test]
fn host_calls_and_globals() {
    let mut interp = interpreter();
    let add = interp.run_source("(a, b) => a + b").unwrap();
    assert_eq!(
        interp.call(&add, &[Value::from(2), Value::from(3)]).unwrap(),
        Value::from(5)
    );

    interp.globals_mut().define("limit", Value::from(3));
    assert_eq!(interp.run_source("limit * 2").unwrap(), Value::from(6));

    interp.define_native("twice(x)", |_, _, args| {
        Ok(crate::operators::add(&args[0], &args[0]))
    });
    assert_eq!(interp.run_source("twice('ab')").unwrap(), Value::from("abab"));
}

#[test]
fn without_stdlib_there_are_no_globals() {
    let mut interp = Interpreter::builder()
        .stdlib(false)
        .print_handler(silent_handler())
        .build();
    assert_eq!(
        interp.run_source("Math").unwrap_err().to_string(),
        "ReferenceError: Math is not defined"
    );
}
