use pretty_assertions::assert_eq;

use crate::print_handler::silent_handler;
use crate::{Interpreter, Value};

fn run(source: &str) -> Value {
    Interpreter::builder()
        .print_handler(silent_handler())
        .build()
        .run_source(source)
        .unwrap()
}

fn run_str(source: &str) -> String {
    run(source).to_string()
}

fn error(source: &str) -> String {
    Interpreter::builder()
        .print_handler(silent_handler())
        .build()
        .run_source(source)
        .unwrap_err()
        .to_string()
}

#[test]
fn conversion_globals() {
    assert_eq!(run("parseInt('42px')"), Value::from(42));
    assert_eq!(run("parseInt('ff', 16)"), Value::from(255));
    assert_eq!(run("parseFloat('2.5kg')"), Value::from(2.5));
    assert_eq!(run("isNaN('abc')"), Value::Bool(true));
    assert_eq!(run("isFinite(1 / 0.0)"), Value::Bool(false));
    assert_eq!(run("Number('12') + 1"), Value::from(13));
    assert_eq!(run_str("String(12) + 1"), "121");
    assert_eq!(run("Boolean([])"), Value::Bool(false));
}

#[test]
fn math() {
    assert_eq!(run("Math.floor(2.7)"), Value::from(2));
    assert_eq!(run("Math.ceil(2.1)"), Value::from(3));
    assert_eq!(run("Math.round(2.5)"), Value::from(3));
    assert_eq!(run("Math.round(-2.5)"), Value::from(-2));
    assert_eq!(run("Math.abs(-4)"), Value::from(4));
    assert_eq!(run("Math.min(3, 1, 2)"), Value::from(1));
    assert_eq!(run_str("Math.max()"), "-Infinity");
    assert_eq!(run("Math.sqrt(16)"), Value::from(4));
    assert_eq!(run("Math.sign(-3)"), Value::from(-1));
    assert_eq!(run("const r = Math.random(); r >= 0 && r < 1"), Value::Bool(true));
    assert_eq!(error("Math = 3;"), "TypeError: Assignment to constant variable 'Math'");
}

#[test]
fn object_namespace() {
    let source = "
        const o = { a: 1, b: 2 };
        [Object.keys(o).join(), Object.values(o).join(), Object.entries(o).join(';')].join(' ')
    ";
    assert_eq!(run_str(source), "a,b 1,2 a,1;b,2");
    assert_eq!(run("Object.assign({ a: 1 }, { b: 2 }, { a: 3 }).a"), Value::from(3));
    assert_eq!(run("Object.hasOwn({ a: undefined }, 'a')"), Value::Bool(true));
    assert_eq!(run("({ a: 1 }).hasOwnProperty('b')"), Value::Bool(false));
    assert_eq!(run("Object.fromEntries([['x', 1], ['y', 2]]).y"), Value::from(2));
    let source = "
        const groups = Object.groupBy([1, 2, 3, 4], n => n % 2 ? 'odd' : 'even');
        groups.odd.join() + '|' + groups.even.join()
    ";
    assert_eq!(run_str(source), "1,3|2,4");
    assert_eq!(run("Array.isArray([]) && !Array.isArray({})"), Value::Bool(true));
}

#[test]
fn string_methods() {
    assert_eq!(run_str("'Hello'.toUpperCase() + 'Hello'.toLowerCase()"), "HELLOhello");
    assert_eq!(run_str("'  x '.trim()"), "x");
    assert_eq!(run_str("'abcdef'.slice(-3, -1)"), "de");
    assert_eq!(run_str("'abcdef'.substring(4, 1)"), "bcd");
    assert_eq!(run_str("'a,b,,c'.split(',', 3).join('|')"), "a|b|");
    assert_eq!(run_str("'abc'.split('').join('-')"), "a-b-c");
    assert_eq!(run("'banana'.indexOf('an')"), Value::from(1));
    assert_eq!(run("'banana'.lastIndexOf('an')"), Value::from(3));
    assert_eq!(run("'banana'.indexOf('x')"), Value::from(-1));
    assert_eq!(run("'banana'.includes('nan')"), Value::Bool(true));
    assert_eq!(run_str("'5'.padStart(3, '0') + 'x'.padEnd(3, '.')"), "005x..");
    assert_eq!(run_str("'ab'.repeat(3)"), "ababab");
    assert_eq!(run_str("'abc'.at(-1) + 'abc'.charAt(1)"), "cb");
    assert_eq!(run("'A'.charCodeAt(0)"), Value::from(65));
    assert_eq!(error("'a'.repeat(-1)"), "RangeError: Invalid count value: -1");
}

#[test]
fn string_growth_is_bounded_by_loop_limit() {
    assert_eq!(error("'ab'.repeat(1e19)"), "RangeError: Invalid string length");
    assert_eq!(error("'ab'.repeat(5000)"), "RangeError: Invalid string length");
    assert_eq!(error("'x'.padStart(1e15)"), "RangeError: Invalid string length");
    assert_eq!(error("'x'.padEnd(9000, '-')"), "RangeError: Invalid string length");
    assert_eq!(run("'ab'.repeat(4096).length"), Value::from(8192));
    assert_eq!(run_str("''.repeat(1e19)"), "");
    assert_eq!(run_str("'x'.padStart(1e15, '')"), "x");
}

#[test]
fn split_treats_negative_limits_as_unbounded() {
    assert_eq!(run_str("'a,b'.split(',', -1).join('|')"), "a|b");
    assert_eq!(run("'a,b'.split(',', 0).length"), Value::from(0));
}

#[test]
fn string_replace() {
    assert_eq!(run_str("'a-b-c'.replace('-', '+')"), "a+b-c");
    assert_eq!(run_str("'a-b-c'.replaceAll('-', '+')"), "a+b+c");
    assert_eq!(run_str("'abc'.replaceAll('', '.')"), ".a.b.c.");
    assert_eq!(
        run_str("'x1x2'.replaceAll('x', (m, i) => `[${i}]`)"),
        "[0]1[2]2"
    );
}

#[test]
fn array_higher_order_methods() {
    assert_eq!(run_str("[1, 2, 3].map((x, i) => x * i).join()"), "0,2,6");
    assert_eq!(run_str("[1, 2, 3, 4].filter(x => x % 2 === 0).join()"), "2,4");
    assert_eq!(run("[1, 2, 3].reduce((a, b) => a + b)"), Value::from(6));
    assert_eq!(run_str("['a', 'b'].reduceRight((a, b) => a + b, '')"), "ba");
    assert_eq!(run("[5, 12, 8].find(x => x > 6)"), Value::from(12));
    assert_eq!(run("[5, 12, 8].findIndex(x => x > 100)"), Value::from(-1));
    assert_eq!(run("[5, 12, 8].findLast(x => x > 6)"), Value::from(8));
    assert_eq!(run("[1, 2].some(x => x > 1) && [1, 2].every(x => x > 0)"), Value::Bool(true));
    assert_eq!(run_str("[[1], [2, [3]]].flat().length"), "3");
    assert_eq!(run_str("[[1], [2, [3]]].flat(Infinity).join()"), "1,2,3");
    assert_eq!(run_str("[1, 2].flatMap(x => [x, x * 10]).join()"), "1,10,2,20");
    assert_eq!(run("let t = 0; [1, 2, 3].forEach(x => { t += x; }); t"), Value::from(6));
    assert_eq!(
        error("[].reduce((a, b) => a + b)"),
        "TypeError: Reduce of empty array with no initial value"
    );
    assert_eq!(error("[1].map(5)"), "TypeError: 5 is not a function");
}

#[test]
fn array_mutators() {
    let source = "
        const a = [1, 2, 3];
        a.push(4, 5);
        const popped = a.pop();
        const shifted = a.shift();
        a.unshift(0);
        [popped, shifted, a.join()].join(' ')
    ";
    assert_eq!(run_str(source), "5 1 0,2,3,4");
    let source = "
        const a = [1, 2, 3, 4];
        const removed = a.splice(1, 2, 'x');
        removed.join() + ' ' + a.join()
    ";
    assert_eq!(run_str(source), "2,3 1,x,4");
    assert_eq!(run_str("[1, 2, 3].reverse().join()"), "3,2,1");
    assert_eq!(run_str("[0, 0, 0, 0].fill(7, 1, 3).join()"), "0,7,7,0");
    assert_eq!(run_str("const a = [1, 2]; const b = a.with(0, 9); a.join() + b.join()"), "1,29,2");
}

#[test]
fn array_searching_and_slicing() {
    assert_eq!(run("[1, 2, 3].includes(2)"), Value::Bool(true));
    assert_eq!(run("[NaN].includes(NaN)"), Value::Bool(true));
    assert_eq!(run("[NaN].indexOf(NaN)"), Value::from(-1));
    assert_eq!(run("[1, 2, 1].lastIndexOf(1)"), Value::from(2));
    assert_eq!(run_str("[1, 2, 3, 4].slice(1, -1).join()"), "2,3");
    assert_eq!(run_str("[1].concat([2, 3], 4).join()"), "1,2,3,4");
    assert_eq!(run("[1, 2, 3].at(-1)"), Value::from(3));
    assert_eq!(run_str("[1, null, undefined, 2].join('-')"), "1---2");
}

#[test]
fn sort_is_stable_and_defaults_to_string_order() {
    assert_eq!(run_str("[10, 9, 1, undefined, 2].sort().join()"), "1,10,2,9,");
    assert_eq!(run_str("[10, 9, 1, 2].sort((a, b) => a - b).join()"), "1,2,9,10");
    let source = "
        const people = [
            { name: 'a', age: 30 },
            { name: 'b', age: 20 },
            { name: 'c', age: 30 },
            { name: 'd', age: 20 },
        ];
        people.sort((x, y) => x.age - y.age).map(p => p.name).join('')
    ";
    assert_eq!(run_str(source), "bdac");
}

#[test]
fn number_and_function_methods() {
    assert_eq!(run_str("(3.14159).toFixed(2)"), "3.14");
    assert_eq!(run_str("(255).toString(16)"), "ff");
    assert_eq!(run_str("(true).toString()"), "true");
    assert_eq!(error("(1).toFixed(101)"), "RangeError: toFixed() digits argument must be between 0 and 100");
    let source = "
        function sum(a, b) { return this.base + a + b; }
        sum.apply({ base: 10 }, [1, 2]) + sum.call({ base: 20 }, 1, 2)
    ";
    assert_eq!(run(source), Value::from(36));
    let source = "const add = (a, b) => a + b; const inc = add.bind(null, 1); inc(41)";
    assert_eq!(run(source), Value::from(42));
    assert_eq!(run_str("function named(a, b) {} named.name + named.length"), "named2");
}

#[test]
fn json() {
    assert_eq!(run("JSON.parse('{\"a\": [1, 2]}').a[1]"), Value::from(2));
    assert_eq!(
        run_str("JSON.stringify({ a: [1, 'x', null], b: undefined, c: true })"),
        r#"{"a":[1,"x",null],"c":true}"#
    );
    assert_eq!(
        run_str("JSON.stringify({ a: 1, b: 2 }, ['b'])"),
        r#"{"b":2}"#
    );
    assert_eq!(
        run_str("JSON.stringify({ a: 1, b: 'x' }, (k, v) => typeof v === 'number' ? v * 2 : v)"),
        r#"{"a":2,"b":"x"}"#
    );
    assert_eq!(run_str("JSON.stringify([1], null, 2)"), "[\n  1\n]");
    assert_eq!(run("JSON.stringify(undefined)"), Value::Undefined);
    assert!(error("JSON.parse('{')").starts_with("SyntaxError: Unexpected token in JSON"));
}
