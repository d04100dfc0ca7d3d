// Parameterized tests of the built-in vocabulary and the prelude, each case runs one snippet on top
// of a known stack.

mod common;

use common::eval_and_stack;
use forthvm::runtime::error::{ErrorKind, StackKind};
use test_case::test_case;

#[test_case("0", &[], &[0]; "zero")]
#[test_case("42", &[], &[42]; "number")]
#[test_case("-17", &[], &[-17]; "negative number")]
#[test_case("TRUE", &[], &[-1]; "true word")]
#[test_case("FALSE", &[], &[0]; "false word")]
#[test_case("+", &[2, 2], &[4]; "simple add")]
#[test_case("-", &[5, 2], &[3]; "simple sub")]
#[test_case("*", &[3, 4], &[12]; "simple mul")]
#[test_case("/", &[12, 3], &[4]; "simple div")]
#[test_case("/", &[-7, 2], &[-3]; "div rounds towards zero")]
#[test_case("MOD", &[13, 5], &[3]; "simple mod")]
#[test_case("MOD", &[-7, 2], &[-1]; "mod keeps the sign of the dividend")]
#[test_case("/MOD", &[13, 5], &[3, 2]; "simple div mod")]
#[test_case("+", &[i64::MAX, 1], &[i64::MIN]; "add wraps")]
#[test_case("1+", &[41], &[42]; "add one")]
#[test_case("1-", &[43], &[42]; "sub one")]
#[test_case("ABS", &[-9], &[9]; "abs of negative number")]
#[test_case("ABS", &[9], &[9]; "abs of positive number")]
#[test_case("NEGATE", &[9], &[-9]; "negate positive number")]
#[test_case("MIN", &[3, 7], &[3]; "min")]
#[test_case("MAX", &[3, 7], &[7]; "max")]
#[test_case("AND", &[12, 10], &[8]; "bit and")]
#[test_case("OR", &[12, 10], &[14]; "bit or")]
#[test_case("XOR", &[12, 10], &[6]; "bit xor")]
#[test_case("INVERT", &[0], &[-1]; "invert")]
fn arithmetic(code: &str, init: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init).unwrap(), expected);
}

#[test_case("DUP", &[1], &[1, 1]; "dup")]
#[test_case("DROP", &[1, 2], &[1]; "drop")]
#[test_case("SWAP", &[1, 2], &[2, 1]; "swap")]
#[test_case("OVER", &[1, 2], &[1, 2, 1]; "over")]
#[test_case("ROT", &[1, 2, 3], &[2, 3, 1]; "rot")]
#[test_case("-ROT", &[1, 2, 3], &[3, 1, 2]; "minus rot")]
#[test_case("NIP", &[1, 2], &[2]; "nip")]
#[test_case("TUCK", &[1, 2], &[2, 1, 2]; "tuck")]
#[test_case("2DUP", &[1, 2], &[1, 2, 1, 2]; "two dup")]
#[test_case("2DROP", &[1, 2, 3], &[1]; "two drop")]
#[test_case("2SWAP", &[1, 2, 3, 4], &[3, 4, 1, 2]; "two swap")]
#[test_case("?DUP", &[0], &[0]; "question dup of zero")]
#[test_case("?DUP", &[5], &[5, 5]; "question dup of non zero")]
#[test_case("DEPTH", &[7, 8], &[7, 8, 2]; "depth")]
#[test_case("2 PICK", &[1, 2, 3], &[1, 2, 3, 1]; "pick")]
#[test_case("SWAP SWAP", &[1, 2, 3], &[1, 2, 3]; "swap twice is identity")]
fn stack_shuffling(code: &str, init: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init).unwrap(), expected);
}

#[test_case("=", &[2, 2], &[-1]; "equal")]
#[test_case("=", &[2, 3], &[0]; "not equal")]
#[test_case("<>", &[2, 3], &[-1]; "different")]
#[test_case("<", &[2, 3], &[-1]; "less")]
#[test_case(">", &[2, 3], &[0]; "greater")]
#[test_case("<=", &[3, 3], &[-1]; "less or equal")]
#[test_case(">=", &[2, 3], &[0]; "greater or equal")]
#[test_case("0=", &[0], &[-1]; "zero equal")]
#[test_case("0<>", &[0], &[0]; "zero not equal")]
#[test_case("0<", &[-1], &[-1]; "zero less")]
#[test_case("0>", &[0], &[0]; "zero greater")]
#[test_case("NOT", &[0], &[-1]; "not")]
fn comparisons(code: &str, init: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init).unwrap(), expected);
}

#[test_case("DOUBLE", &[21], &[42]; "double")]
#[test_case("DOUBLE2", &[21], &[42]; "double by multiplication")]
#[test_case("16 BASE ! ff", &[], &[255]; "hexadecimal base")]
#[test_case("2 BASE ! 101", &[], &[5]; "binary base")]
#[test_case("CHAR A", &[], &[65]; "char")]
#[test_case("1 ( 2 3 ) 4", &[], &[1, 4]; "paren comment")]
#[test_case("1 \\ 2 3\n4", &[], &[1, 4]; "line comment")]
#[test_case("STATE @", &[], &[0]; "state starts interpreting")]
#[test_case("99 CONSTANT LIMIT LIMIT", &[], &[99]; "constant")]
#[test_case("VARIABLE X 5 X ! X @", &[], &[5]; "variable")]
#[test_case("' DUP EXECUTE", &[3], &[3, 3]; "tick execute")]
fn compound_words(code: &str, init: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init).unwrap(), expected);
}

#[test_case(": T IF 1 THEN 2 ; T", &[-1], &[1, 2]; "if taken")]
#[test_case(": T IF 1 THEN 2 ; T", &[0], &[2]; "if skipped")]
#[test_case(": T IF 1 ELSE 2 THEN 3 ; T", &[-1], &[1, 3]; "else not taken")]
#[test_case(": T IF 1 ELSE 2 THEN 3 ; T", &[0], &[2, 3]; "else taken")]
#[test_case(": T BEGIN 1- DUP 0= UNTIL ; T", &[5], &[0]; "begin until")]
#[test_case(": T BEGIN DUP 0> WHILE 1- REPEAT ; T", &[5], &[0]; "begin while repeat")]
#[test_case(": T BEGIN DUP 0> WHILE 1- REPEAT ; T", &[-3], &[-3]; "while never entered")]
#[test_case(": T BEGIN 1- DUP 0= IF EXIT THEN AGAIN ; T", &[3], &[0]; "begin again with exit")]
#[test_case(": FACT DUP 1 > IF DUP 1- RECURSE * THEN ; FACT", &[5], &[120]; "recursion")]
#[test_case(": T [ 6 7 * ] LITERAL ; T", &[], &[42]; "literal")]
#[test_case(": T ['] DUP ; T EXECUTE", &[4], &[4, 4]; "bracket tick")]
fn control_flow(code: &str, init: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init).unwrap(), expected);
}

#[test_case("DROP", &[], ErrorKind::StackUnderflow(StackKind::Data); "drop underflow")]
#[test_case("+", &[1], ErrorKind::StackUnderflow(StackKind::Data); "add underflow")]
#[test_case("/", &[1, 0], ErrorKind::DivisionByZero; "division by zero")]
#[test_case("MOD", &[1, 0], ErrorKind::DivisionByZero; "mod by zero")]
#[test_case("-1 PICK", &[1], ErrorKind::StackUnderflow(StackKind::Data); "negative pick")]
#[test_case("\"NOPE\" FIND", &[], ErrorKind::Parse { token: "\"NOPE\"".to_string(), definition: None }; "unknown token")]
#[test_case("1 BASE ! 1", &[], ErrorKind::InvalidBase; "base too small")]
#[test_case("HERE < ", &[1], ErrorKind::TypeMismatch; "variable is not a number")]
#[test_case("-1 RSP!", &[], ErrorKind::StackUnderflow(StackKind::Call); "negative call stack depth")]
fn errors(code: &str, init: &[i64], expected: ErrorKind) {
    let error = eval_and_stack(code, init).unwrap_err();

    assert_eq!(*error.kind(), expected);
}
