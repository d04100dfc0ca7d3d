use crate::{
    add_native_word,
    runtime::{data_structures::value::ToValue, error, interpreter::Interpreter},
};

/// Helper function for the ordering comparisons.  Only integers have an order, so both values are
/// required to be integers.  The result is pushed as a Forth flag.
fn compare_op(interpreter: &mut dyn Interpreter, cop: fn(i64, i64) -> bool) -> error::Result<()> {
    let b = interpreter.pop_as_int()?;
    let a = interpreter.pop_as_int()?;

    interpreter.push(cop(a, b).to_value());
    Ok(())
}

/// Helper function for comparing a single integer against zero.
fn zero_op(interpreter: &mut dyn Interpreter, cop: fn(i64) -> bool) -> error::Result<()> {
    let a = interpreter.pop_as_int()?;

    interpreter.push(cop(a).to_value());
    Ok(())
}

/// Are 2 values equal?  Any two values may be compared, references are equal when they point at the
/// same cell of the same buffer.
///
/// Signature: `a b -- flag`
fn word_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push((a == b).to_value());
    Ok(())
}

/// Signature: `a b -- flag`
fn word_not_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push((a != b).to_value());
    Ok(())
}

/// Register the comparison words.
pub fn register_comparison_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "=", word_equal,
        "True if a is equal to b.",
        "a b -- flag");

    add_native_word!(interpreter, "<>", word_not_equal,
        "True if a is not equal to b.",
        "a b -- flag");

    add_native_word!(interpreter, "<",
        |interp: &mut dyn Interpreter| compare_op(interp, |a, b| a < b),
        "True if a is less than b.",
        "a b -- flag");

    add_native_word!(interpreter, ">",
        |interp: &mut dyn Interpreter| compare_op(interp, |a, b| a > b),
        "True if a is greater than b.",
        "a b -- flag");

    add_native_word!(interpreter, "<=",
        |interp: &mut dyn Interpreter| compare_op(interp, |a, b| a <= b),
        "True if a is less than or equal to b.",
        "a b -- flag");

    add_native_word!(interpreter, ">=",
        |interp: &mut dyn Interpreter| compare_op(interp, |a, b| a >= b),
        "True if a is greater than or equal to b.",
        "a b -- flag");

    add_native_word!(interpreter, "0=",
        |interp: &mut dyn Interpreter| zero_op(interp, |a| a == 0),
        "True if n is zero.",
        "n -- flag");

    add_native_word!(interpreter, "0<>",
        |interp: &mut dyn Interpreter| zero_op(interp, |a| a != 0),
        "True if n is not zero.",
        "n -- flag");

    add_native_word!(interpreter, "0<",
        |interp: &mut dyn Interpreter| zero_op(interp, |a| a < 0),
        "True if n is negative.",
        "n -- flag");

    add_native_word!(interpreter, "0>",
        |interp: &mut dyn Interpreter| zero_op(interp, |a| a > 0),
        "True if n is positive.",
        "n -- flag");
}
