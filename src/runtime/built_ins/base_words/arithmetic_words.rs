use crate::{
    add_native_word,
    runtime::{
        data_structures::value::{ToValue, Value},
        error::{self, script_error, with_context, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Helper function to handle integer math operations.  The operation is passed in as an argument.
/// The stack operations and value conversions are handled here.
fn math_op(interpreter: &mut dyn Interpreter, iop: fn(i64, i64) -> i64) -> error::Result<()> {
    let b = interpreter.pop_as_int()?;
    let a = interpreter.pop_as_int()?;

    interpreter.push(iop(a, b).to_value());
    Ok(())
}

/// Helper function for the single value integer operations.
fn unary_op(interpreter: &mut dyn Interpreter, iop: fn(i64) -> i64) -> error::Result<()> {
    let a = interpreter.pop_as_int()?;

    interpreter.push(iop(a).to_value());
    Ok(())
}

/// Helper function for operations that also work on memory references.  Integers are handled by
/// `iop`, a reference and an integer move the reference's address, and two references into the
/// same buffer are handled by `rop`.
fn address_op(
    interpreter: &mut dyn Interpreter,
    name: &str,
    iop: fn(i64, i64) -> i64,
    rop: Option<fn(i64, i64) -> i64>,
) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    let result = match (&a, &b) {
        (Value::Int(a), Value::Int(b)) => Value::Int(iop(*a, *b)),

        (Value::Ref(reference), Value::Int(offset)) => {
            Value::Ref(reference.with_address(iop(reference.address(), *offset)))
        }

        (Value::Int(offset), Value::Ref(reference)) if rop.is_some() => {
            Value::Ref(reference.with_address(iop(*offset, reference.address())))
        }

        (Value::Ref(first), Value::Ref(second)) => match rop {
            Some(rop) => Value::Ref(with_context(interpreter, first.combine(second, rop))?),
            None => Value::Int(with_context(interpreter, first.distance(second))?),
        },

        _ => {
            return script_error(
                interpreter,
                ErrorKind::TypeMismatch,
                format!(
                    "Can not apply {} to {} {} and {} {}.",
                    name,
                    a.type_name(),
                    a,
                    b.type_name(),
                    b
                ),
            );
        }
    };

    interpreter.push(result);
    Ok(())
}

/// Helper function for division style operations that must refuse a zero divisor.
fn division_op(
    interpreter: &mut dyn Interpreter,
    iop: fn(i64, i64) -> Vec<i64>,
) -> error::Result<()> {
    let b = interpreter.pop_as_int()?;
    let a = interpreter.pop_as_int()?;

    if b == 0 {
        return script_error(
            interpreter,
            ErrorKind::DivisionByZero,
            format!("Division of {} by zero.", a),
        );
    }

    for result in iop(a, b) {
        interpreter.push(result.to_value());
    }

    Ok(())
}

/// Add two integers, or move a reference's address.
///
/// Signature: `a b -- result`
fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    address_op(interpreter, "+", i64::wrapping_add, Some(i64::wrapping_add))
}

/// Subtract two integers, move a reference's address back, or get the distance between two
/// references into the same buffer.
///
/// Signature: `a b -- result`
fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    address_op(interpreter, "-", i64::wrapping_sub, None)
}

/// Signature: `a b -- result`
fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    math_op(interpreter, i64::wrapping_mul)
}

/// Signature: `a b -- quotient`
fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    division_op(interpreter, |a, b| vec![a.wrapping_div(b)])
}

/// Signature: `a b -- remainder`
fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    division_op(interpreter, |a, b| vec![a.wrapping_rem(b)])
}

/// Signature: `a b -- remainder quotient`
fn word_divide_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    division_op(interpreter, |a, b| vec![a.wrapping_rem(b), a.wrapping_div(b)])
}

/// Bitwise and of two integers, or mask a reference's address.
///
/// Signature: `a b -- result`
fn word_and(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    address_op(interpreter, "AND", |a, b| a & b, Some(|a, b| a & b))
}

/// Register the arithmetic and bit logic words with the interpreter.
pub fn register_arithmetic_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "+", word_add,
        "Add two numbers, or offset a reference.",
        "a b -- result");

    add_native_word!(interpreter, "-", word_subtract,
        "Subtract two numbers, offset a reference, or find the distance between references.",
        "a b -- result");

    add_native_word!(interpreter, "*", word_multiply,
        "Multiply two numbers.",
        "a b -- result");

    add_native_word!(interpreter, "/", word_divide,
        "Divide two numbers, rounding towards zero.",
        "a b -- quotient");

    add_native_word!(interpreter, "MOD", word_mod,
        "Remainder of dividing two numbers.",
        "a b -- remainder");

    add_native_word!(interpreter, "/MOD", word_divide_mod,
        "Divide two numbers, keeping both the remainder and the quotient.",
        "a b -- remainder quotient");

    add_native_word!(interpreter, "NEGATE",
        |interp: &mut dyn Interpreter| unary_op(interp, i64::wrapping_neg),
        "Negate a number.",
        "n -- -n");

    add_native_word!(interpreter, "ABS",
        |interp: &mut dyn Interpreter| unary_op(interp, i64::wrapping_abs),
        "Absolute value of a number.",
        "n -- |n|");

    add_native_word!(interpreter, "1+",
        |interp: &mut dyn Interpreter| unary_op(interp, |a| a.wrapping_add(1)),
        "Add 1 to the top of the stack.",
        "n -- n+1");

    add_native_word!(interpreter, "1-",
        |interp: &mut dyn Interpreter| unary_op(interp, |a| a.wrapping_sub(1)),
        "Subtract 1 from the top of the stack.",
        "n -- n-1");

    add_native_word!(interpreter, "MIN",
        |interp: &mut dyn Interpreter| math_op(interp, i64::min),
        "The smaller of two numbers.",
        "a b -- min");

    add_native_word!(interpreter, "MAX",
        |interp: &mut dyn Interpreter| math_op(interp, i64::max),
        "The larger of two numbers.",
        "a b -- max");

    add_native_word!(interpreter, "AND", word_and,
        "Bitwise and of two numbers, or mask a reference's address.",
        "a b -- result");

    add_native_word!(interpreter, "OR",
        |interp: &mut dyn Interpreter| math_op(interp, |a, b| a | b),
        "Bitwise or of two numbers.",
        "a b -- result");

    add_native_word!(interpreter, "XOR",
        |interp: &mut dyn Interpreter| math_op(interp, |a, b| a ^ b),
        "Bitwise exclusive or of two numbers.",
        "a b -- result");

    add_native_word!(interpreter, "INVERT",
        |interp: &mut dyn Interpreter| unary_op(interp, |a| !a),
        "Invert every bit of a number.",
        "n -- ~n");
}
