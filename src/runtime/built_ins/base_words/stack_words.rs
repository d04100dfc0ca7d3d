use crate::{
    add_native_word,
    runtime::{
        data_structures::value::ToValue,
        error::{self, script_error, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Duplicate the top value on the data stack.
///
/// Signature: `value -- value value`
fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push(value.clone());
    interpreter.push(value);

    Ok(())
}

/// Drop the top value on the data stack.
///
/// Signature: `value -- `
fn word_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop()?;

    Ok(())
}

/// Swap the top 2 values on the data stack.
///
/// Signature: `a b -- b a`
fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let a = interpreter.pop()?;
    let b = interpreter.pop()?;

    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Make a copy of the second value and place the copy on top.
///
/// Signature: `a b -- a b a`
fn word_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(a.clone());
    interpreter.push(b);
    interpreter.push(a);

    Ok(())
}

/// Rotate the third value to the top of the stack.
///
/// Signature: `a b c -- b c a`
fn word_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(c);
    interpreter.push(a);

    Ok(())
}

/// Rotate the top value under the next two.
///
/// Signature: `a b c -- c a b`
fn word_reverse_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(c);
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Drop the second value.
///
/// Signature: `a b -- b`
fn word_nip(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let _ = interpreter.pop()?;

    interpreter.push(b);

    Ok(())
}

/// Copy the top value under the second.
///
/// Signature: `a b -- b a b`
fn word_tuck(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b.clone());
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Signature: `a b -- a b a b`
fn word_two_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(a.clone());
    interpreter.push(b.clone());
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Signature: `a b -- `
fn word_two_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop()?;
    let _ = interpreter.pop()?;

    Ok(())
}

/// Signature: `a b c d -- c d a b`
fn word_two_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let d = interpreter.pop()?;
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(c);
    interpreter.push(d);
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Duplicate the top value only if it is true.
///
/// Signature: `value -- value value?`
fn word_question_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    if value.is_true() {
        interpreter.push(value.clone());
    }

    interpreter.push(value);

    Ok(())
}

/// Get the depth of the data stack before calling this word.
///
/// Signature: ` -- depth`
fn word_stack_depth(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.stack().len();

    interpreter.push(depth.to_value());
    Ok(())
}

/// Copy the nth value to the top of the stack, 0 being the top.
///
/// Signature: `... n -- ... value`
fn word_pick(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let index = interpreter.pop_as_int()?;

    if index < 0 {
        return script_error(
            interpreter,
            ErrorKind::StackUnderflow(error::StackKind::Data),
            format!("Can not pick negative index {}.", index),
        );
    }

    let value = interpreter.peek_at(index as usize)?;

    interpreter.push(value);
    Ok(())
}

/// Register the stack words with the interpreter.
pub fn register_stack_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "DUP", word_dup, "Duplicate the top value on the data stack.", "value -- value value");

    add_native_word!(interpreter, "DROP", word_drop, "Discard the top value on the data stack.", "value -- ");

    add_native_word!(interpreter, "SWAP", word_swap, "Swap the top 2 values on the data stack.", "a b -- b a");

    add_native_word!(interpreter, "OVER", word_over, "Copy the second value to the top.", "a b -- a b a");

    add_native_word!(interpreter, "ROT", word_rot, "Rotate the third value to the top.", "a b c -- b c a");

    add_native_word!(interpreter, "-ROT", word_reverse_rot, "Rotate the top value under the next two.", "a b c -- c a b");

    add_native_word!(interpreter, "NIP", word_nip, "Drop the second value.", "a b -- b");

    add_native_word!(interpreter, "TUCK", word_tuck, "Copy the top value under the second.", "a b -- b a b");

    add_native_word!(interpreter, "2DUP", word_two_dup, "Duplicate the top pair.", "a b -- a b a b");

    add_native_word!(interpreter, "2DROP", word_two_drop, "Discard the top pair.", "a b -- ");

    add_native_word!(interpreter, "2SWAP", word_two_swap, "Swap the top two pairs.", "a b c d -- c d a b");

    add_native_word!(interpreter, "?DUP", word_question_dup, "Duplicate the top value if it is true.", "value -- value value?");

    add_native_word!(interpreter, "DEPTH", word_stack_depth, "Get the depth of the data stack.", " -- depth");

    add_native_word!(interpreter, "PICK", word_pick, "Copy the nth value to the top, 0 is the top.", "... n -- ... value");
}
