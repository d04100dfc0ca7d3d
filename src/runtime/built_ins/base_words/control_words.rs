use crate::{
    add_native_word,
    runtime::{
        data_structures::value::{ToValue, Value},
        error::{self, script_error, script_error_str, with_context, ErrorKind, StackKind},
        interpreter::Interpreter,
    },
};

/// Read the branch offset that follows a branch instruction.  The offset is left in place, the
/// caller decides whether to step past it.
fn branch_offset(interpreter: &mut dyn Interpreter) -> error::Result<i64> {
    let operand = interpreter.frame_mut()?.operand();
    let operand = with_context(interpreter, operand)?;

    match operand {
        Value::Int(offset) => Ok(offset),
        _ => script_error(
            interpreter,
            ErrorKind::MalformedBody,
            format!("Branch offset {} is not an integer.", operand),
        ),
    }
}

/// Push the cell following this instruction and skip over it.
///
/// Signature: ` -- value`
fn word_lit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let frame = interpreter.frame_mut()?;
    let operand = frame.operand();

    if operand.is_ok() {
        frame.advance();
    }

    let value = with_context(interpreter, operand)?;

    interpreter.push(value);
    Ok(())
}

/// Jump by the offset in the following cell.  The offset is relative to the offset cell itself.
///
/// Signature: ` -- `
fn word_branch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let offset = branch_offset(interpreter)?;
    let result = interpreter.frame_mut()?.jump(offset);

    with_context(interpreter, result)
}

/// Jump by the offset in the following cell if the flag is zero, otherwise carry on after the
/// offset.  Either way the jump lands where an unconditional branch with the same offset would.
///
/// Signature: `flag -- `
fn word_zero_branch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let condition = interpreter.pop_as_bool()?;
    let offset = branch_offset(interpreter)?;

    let frame = interpreter.frame_mut()?;

    frame.advance();

    if condition {
        return Ok(());
    }

    let result = frame.jump(offset.wrapping_sub(1));

    with_context(interpreter, result)
}

/// Run a word's definition taken from the stack.
///
/// Signature: `definition -- ???`
fn word_execute(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    if !value.is_executable() {
        return script_error(
            interpreter,
            ErrorKind::TypeMismatch,
            format!("Can not execute {} {}.", value.type_name(), value),
        );
    }

    interpreter.dispatch(value)
}

/// The depth of an empty call stack.
///
/// Signature: ` -- depth`
fn word_r0(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.push(Value::Int(0));
    Ok(())
}

/// The number of suspended frames.
///
/// Signature: ` -- depth`
fn word_rsp_fetch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.call_stack().len();

    interpreter.push(depth.to_value());
    Ok(())
}

/// Drop suspended frames until the call stack is the given depth.
///
/// Signature: `depth -- `
fn word_rsp_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.pop_as_int()?;

    if depth < 0 {
        return script_error_str(
            interpreter,
            ErrorKind::StackUnderflow(StackKind::Call),
            "Call stack depth can not be negative.",
        );
    }

    interpreter.call_stack_truncate(depth as usize);
    Ok(())
}

/// Signature: ` -- ???`
fn word_interpret(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.interpret()
}

/// Return from the current word right away.
///
/// Signature: ` -- `
fn word_exit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let frame = interpreter.frame_mut()?;
    let length = frame.body.borrow().cells.len();

    frame.position = length;
    Ok(())
}

/// Register the words that steer the execution engine.
pub fn register_control_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "LIT", word_lit,
        "Push the next cell of the body instead of running it.",
        " -- value");

    add_native_word!(interpreter, "BRANCH", word_branch,
        "Jump relative to the offset cell that follows.",
        " -- ");

    add_native_word!(interpreter, "0BRANCH", word_zero_branch,
        "Jump relative to the offset cell that follows if the flag is zero.",
        "flag -- ");

    add_native_word!(interpreter, "EXECUTE", word_execute,
        "Run a definition taken from the stack.",
        "definition -- ???");

    add_native_word!(interpreter, "R0", word_r0,
        "Depth of the empty call stack.",
        " -- depth");

    add_native_word!(interpreter, "RSP@", word_rsp_fetch,
        "Current depth of the call stack.",
        " -- depth");

    add_native_word!(interpreter, "RSP!", word_rsp_store,
        "Cut the call stack back to the given depth.",
        "depth -- ");

    add_native_word!(interpreter, "INTERPRET", word_interpret,
        "Read one word of input and run it, compile it, or push it as a number.",
        " -- ???");

    add_native_word!(interpreter, "EXIT", word_exit,
        "Return from the current word.",
        " -- ");
}
