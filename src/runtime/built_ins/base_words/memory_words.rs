use crate::{
    add_native_immediate_word, add_native_word,
    runtime::{
        data_structures::{
            memory::MemoryRef,
            value::Value,
            variables::{BASE, DEBUG, HERE, LATEST, STATE},
        },
        error::{self, script_error, with_context, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Push the handle of one of the interpreter state variables.
fn push_variable(interpreter: &mut dyn Interpreter, index: usize) -> error::Result<()> {
    let handle = interpreter.variables().handle(index);

    match handle {
        Some(variable) => {
            interpreter.push(Value::Var(variable));
            Ok(())
        }

        None => script_error(
            interpreter,
            ErrorKind::UndefinedWord,
            format!("Variable slot {} is not defined.", index),
        ),
    }
}

/// Read the value a variable or reference points at.
///
/// Signature: `target -- value`
fn word_fetch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let target = interpreter.pop()?;
    let value = interpreter.fetch(&target)?;

    interpreter.push(value);
    Ok(())
}

/// Write a value through a variable or reference.  References past the end of their buffer grow
/// the buffer.
///
/// Signature: `value target -- `
fn word_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let target = interpreter.pop()?;
    let value = interpreter.pop()?;

    interpreter.store(&target, value)
}

/// Append a value to the body at HERE.
///
/// Signature: `value -- `
fn word_comma(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.comma(value)
}

/// Switch to interpret mode.
///
/// Signature: ` -- `
fn word_interpret_mode(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.variables_mut().set_state(0);
    Ok(())
}

/// Switch to compile mode.
///
/// Signature: ` -- `
fn word_compile_mode(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.variables_mut().set_state(1);
    Ok(())
}

/// Create a new empty word from a name on the stack.  The new word becomes LATEST and HERE points
/// at its body.
///
/// Signature: `name -- `
fn word_create(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_text()?;

    interpreter.create_word(&name);
    Ok(())
}

/// Signature: ` -- `
fn word_immediate(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.toggle_immediate()
}

/// Define a new variable.  The word pushes the variable's handle.
///
/// Signature: ` -- ` reads `name` from the input.
fn word_variable(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.next_word()?;
    let variable = interpreter.variables_mut().define(&name, Value::Int(0));

    interpreter.create_word(&name);
    interpreter.comma(Value::Var(variable))
}

/// Define a word that pushes a fixed value.
///
/// Signature: `value -- ` reads `name` from the input.
fn word_constant(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.next_word()?;
    let value = interpreter.pop()?;
    let lit = interpreter.word_value("LIT")?;

    interpreter.create_word(&name);
    interpreter.comma(lit)?;
    interpreter.comma(value)
}

/// Allocate a new buffer of cells and define a word that pushes a reference to its start.
///
/// Signature: `size -- ` reads `name` from the input.
fn word_buffer(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.next_word()?;
    let size = interpreter.pop_as_int()?;

    if size < 0 {
        return script_error(
            interpreter,
            ErrorKind::InvalidAddress,
            format!("Can not allocate a buffer of {} cells.", size),
        );
    }

    let buffer = MemoryRef::allocate(&name, size as usize);
    let buffer = with_context(interpreter, buffer)?;

    interpreter.create_word(&name);
    interpreter.comma(Value::Ref(buffer))
}

/// Register the words that read and write memory and the interpreter's state.
pub fn register_memory_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "@", word_fetch,
        "Read the value a variable or reference points at.",
        "target -- value");

    add_native_word!(interpreter, "!", word_store,
        "Write a value through a variable or reference.",
        "value target -- ");

    add_native_word!(interpreter, ",", word_comma,
        "Append a value to the body at HERE and move HERE along.",
        "value -- ");

    add_native_word!(interpreter, "STATE",
        |interp: &mut dyn Interpreter| push_variable(interp, STATE),
        "The compile state, 0 to interpret and 1 to compile.",
        " -- variable");

    add_native_word!(interpreter, "BASE",
        |interp: &mut dyn Interpreter| push_variable(interp, BASE),
        "The radix used to read numbers.",
        " -- variable");

    add_native_word!(interpreter, "LATEST",
        |interp: &mut dyn Interpreter| push_variable(interp, LATEST),
        "The name of the most recently created word.",
        " -- variable");

    add_native_word!(interpreter, "HERE",
        |interp: &mut dyn Interpreter| push_variable(interp, HERE),
        "Reference to where the next compiled cell goes.",
        " -- variable");

    add_native_word!(interpreter, "DEBUG",
        |interp: &mut dyn Interpreter| push_variable(interp, DEBUG),
        "Set to non-zero to trace execution.",
        " -- variable");

    add_native_immediate_word!(interpreter, "[", word_interpret_mode,
        "Switch to interpret mode.",
        " -- ");

    add_native_word!(interpreter, "]", word_compile_mode,
        "Switch to compile mode.",
        " -- ");

    add_native_word!(interpreter, "CREATE", word_create,
        "Create a new, empty word and point HERE at it.",
        "name -- ");

    add_native_immediate_word!(interpreter, "IMMEDIATE", word_immediate,
        "Toggle the immediate flag of the latest word.",
        " -- ");

    add_native_word!(interpreter, "VARIABLE", word_variable,
        "Define a new variable named by the next word of input.",
        " -- ");

    add_native_word!(interpreter, "CONSTANT", word_constant,
        "Define a word named by the next word of input that pushes a value.",
        "value -- ");

    add_native_word!(interpreter, "BUFFER", word_buffer,
        "Define a word named by the next word of input that pushes a reference to a new buffer.",
        "size -- ");
}
