use crate::{
    add_native_immediate_word, add_native_word,
    runtime::{
        data_structures::{dictionary::F_IMMED, value::Value},
        error::{self, script_error, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Read the next word of input and push it as text.
///
/// Signature: ` -- name`
fn word_word(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let word = interpreter.next_word()?;

    interpreter.push(Value::Text(word));
    Ok(())
}

/// Read the next character of input and push it as text.
///
/// Signature: ` -- character`
fn word_key(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let key = interpreter.next_key()?;

    interpreter.push(Value::Text(key.to_string()));
    Ok(())
}

/// Read the next word of input and push the character code of its first character.
///
/// Signature: ` -- code`
fn word_char(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let word = interpreter.next_word()?;

    match word.chars().next() {
        Some(first) => {
            interpreter.push(Value::Int(first as i64));
            Ok(())
        }

        None => script_error(
            interpreter,
            ErrorKind::EndOfInput,
            "CHAR found no word to read.".to_string(),
        ),
    }
}

/// Look up a word by name, pushing its definition and its flags.
///
/// Signature: `name -- definition flags`
fn word_find(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_text()?;

    let found = interpreter
        .find_word(&name)
        .map(|info| (info.definition.to_value(), info.flags));

    match found {
        Some((definition, flags)) => {
            interpreter.push(definition);
            interpreter.push(Value::Int(flags as i64));
            Ok(())
        }

        None => script_error(
            interpreter,
            ErrorKind::UndefinedWord,
            format!("Word {} not found.", name),
        ),
    }
}

/// Skip input up to and including the next closing parenthesis.
///
/// Signature: ` -- `
fn word_comment(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    while interpreter.next_key()? != ')' {}

    Ok(())
}

/// Register the words that read input and the compiler words built out of them.  The composite
/// words are made from the natives, so the natives they use must already be registered.
pub fn register_compiler_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    add_native_word!(interpreter, "WORD", word_word,
        "Read the next word of input.",
        " -- name");

    add_native_word!(interpreter, "KEY", word_key,
        "Read the next character of input.",
        " -- character");

    add_native_word!(interpreter, "CHAR", word_char,
        "Push the character code of the first character of the next word of input.",
        " -- code");

    add_native_word!(interpreter, "FIND", word_find,
        "Look up a word, pushing its definition and flags.",
        "name -- definition flags");

    add_native_immediate_word!(interpreter, "(", word_comment,
        "Comment, skip input up to the closing parenthesis.",
        " -- ");

    let words = |names: &[&str]| -> Vec<Value> {
        names.iter().map(|name| Value::Text(name.to_string())).collect()
    };

    interpreter.add_compiled_word(
        "QUIT",
        &[
            Value::Text("R0".to_string()),
            Value::Text("RSP!".to_string()),
            Value::Text("INTERPRET".to_string()),
            Value::Text("BRANCH".to_string()),
            Value::Int(-4),
        ],
        0,
        "The top level loop, reset the call stack and interpret input forever.",
        " -- ",
    )?;

    interpreter.add_compiled_word(
        ":",
        &words(&["WORD", "CREATE", "]"]),
        0,
        "Start a new word definition.",
        " -- ",
    )?;

    interpreter.add_compiled_word(
        ";",
        &words(&["["]),
        F_IMMED,
        "End the current word definition.",
        " -- ",
    )?;

    interpreter.add_compiled_word(
        "'",
        &words(&["WORD", "FIND", "DROP"]),
        0,
        "Push the definition of the next word of input.",
        " -- definition",
    )?;

    interpreter.add_compiled_word(
        "[']",
        &words(&["WORD", "FIND", "DROP", "LIT", "LIT", ",", ","]),
        F_IMMED,
        "Compile code that pushes the definition of the next word of input.",
        " -- ",
    )?;

    interpreter.add_compiled_word(
        "[COMPILE]",
        &words(&["WORD", "FIND", "DROP", ","]),
        F_IMMED,
        "Compile the next word of input even if it is immediate.",
        " -- ",
    )?;

    interpreter.add_compiled_word(
        "DOUBLE",
        &words(&["DUP", "+"]),
        0,
        "Double a number.",
        "n -- n*2",
    )?;

    interpreter.add_compiled_word(
        "DOUBLE2",
        &[
            Value::Text("LIT".to_string()),
            Value::Int(2),
            Value::Text("*".to_string()),
        ],
        0,
        "Double a number by multiplication.",
        "n -- n*2",
    )?;

    Ok(())
}
