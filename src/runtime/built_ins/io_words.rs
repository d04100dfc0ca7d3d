use crate::{
    add_native_word,
    lang::{code::pretty_print_body, source_buffer::InputSource},
    runtime::{
        data_structures::dictionary::WordDefinition,
        error::{self, script_error, script_error_str, with_context, ErrorKind},
        interpreter::Interpreter,
    },
};
use std::{fmt::Write as _, io::Write, path::Path};

/// Print a value followed by a new line.
///
/// Signature: `value -- `
fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    writeln!(interpreter.output(), "{}", value)?;
    Ok(())
}

/// Print a value followed by a space, the classic Forth dot.
///
/// Signature: `value -- `
fn word_dot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    write!(interpreter.output(), "{} ", value)?;
    Ok(())
}

/// Signature: ` -- `
fn word_cr(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    writeln!(interpreter.output())?;
    Ok(())
}

/// Print the depth of the stack and its contents, the top of the stack last.  The stack is left as
/// is.
///
/// Signature: ` -- `
fn word_print_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let mut line = format!("<{}>", interpreter.stack().len());

    for value in interpreter.stack() {
        let _ = write!(&mut line, " {:?}", value);
    }

    writeln!(interpreter.output(), "{}", line)?;
    Ok(())
}

/// Print out the current word dictionary.
///
/// Signature: ` -- `
fn word_print_dictionary(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let listing = interpreter.dictionary().to_string();

    write!(interpreter.output(), "{}", listing)?;
    Ok(())
}

/// Show the definition of the next word of input.
///
/// Signature: ` -- ` reads `name` from the input.
fn word_see(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.next_word()?;

    let text = match interpreter.find_word(&name) {
        Some(info) => match &info.definition {
            WordDefinition::Compiled(body) => pretty_print_body(&body.borrow(), info.is_immediate()),
            WordDefinition::Native(operation) => format!(
                "{} is a native word, {} registered at {}.",
                name,
                info.description,
                operation.location()
            ),
        },

        None => {
            return script_error(
                interpreter,
                ErrorKind::UndefinedWord,
                format!("Word {} not found.", name),
            );
        }
    };

    writeln!(interpreter.output(), "{}", text)?;
    Ok(())
}

/// Read source from a file, the path is the next word of input.  When the file is used up input
/// carries on from where it left off.
///
/// Signature: ` -- ` reads `path` from the input.
fn word_include(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let path = interpreter.next_word()?;
    let source = InputSource::from_file(Path::new(&path));
    let source = with_context(interpreter, source)?;

    interpreter.push_source(source);
    Ok(())
}

/// Leave the interpreter.
///
/// Signature: ` -- `
fn word_bye(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.output().flush()?;

    script_error_str(interpreter, ErrorKind::EndOfInput, "Goodbye.")
}

/// Register the words that print and read program text.
pub fn register_io_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "PRINT", word_print,
        "Print a value followed by a new line.",
        "value -- ");

    add_native_word!(interpreter, ".", word_dot,
        "Print a value followed by a space.",
        "value -- ");

    add_native_word!(interpreter, "CR", word_cr,
        "Print a new line.",
        " -- ");

    add_native_word!(interpreter, ".S", word_print_stack,
        "Print the contents of the data stack without changing it.",
        " -- ");

    add_native_word!(interpreter, "WORDS", word_print_dictionary,
        "List every word in the dictionary.",
        " -- ");

    add_native_word!(interpreter, "SEE", word_see,
        "Show the definition of the next word of input.",
        " -- ");

    add_native_word!(interpreter, "INCLUDE", word_include,
        "Read source from the file named by the next word of input.",
        " -- ");

    add_native_word!(interpreter, "BYE", word_bye,
        "Leave the interpreter.",
        " -- ");
}
