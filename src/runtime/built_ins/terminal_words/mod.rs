use std::io::Write;
use crate::{ add_native_word,
             lang::source_buffer::stdin_is_terminal,
             runtime::{ data_structures::value::{ ToValue, Value },
                        error::{ self, script_error, ErrorKind },
                        interpreter::Interpreter } };



/// Flush the output buffers.
///
/// Signature: ` -- `
fn word_term_flush(interpreter: &mut dyn Interpreter) -> error::Result<()>
{
    interpreter.output().flush()?;

    Ok(())
}

/// Write a character to the output and flush it.  Either a character code or text is accepted.
///
/// Signature: `character -- `
fn word_term_emit(interpreter: &mut dyn Interpreter) -> error::Result<()>
{
    let value = interpreter.pop()?;

    let text = match &value
        {
            Value::Int(code) =>
                match u32::try_from(*code).ok().and_then(char::from_u32)
                {
                    Some(character) => character.to_string(),
                    None => return script_error(interpreter,
                                                ErrorKind::TypeMismatch,
                                                format!("{} is not a character code.", code))
                },

            Value::Text(text) => text.clone(),

            _ => return script_error(interpreter,
                                     ErrorKind::TypeMismatch,
                                     format!("Can not emit {} {}.", value.type_name(), value))
        };

    let output = interpreter.output();

    write!(output, "{}", text)?;
    output.flush()?;

    Ok(())
}

/// Is input coming from an interactive terminal?
///
/// Signature: ` -- flag`
fn word_term_is_tty(interpreter: &mut dyn Interpreter) -> error::Result<()>
{
    interpreter.push(stdin_is_terminal().to_value());
    Ok(())
}



/// Register the terminal words.
pub fn register_terminal_words(interpreter: &mut dyn Interpreter)
{
    add_native_word!(interpreter, "EMIT", word_term_emit,
        "Write a character code or text to the output.",
        "character -- ");

    add_native_word!(interpreter, "FLUSH", word_term_flush,
        "Flush the output buffers.",
        " -- ");

    add_native_word!(interpreter, "TTY?", word_term_is_tty,
        "True if standard input is an interactive terminal.",
        " -- flag");
}
