use std::env::var;
use rand::Rng;
use crate::{ add_native_word,
             runtime::{ data_structures::value::{ ToValue, Value },
                        error,
                        interpreter::Interpreter } };



/// The largest number RANDOM will produce.
const RANDOM_LIMIT: i64 = 1000;



/// Read a value from the environment variables.  Pushes none if the variable isn't set.
///
/// Signature: `name -- value_or_none`
fn word_user_env_read(interpreter: &mut dyn Interpreter) -> error::Result<()>
{
    let name = interpreter.pop_as_text()?;

    match var(name)
    {
        Ok(value) => interpreter.push(value.to_value()),
        Err(_)    => interpreter.push(Value::None)
    }

    Ok(())
}

/// Produce a pseudo-random number from 0 up to and including RANDOM_LIMIT.
///
/// Signature: ` -- n`
fn word_user_random(interpreter: &mut dyn Interpreter) -> error::Result<()>
{
    let number = rand::thread_rng().gen_range(0..=RANDOM_LIMIT);

    interpreter.push(number.to_value());
    Ok(())
}



/// Register the user words with the given interpreter.
pub fn register_user_words(interpreter: &mut dyn Interpreter)
{
    add_native_word!(interpreter, "GETENV", word_user_env_read,
        "Read an environment variable.",
        "name -- value_or_none");

    add_native_word!(interpreter, "RANDOM", word_user_random,
        "Produce a pseudo-random number between 0 and 1000.",
        " -- n");
}
