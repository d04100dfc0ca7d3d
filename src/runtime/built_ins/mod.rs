/// The core words of the language.
pub mod base_words;

/// Words that print values and read program text.
pub mod io_words;

/// Words that work with the terminal.
pub mod terminal_words;

/// Words that access the user's environment.
pub mod user_words;

use crate::runtime::{
    built_ins::{
        base_words::register_base_words, io_words::register_io_words,
        terminal_words::register_terminal_words, user_words::register_user_words,
    },
    error,
    interpreter::Interpreter,
};

/// Forth source for the words that are built from the native vocabulary.
const PRELUDE: &str = include_str!("prelude.f");

/// Register every native word, then compile the prelude on top of them.
pub fn register_builtin_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    register_base_words(interpreter)?;
    register_io_words(interpreter);
    register_terminal_words(interpreter);
    register_user_words(interpreter);

    interpreter.evaluate("<prelude>", PRELUDE)
}
