/// Words that manipulate the data stack.
mod stack_words;

/// Integer math and bit logic, as well as address arithmetic on references.
mod arithmetic_words;

/// Words that compare values.
mod comparison_words;

/// Words that read and write memory, variables and the interpreter's state.
mod memory_words;

/// Words that steer the execution engine.
mod control_words;

/// Words that read input, and the compiler words built from them.
mod compiler_words;

use crate::runtime::{
    built_ins::base_words::{
        arithmetic_words::register_arithmetic_words, comparison_words::register_comparison_words,
        compiler_words::register_compiler_words, control_words::register_control_words,
        memory_words::register_memory_words, stack_words::register_stack_words,
    },
    error,
    interpreter::Interpreter,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    register_stack_words(interpreter);
    register_arithmetic_words(interpreter);
    register_comparison_words(interpreter);
    register_memory_words(interpreter);
    register_control_words(interpreter);

    // Built out of the words above.
    register_compiler_words(interpreter)
}
