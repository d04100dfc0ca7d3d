/// Module for managing the input sources the tokenizer pulls characters from.
pub mod source_buffer;

/// Module for turning the raw character stream into whitespace separated words.
pub mod tokenizing;

/// Module for defining the threaded code bodies of compiled words and the frames that walk them.
pub mod code;
