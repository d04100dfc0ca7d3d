/// Module contains the Value enumeration and it's implementation.  Values are what flows through
/// the data stack and what the cells of a compiled body are made of.
pub mod value;

/// Growable memory addressed through Refs.  Used both for the body under construction and for
/// buffers allocated by Forth code.
pub mod memory;

/// Named global cells, including the well known interpreter state variables.
pub mod variables;

/// The dictionary module provides the word dictionary used by the interpreter.
pub mod dictionary;
