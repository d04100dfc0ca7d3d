/// All of the core data structures used by the virtual machine.
pub mod data_structures;

/// Module for defining the built-in native words that are available to Forth code.
pub mod built_ins;

/// Module for defining the error reporting of the virtual machine.
pub mod error;

/// Module for defining the execution engine and the outer interpreter.  This includes the traits
/// used by native words to examine and manipulate the interpreter's state.
pub mod interpreter;
