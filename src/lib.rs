/// Module for managing the incoming program text, tokenizing it, and the threaded code
/// representation that the compiler produces from it.
#[macro_use]
pub mod lang;

/// Module for the runtime and the data structures used by the virtual machine.  As well as the
/// execution engine and outer interpreter themselves.
#[macro_use]
pub mod runtime;
