use crate::{
    lang::{
        code::{BodyPtr, CallStack, Frame},
        source_buffer::{InputSource, SourceLocation},
    },
    runtime::{
        data_structures::{
            dictionary::{Dictionary, WordInfo},
            value::Value,
            variables::VariableList,
        },
        error,
    },
};
use std::{io::Write, rc::Rc};

pub mod forth_interpreter;

/// The data stack of values managed by the interpreter.
pub type ValueStack = Vec<Value>;

/// Trait for managing the interpreter's data stack.  Intended to be called by native words.
pub trait InterpreterStack {
    /// Use to examine the full data stack when required.  One example is for the stack dump command
    /// `.S` and the debug trace.
    fn stack(&self) -> &ValueStack;

    /// Push a value onto the stack.  This is the primary way of sending values to words.
    fn push(&mut self, value: Value);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Value>;

    /// Pop the top value and attempt to convert it to an integer.  If the value is not an integer
    /// a type mismatch error is returned.  We also fail if the stack is empty.
    fn pop_as_int(&mut self) -> error::Result<i64>;

    /// Pop the top value and require it to be text.
    fn pop_as_text(&mut self) -> error::Result<String>;

    /// Pop the top value and test it for truth, zero and none are false.
    fn pop_as_bool(&mut self) -> error::Result<bool>;

    /// Copy the value `depth` items down from the top of the stack, 0 being the top.
    fn peek_at(&self, depth: usize) -> error::Result<Value>;

    /// Drop everything on the data stack.
    fn stack_clear(&mut self);
}

/// Trait for the inner interpreter.  It runs one frame at a time and keeps the frames it has
/// suspended on the call stack.
pub trait ExecutionEngine {
    /// The active frame, if the engine is running.
    fn frame(&self) -> Option<&Frame>;

    /// The active frame for modification.  Native words that read their operands use this.  It's
    /// an error to call this while the engine is idle.
    fn frame_mut(&mut self) -> error::Result<&mut Frame>;

    /// The frames waiting for the active frame to finish.
    fn call_stack(&self) -> &CallStack;

    /// Cut the call stack back to the given depth.  Does nothing if it is already that shallow.
    fn call_stack_truncate(&mut self, depth: usize);

    /// Run a body from its start until it, and every call it makes, is finished.  The active
    /// frame at the time of the call is saved and restored afterwards, so natives can use this to
    /// run code while they themselves are running.
    fn execute(&mut self, body: BodyPtr) -> error::Result<()>;

    /// Run a single value as if it were the only cell of a body.
    fn execute_value(&mut self, value: Value) -> error::Result<()>;

    /// Act on one cell.  Native operations are invoked, bodies are called, and everything else is
    /// pushed onto the data stack.
    fn dispatch(&mut self, value: Value) -> error::Result<()>;
}

/// Definition of a word handler function.  This is the function that is called when a word is to
/// be executed.  Can be a lambda, a callable object or a Rust function.
pub type WordHandler = dyn Fn(&mut dyn Interpreter) -> error::Result<()>;

/// Information about a word handler.  Once created it's fields are read-only and accessed by member
/// methods.
pub struct WordHandlerInfo {
    name: String,
    location: SourceLocation,
    handler: Rc<WordHandler>,
}

/// Core implementation of WordHandlerInfo's methods.
impl WordHandlerInfo {
    /// Create a new WordHandlerInfo instance.
    pub fn new(
        name: String,
        location: SourceLocation,
        handler: Rc<WordHandler>,
    ) -> WordHandlerInfo {
        WordHandlerInfo {
            name,
            location,
            handler,
        }
    }

    /// The name of the word itself.
    pub fn name(&self) -> &String {
        &self.name
    }

    /// Where this word was registered in the Rust source code.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The Handler function for the word.
    pub fn handler(&self) -> Rc<WordHandler> {
        self.handler.clone()
    }
}

/// Simplify registering a native regular word with the interpreter.
///
/// Required parameters are, the interpreter instance to register with.  The name of the word to
/// register.  The word function handler to execute for the word.  A simple description of the word.
/// As well as the word's stack signature.
#[macro_export]
macro_rules! add_native_word {
    (
        $interpreter:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use std::rc::Rc;
        use $crate::runtime::interpreter::WordManagement;

        // Register the word while recording where in the source code the word was registered
        // from.
        $interpreter.add_word(
            $crate::location_here!(),
            $name.to_string(),        // Name.
            Rc::new($function),       // Function handler.
            $description.to_string(), // Word description.
            $signature.to_string(),   // Word signature.
            0,                        // No flags, the word follows STATE.
        );
    }};
}

/// Simplify registering a native immediate word with the interpreter.  That is, this word is
/// executed even while a definition is being compiled.
///
/// Required parameters are, the interpreter instance to register with.  The name of the word to
/// register.  The word function handler to execute for the word.  A simple description of the word.
/// As well as the word's stack signature.
#[macro_export]
macro_rules! add_native_immediate_word {
    (
        $interpreter:expr ,
        $name:literal ,
        $function:expr ,
        $description:literal ,
        $signature:literal
    ) => {{
        use std::rc::Rc;
        use $crate::runtime::{data_structures::dictionary::F_IMMED, interpreter::WordManagement};

        // Register the word while recording where in the source code the word was registered
        // from.
        $interpreter.add_word(
            $crate::location_here!(),
            $name.to_string(),        // Name.
            Rc::new($function),       // Function handler.
            $description.to_string(), // Word description.
            $signature.to_string(),   // Word signature.
            F_IMMED,                  // The word runs even while compiling.
        );
    }};
}

/// Trait for managing the words known to the interpreter.
pub trait WordManagement {
    /// Add a new native word to the interpreter's dictionary.
    fn add_word(
        &mut self,
        location: SourceLocation,
        name: String,
        handler: Rc<WordHandler>,
        description: String,
        signature: String,
        flags: u8,
    );

    /// Add a word whose body is a list of other words and literals.  Text cells name the words to
    /// call, integer cells are kept as is.  Used to seed the dictionary with words that are built
    /// out of other words.
    fn add_compiled_word(
        &mut self,
        name: &str,
        cells: &[Value],
        flags: u8,
        description: &str,
        signature: &str,
    ) -> error::Result<BodyPtr>;

    /// Find a word in the interpreter's dictionary by name.
    fn find_word(&self, word: &str) -> Option<&WordInfo>;

    /// The value to place in a body to call the named word.  Fails if there is no such word.
    fn word_value(&self, word: &str) -> error::Result<Value>;

    /// Create a new, empty word.  It becomes LATEST and HERE is pointed at the start of its body.
    /// The word can be called right away.
    fn create_word(&mut self, name: &str) -> BodyPtr;

    /// Flip the immediate flag of the LATEST word.
    fn toggle_immediate(&mut self) -> error::Result<()>;

    /// The current word dictionary of words known to the interpreter.
    fn dictionary(&self) -> &Dictionary;
}

/// Trait for the interpreter's variables and the memory they reach.
pub trait VariableManagement {
    /// The interpreter state record.
    fn variables(&self) -> &VariableList;

    /// The interpreter state record for modification.
    fn variables_mut(&mut self) -> &mut VariableList;

    /// Read through a variable or a memory reference.
    fn fetch(&self, target: &Value) -> error::Result<Value>;

    /// Write through a variable or a memory reference.
    fn store(&mut self, target: &Value, value: Value) -> error::Result<()>;

    /// Store a value at HERE and move HERE on to the next cell.
    fn comma(&mut self, value: Value) -> error::Result<()>;
}

/// Trait for reading program text and deciding, one word at a time, to run it or compile it.
pub trait CodeManagement {
    /// Where the input is currently being read from, if anywhere.
    fn current_location(&self) -> Option<SourceLocation>;

    /// Get and consume the next character of input.
    fn next_key(&mut self) -> error::Result<char>;

    /// Get the next whitespace delimited word of input.
    fn next_word(&mut self) -> error::Result<String>;

    /// Read one word of input and either execute it, compile it, or treat it as a number.
    fn interpret(&mut self) -> error::Result<()>;

    /// Start reading from a new source.  When it runs out the previous source carries on.
    fn push_source(&mut self, source: InputSource);

    /// Run the outer interpreter over a block of text until it is used up.  The input that was
    /// active beforehand is restored afterwards.
    ///
    /// The name is used to represent the text in error reporting.
    fn evaluate(&mut self, name: &str, text: &str) -> error::Result<()>;

    /// Compile a list of program words, (for example from the command line,) into a body without
    /// running anything.  Integers become bare literals.
    fn compile_program(&mut self, words: &[String]) -> error::Result<BodyPtr>;

    /// Drop whatever is left of the current input line.
    fn discard_line(&mut self);
}

/// Core interpreter trait.
///
/// This trait brings together the traits that define the functionality of the Forth interpreter.
/// Managing the data stack, running bodies, the dictionary, the interpreter's variables, and
/// reading and compiling program text.
pub trait Interpreter:
    InterpreterStack + ExecutionEngine + WordManagement + VariableManagement + CodeManagement
{
    /// Where user visible output goes.
    fn output(&mut self) -> &mut dyn Write;

    /// Put the interpreter back into a usable state after an error.  Interpret mode is restored,
    /// both stacks are cleared and the rest of the input line is dropped.  The dictionary is kept.
    fn reset(&mut self);
}
