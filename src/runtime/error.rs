use std::{ error::Error,
           process::Termination,
           fmt::{ self, Debug, Display, Formatter }, process::ExitCode };
use crate::lang::{ code::CallStack,
                   source_buffer::SourceLocation };

use super::interpreter::{ CodeManagement,
                         ExecutionEngine,
                         Interpreter };



pub type Result<T> = std::result::Result<T, ScriptError>;



/// Which of the interpreter's two stacks ran dry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StackKind
{
    Data,
    Call
}


impl Display for StackKind
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            StackKind::Data => write!(f, "data"),
            StackKind::Call => write!(f, "call")
        }
    }
}



/// The category of an error.  The top level uses this to decide if a failure is fatal or if the
/// interpreter can recover and carry on reading input.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind
{
    /// A token was neither a known word nor a number in the current base.  If the token was seen
    /// while a word was being compiled that word's name is recorded.
    Parse { token: String, definition: Option<String> },

    /// A pop was attempted on an empty stack.
    StackUnderflow(StackKind),

    /// Execution ran off the end of a body, or a branch went somewhere it shouldn't.
    MalformedBody,

    /// A memory reference pointed outside of its buffer.
    InvalidAddress,

    /// Arithmetic was attempted on references into two different buffers.
    ForeignReference,

    /// A value of the wrong variant was found where something else was required.
    TypeMismatch,

    /// Division or modulus by zero.
    DivisionByZero,

    /// A word lookup failed outside of the outer interpreter's number fallback.
    UndefinedWord,

    /// The number base variable holds something that isn't usable as a radix.
    InvalidBase,

    /// Reading or writing failed at the operating system level.
    Io,

    /// The primary input has been exhausted, or the program asked to leave.
    EndOfInput
}



/// Any error that occurs during the execution of a Forth program.
#[derive(Clone)]
pub struct ScriptError
{
    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// What sort of error this is.
    kind: ErrorKind,

    /// The description of the error.
    error: String,

    /// The frames that were suspended at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl Error for ScriptError
{
}


/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError
{
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


/// Pretty print the ScriptError for debugging the error that occurred within the Forth program.
impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.error)?,
            None => write!(f, "{}", self.error)?
        }

        if let Some(call_stack) = &self.call_stack
        {
            if !call_stack.is_empty()
            {
                write!(f, "\n\nCall stack\n")?;

                for item in call_stack.iter().rev()
                {
                    writeln!(f, "  {}", item)?;
                }
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{:?}: {}", self.kind, self)
    }
}


impl ScriptError
{
    /// Create a new ScriptError.
    pub fn new(location: Option<SourceLocation>,
               kind: ErrorKind,
               error: String,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError
            {
                location,
                kind,
                error,
                call_stack
            }
    }

    /// Create a new Script Error and wrap it in a Result::Err.
    pub fn new_as_result<T>(location: Option<SourceLocation>,
                            kind: ErrorKind,
                            error: String,
                            call_stack: Option<CallStack>) -> Result<T>
    {
        Err(ScriptError::new(location, kind, error, call_stack))
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// What sort of error occurred.
    pub fn kind(&self) -> &ErrorKind
    {
        &self.kind
    }

    /// The description of the error.
    pub fn error(&self) -> &String
    {
        &self.error
    }

    /// If available, the script's call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }

    /// Fill in the location and call stack from the interpreter if the error was raised somewhere
    /// that didn't know them.
    pub fn in_context(mut self, interpreter: &dyn Interpreter) -> ScriptError
    {
        if self.location.is_none()
        {
            self.location = interpreter.current_location();
        }

        if self.call_stack.is_none()
        {
            self.call_stack = Some(call_stack_snapshot(interpreter));
        }

        self
    }

    /// Fatal errors end the session, all others let the top level reset and carry on.
    pub fn is_fatal(&self) -> bool
    {
        matches!(self.kind, ErrorKind::Parse { .. } | ErrorKind::EndOfInput)
    }
}


/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(None, ErrorKind::Io, format!("I/O error: {}", error), None)
    }
}



/// A convenience function for creating a ScriptError and wrapping in in a Result::Err using the
/// interpreter's current location and call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: String) -> Result<T>
{
    let location = interpreter.current_location();
    let call_stack = call_stack_snapshot(interpreter);

    ScriptError::new_as_result(location, kind, message, Some(call_stack))
}



/// The suspended frames with the active frame, if any, on top.
fn call_stack_snapshot(interpreter: &dyn Interpreter) -> CallStack
{
    let mut call_stack = interpreter.call_stack().clone();

    if let Some(frame) = interpreter.frame()
    {
        call_stack.push(frame.clone());
    }

    call_stack
}



pub fn script_error_str<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: &str) -> Result<T>
{
    script_error(interpreter, kind, message.to_string())
}



/// Attach the interpreter's location and call stack to an error raised by code that had no access
/// to the interpreter.
pub fn with_context<T>(interpreter: &dyn Interpreter, result: Result<T>) -> Result<T>
{
    result.map_err(|error| error.in_context(interpreter))
}
