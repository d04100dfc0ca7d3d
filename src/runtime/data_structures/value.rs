use std::{ fmt::{ self,
                  Debug,
                  Display,
                  Formatter },
           rc::Rc };
use crate::{ lang::code::BodyPtr,
             runtime::{ data_structures::{ memory::MemoryRef,
                                           variables::Variable },
                        error::{ self,
                                 script_error,
                                 ErrorKind },
                        interpreter::{ Interpreter,
                                       WordHandlerInfo } } };



/// A host implemented operation.  The same handler info is shared by the dictionary and by every
/// body the operation has been compiled into.
pub type NativeOperation = Rc<WordHandlerInfo>;



/// Core value enumeration used by the interpreter.  Every cell of a body and every item on the data
/// stack is one of these.
///
/// The engine dispatches on the variant.  Native operations are invoked, bodies are called, and
/// everything else is a literal that is pushed as is.
#[derive(Clone)]
pub enum Value
{
    /// The value represents nothing.  Used as the hole filler for grown buffers and as the result
    /// of failed lookups.
    None,

    /// We have an integer value.  Represented as an i64.
    Int(i64),

    /// A piece of text, usually a token read from the input.
    Text(String),

    /// A host implemented operation.
    Native(NativeOperation),

    /// A compiled instruction stream.  When executed this is a call to the word owning the body.
    Body(BodyPtr),

    /// An address into a growable buffer.
    Ref(MemoryRef),

    /// One of the interpreter's named variable cells.
    Var(Variable)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    /// Implement to handle the actual conversion.
    fn to_value(&self) -> Value;
}


/// Allow code to create a default Value object.
impl Default for Value
{
    fn default() -> Value
    {
        Value::None
    }
}


/// Integers and text compare by value.  Native operations and bodies compare by identity, as does
/// the buffer of a Ref.
impl PartialEq for Value
{
    fn eq(&self, other: &Value) -> bool
    {
        match ( self, other )
        {
            ( Value::None,      Value::None      ) => true,
            ( Value::Int(a),    Value::Int(b)    ) => a == b,
            ( Value::Text(a),   Value::Text(b)   ) => a == b,
            ( Value::Native(a), Value::Native(b) ) => Rc::ptr_eq(a, b),
            ( Value::Body(a),   Value::Body(b)   ) => Rc::ptr_eq(a, b),
            ( Value::Ref(a),    Value::Ref(b)    ) => a == b,
            ( Value::Var(a),    Value::Var(b)    ) => a == b,

            _                                      => false
        }
    }
}


/// Pretty print the value for display.
impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::None          => write!(f, "none"),
            Value::Int(value)    => write!(f, "{}", value),
            Value::Text(value)   => write!(f, "{}", value),
            Value::Native(value) => write!(f, "{}", value.name()),
            Value::Body(value)   => write!(f, "{}", value.borrow().name),
            Value::Ref(value)    => write!(f, "{}", value),
            Value::Var(value)    => write!(f, "{}", value)
        }
    }
}


impl Debug for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Text(value) => write!(f, "{:?}", value),
            _                  => write!(f, "{}", self)
        }
    }
}


/// Define implementations for converting between Values and the raw data types they represent.
macro_rules! value_conversion
{
    ($data_type:ty , $variant:ident , $as_ident:ident) =>
    {
        #[doc = concat!("Convert a value to ", stringify!($data_type), ".")]
        impl Value
        {
            pub fn $as_ident(&self, interpreter: &dyn Interpreter) -> error::Result<&$data_type>
            {
                match self
                {
                    Value::$variant(value) => Ok(value),
                    _ => script_error(interpreter,
                                      ErrorKind::TypeMismatch,
                                      format!("Expected {} but found {} {}.",
                                              stringify!($variant),
                                              self.type_name(),
                                              self))
                }
            }
        }


        #[doc = concat!("Allow conversion from ", stringify!($data_type), " to a Value.")]
        impl ToValue for $data_type
        {
            fn to_value(&self) -> Value
            {
                Value::$variant(self.clone())
            }
        }


        #[doc = concat!("Support converting from a ", stringify!($data_type), " to a Value.")]
        impl From<$data_type> for Value
        {
            fn from(original: $data_type) -> Value
            {
                original.to_value()
            }
        }
    };
}


/// Convenience implementation for converting a usize to a Value.  The usize type is not represented
/// directly in the Value enumeration, so it is converted to an i64 internally.
impl ToValue for usize
{
    fn to_value(&self) -> Value
    {
        Value::Int(*self as i64)
    }
}


/// Forth style flags, all bits set for true.
impl ToValue for bool
{
    fn to_value(&self) -> Value
    {
        Value::Int(if *self { -1 } else { 0 })
    }
}


// Implement the simple conversions for the value enumeration types.
value_conversion!(i64,             Int,    as_int);
value_conversion!(String,          Text,   as_text);
value_conversion!(NativeOperation, Native, as_native);
value_conversion!(BodyPtr,         Body,   as_body);
value_conversion!(MemoryRef,       Ref,    as_ref);
value_conversion!(Variable,        Var,    as_variable);


impl Value
{
    /// Check if the value is the None variant.
    pub fn is_none(&self) -> bool
    {
        matches!(self, Value::None)
    }

    /// Is the value something the engine would run rather than push?
    pub fn is_executable(&self) -> bool
    {
        matches!(self, Value::Native(_) | Value::Body(_))
    }

    /// Truth as seen by the conditional words.  Zero and none are false, everything else is true.
    pub fn is_true(&self) -> bool
    {
        match self
        {
            Value::None       => false,
            Value::Int(value) => *value != 0,
            _                 => true
        }
    }

    /// A short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str
    {
        match self
        {
            Value::None      => "none",
            Value::Int(_)    => "integer",
            Value::Text(_)   => "text",
            Value::Native(_) => "native operation",
            Value::Body(_)   => "body",
            Value::Ref(_)    => "reference",
            Value::Var(_)    => "variable"
        }
    }
}



#[cfg(test)]
mod tests
{
    use super::*;
    use crate::lang::code::Body;

    #[test]
    fn bodies_compare_by_identity()
    {
        let first = Body::new_ptr("A", vec![ Value::Int(1) ]);
        let second = Body::new_ptr("A", vec![ Value::Int(1) ]);

        assert!(Value::Body(first.clone()) == Value::Body(first.clone()));
        assert!(Value::Body(first) != Value::Body(second));
    }

    #[test]
    fn flags_are_forth_booleans()
    {
        assert!(true.to_value() == Value::Int(-1));
        assert!(false.to_value() == Value::Int(0));
        assert!(!Value::None.is_true());
        assert!(Value::Text(String::new()).is_true());
    }
}
