use std::{ io::{ stdout,
                 Write },
           mem,
           rc::Rc };
use crate::{ lang::{ code::{ trace_line,
                             Body,
                             BodyPtr,
                             CallStack,
                             Frame },
                     source_buffer::{ InputSource,
                                      SourceBuffer,
                                      SourceLocation },
                     tokenizing::{ self,
                                   to_numeric,
                                   to_radix } },
             runtime::{ data_structures::{ dictionary::{ Dictionary,
                                                         WordDefinition,
                                                         WordInfo },
                                           memory::MemoryRef,
                                           value::Value,
                                           variables::VariableList },
                        error::{ self,
                                 script_error,
                                 script_error_str,
                                 ErrorKind,
                                 StackKind },
                        interpreter::{ CodeManagement,
                                       ExecutionEngine,
                                       Interpreter,
                                       InterpreterStack,
                                       ValueStack,
                                       VariableManagement,
                                       WordHandler,
                                       WordHandlerInfo,
                                       WordManagement } } };



/// The body QUIT is run from by the top level.
const TOP_LEVEL_WORD: &str = "QUIT";



/// The core interpreter implementation.  Holds both stacks, the dictionary, the interpreter state
/// variables, and the input and output streams.
pub struct ForthInterpreter
{
    /// The data stack used by the interpreter.
    stack: ValueStack,


    /// The frame the engine is currently running, if any.
    frame: Option<Frame>,

    /// The suspended frames waiting for the active one to finish.
    call_stack: CallStack,

    /// Used to tag frames in the debug trace.
    next_frame_id: usize,


    /// The dictionary of words known by the interpreter.
    dictionary: Dictionary,

    /// STATE, BASE, LATEST, HERE, DEBUG and any user variables.
    variables: VariableList,


    /// Where the outer interpreter reads its program text from.
    input: SourceBuffer,

    /// Where user visible output is written.
    output: Box<dyn Write>
}


impl std::fmt::Debug for ForthInterpreter
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("ForthInterpreter").finish_non_exhaustive()
    }
}


impl Interpreter for ForthInterpreter
{
    fn output(&mut self) -> &mut dyn Write
    {
        self.output.as_mut()
    }

    fn reset(&mut self)
    {
        self.variables.set_state(0);
        self.stack.clear();
        self.call_stack.clear();
        self.frame = None;
        self.input.discard_line();
    }
}


impl InterpreterStack for ForthInterpreter
{
    fn stack(&self) -> &ValueStack
    {
        &self.stack
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None => script_error_str(self, ErrorKind::StackUnderflow(StackKind::Data), "Stack underflow.")
        }
    }

    fn pop_as_int(&mut self) -> error::Result<i64>
    {
        let value = self.pop()?;
        let number = *value.as_int(self)?;

        Ok(number)
    }

    fn pop_as_text(&mut self) -> error::Result<String>
    {
        let value = self.pop()?;

        match value
        {
            Value::Text(text) => Ok(text),
            _ => script_error(self,
                              ErrorKind::TypeMismatch,
                              format!("Expected text but found {} {}.", value.type_name(), value))
        }
    }

    fn pop_as_bool(&mut self) -> error::Result<bool>
    {
        let value = self.pop()?;

        Ok(value.is_true())
    }

    fn peek_at(&self, depth: usize) -> error::Result<Value>
    {
        if depth >= self.stack.len()
        {
            return script_error(self,
                                ErrorKind::StackUnderflow(StackKind::Data),
                                format!("Stack holds {} items, can't reach item {}.",
                                        self.stack.len(),
                                        depth));
        }

        Ok(self.stack[self.stack.len() - 1 - depth].clone())
    }

    fn stack_clear(&mut self)
    {
        self.stack.clear();
    }
}


impl ExecutionEngine for ForthInterpreter
{
    fn frame(&self) -> Option<&Frame>
    {
        self.frame.as_ref()
    }

    fn frame_mut(&mut self) -> error::Result<&mut Frame>
    {
        match self.frame
        {
            Some(ref mut frame) => Ok(frame),
            None => script_error_str(self,
                                     ErrorKind::StackUnderflow(StackKind::Call),
                                     "No frame is running.")
        }
    }

    fn call_stack(&self) -> &CallStack
    {
        &self.call_stack
    }

    fn call_stack_truncate(&mut self, depth: usize)
    {
        self.call_stack.truncate(depth);
    }

    fn execute(&mut self, body: BodyPtr) -> error::Result<()>
    {
        // Run the new body in place of whatever frame is active, the engine halts once control
        // would return below the depth it started at.
        let entry = self.new_frame(body)?;
        let saved = mem::replace(&mut self.frame, Some(entry));
        let base = self.call_stack.len();

        let result = self.run_frames(base).map_err(|error| error.in_context(self));

        if result.is_err()
        {
            self.call_stack.truncate(base);
        }

        self.frame = saved;

        result
    }

    fn execute_value(&mut self, value: Value) -> error::Result<()>
    {
        self.execute(Body::new_ptr("<immediate>", vec![ value ]))
    }

    fn dispatch(&mut self, value: Value) -> error::Result<()>
    {
        match value
        {
            Value::Native(operation) =>
                {
                    let handler = operation.handler();

                    handler(self)
                },

            Value::Body(body) =>
                {
                    let next = self.new_frame(body)?;

                    if let Some(caller) = self.frame.replace(next)
                    {
                        self.call_stack.push(caller);
                    }

                    Ok(())
                },

            literal @ (Value::None | Value::Int(_) | Value::Text(_) | Value::Ref(_) | Value::Var(_)) =>
                {
                    self.push(literal);
                    Ok(())
                }
        }
    }
}


impl WordManagement for ForthInterpreter
{
    fn add_word(&mut self,
                location: SourceLocation,
                name: String,
                handler: Rc<WordHandler>,
                description: String,
                signature: String,
                flags: u8)
    {
        let info = Rc::new(WordHandlerInfo::new(name.clone(), location.clone(), handler));
        let mut word_info = WordInfo::new(location, name.clone(), WordDefinition::Native(info));

        word_info.flags = flags;
        word_info.description = description;
        word_info.signature = signature;

        self.dictionary.insert(name, word_info);
    }

    fn add_compiled_word(&mut self,
                         name: &str,
                         cells: &[Value],
                         flags: u8,
                         description: &str,
                         signature: &str) -> error::Result<BodyPtr>
    {
        let mut resolved = Vec::with_capacity(cells.len());

        for cell in cells
        {
            match cell
            {
                Value::Text(word) => resolved.push(self.word_value(word)?),
                _                 => resolved.push(cell.clone())
            }
        }

        let body = Body::new_ptr(name, resolved);
        let mut word_info = WordInfo::new(crate::location_here!(),
                                          name.to_string(),
                                          WordDefinition::Compiled(body.clone()));

        word_info.flags = flags;
        word_info.description = description.to_string();
        word_info.signature = signature.to_string();

        self.dictionary.insert(name.to_string(), word_info);

        Ok(body)
    }

    fn find_word(&self, word: &str) -> Option<&WordInfo>
    {
        self.dictionary.try_get(word)
    }

    fn word_value(&self, word: &str) -> error::Result<Value>
    {
        match self.dictionary.try_get(word)
        {
            Some(info) => Ok(info.definition.to_value()),
            None => script_error(self, ErrorKind::UndefinedWord, format!("Word {} not found.", word))
        }
    }

    fn create_word(&mut self, name: &str) -> BodyPtr
    {
        let body = Body::new_ptr(name, Vec::new());
        let location = self.input.location().clone();
        let word_info = WordInfo::new(location, name.to_string(), WordDefinition::Compiled(body.clone()));

        tracing::debug!(word = name, "created word");

        self.dictionary.insert(name.to_string(), word_info);
        self.variables.set_latest(name, MemoryRef::new(body.clone(), 0));

        body
    }

    fn toggle_immediate(&mut self) -> error::Result<()>
    {
        let latest = match self.variables.latest()
            {
                Some(latest) => latest,
                None => return script_error_str(self, ErrorKind::UndefinedWord, "No word has been created yet.")
            };

        match self.dictionary.try_get_mut(&latest)
        {
            Some(word) =>
                {
                    word.toggle_immediate();
                    Ok(())
                },

            None => script_error(self, ErrorKind::UndefinedWord, format!("Latest word {} is gone.", latest))
        }
    }

    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }
}


impl VariableManagement for ForthInterpreter
{
    fn variables(&self) -> &VariableList
    {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableList
    {
        &mut self.variables
    }

    fn fetch(&self, target: &Value) -> error::Result<Value>
    {
        match target
        {
            Value::Var(variable)   => Ok(self.variables.fetch(variable)),
            Value::Ref(reference)  => reference.fetch().map_err(|error| error.in_context(self)),
            _ => script_error(self,
                              ErrorKind::TypeMismatch,
                              format!("Can not fetch through {} {}.", target.type_name(), target))
        }
    }

    fn store(&mut self, target: &Value, value: Value) -> error::Result<()>
    {
        match target
        {
            Value::Var(variable) =>
                {
                    self.variables.store(variable, value);
                    Ok(())
                },

            Value::Ref(reference) => reference.store(value).map_err(|error| error.in_context(self)),

            _ => script_error(self,
                              ErrorKind::TypeMismatch,
                              format!("Can not store through {} {}.", target.type_name(), target))
        }
    }

    fn comma(&mut self, value: Value) -> error::Result<()>
    {
        let here = match self.variables.here()
            {
                Value::Ref(here) => here,
                other => return script_error(self,
                                             ErrorKind::TypeMismatch,
                                             format!("HERE holds {} {}, not a reference.",
                                                     other.type_name(),
                                                     other))
            };

        here.store(value).map_err(|error| error.in_context(self))?;
        self.variables.set_here(here.offset(1));

        Ok(())
    }
}


impl CodeManagement for ForthInterpreter
{
    fn current_location(&self) -> Option<SourceLocation>
    {
        Some(self.input.location().clone())
    }

    fn next_key(&mut self) -> error::Result<char>
    {
        self.input.next_char().map_err(|error| error.in_context(self))
    }

    fn next_word(&mut self) -> error::Result<String>
    {
        let (_, word) = tokenizing::next_word(&mut self.input).map_err(|error| error.in_context(self))?;

        Ok(word)
    }

    fn interpret(&mut self) -> error::Result<()>
    {
        let word = self.next_word()?;
        let compiling = self.variables.is_compiling();

        if let Some(info) = self.dictionary.try_get(&word)
        {
            let immediate = info.is_immediate();
            let definition = info.definition.to_value();

            return if immediate || !compiling
                {
                    self.execute_value(definition)
                }
                else
                {
                    self.comma(definition)
                };
        }

        let number = self.parse_number(&word)?;

        if compiling
        {
            // Compiled literals are stored bare, the engine pushes whatever it can't run.
            self.comma(Value::Int(number))
        }
        else
        {
            let lit = self.word_value("LIT")?;

            self.execute(Body::new_ptr("<literal>", vec![ lit, Value::Int(number) ]))
        }
    }

    fn push_source(&mut self, source: InputSource)
    {
        self.input.push_source(source);
    }

    fn evaluate(&mut self, name: &str, text: &str) -> error::Result<()>
    {
        let source = SourceBuffer::new(InputSource::from_text(name, text));
        let previous = mem::replace(&mut self.input, source);

        let error = loop
            {
                if let Err(error) = self.interpret()
                {
                    break error;
                }
            };

        self.input = previous;

        match error.kind()
        {
            ErrorKind::EndOfInput => Ok(()),
            _                     => Err(error)
        }
    }

    fn compile_program(&mut self, words: &[String]) -> error::Result<BodyPtr>
    {
        let mut cells = Vec::with_capacity(words.len());

        for word in words
        {
            match self.dictionary.try_get(word)
            {
                Some(info) => cells.push(info.definition.to_value()),
                None       => cells.push(Value::Int(self.parse_number(word)?))
            }
        }

        Ok(Body::new_ptr("<program>", cells))
    }

    fn discard_line(&mut self)
    {
        self.input.discard_line();
    }
}


impl ForthInterpreter
{
    /// Internal use only.  Tag a body with a new frame.
    fn new_frame(&mut self, body: BodyPtr) -> error::Result<Frame>
    {
        let frame = Frame::new(self.next_frame_id, body);

        self.next_frame_id += 1;

        if self.variables.debug()
        {
            writeln!(self.output, "entering frame {} ({})", frame.id, frame.body.borrow().name)?;
        }

        Ok(frame)
    }

    /// Internal use only.  The engine loop.  Keep running cells of the active frame, returning to
    /// suspended frames as frames finish, until the call stack is back at the base depth.
    fn run_frames(&mut self, base: usize) -> error::Result<()>
    {
        loop
        {
            let step = match &mut self.frame
                {
                    Some(frame) if !frame.is_exhausted() =>
                        {
                            if self.variables.debug()
                            {
                                let line = trace_line(frame, &self.stack);

                                writeln!(self.output, "{}", line)?;
                            }

                            let cell = frame.operand()?;

                            frame.advance();
                            Some(cell)
                        },

                    Some(frame) =>
                        {
                            if self.variables.debug()
                            {
                                writeln!(self.output, "exiting frame {}", frame.id)?;
                            }

                            None
                        },

                    None => return Ok(())
                };

            match step
            {
                Some(cell) => self.dispatch(cell)?,

                None =>
                    {
                        if self.call_stack.len() <= base
                        {
                            return Ok(());
                        }

                        self.frame = self.call_stack.pop();
                    }
            }
        }
    }

    /// Internal use only.  Convert a word to a number in the current base, or fail with a parse
    /// error naming the word and the definition being compiled.
    fn parse_number(&self, word: &str) -> error::Result<i64>
    {
        let base = self.variables.base();

        let radix = match to_radix(&base)
            {
                Some(radix) => radix,
                None => return script_error(self, ErrorKind::InvalidBase, format!("BASE {} is not a usable radix.", base))
            };

        if let Some(number) = to_numeric(word, radix)
        {
            return Ok(number);
        }

        let definition = if self.variables.is_compiling() { self.variables.latest() } else { None };
        let message = match &definition
            {
                Some(name) => format!("PARSE ERROR: {} in definition of {}.", word, name),
                None       => format!("PARSE ERROR: {}.", word)
            };

        script_error(self,
                     ErrorKind::Parse { token: word.to_string(), definition },
                     message)
    }

    /// Run QUIT until the input runs out.  Errors other than parse errors are reported, the
    /// interpreter is reset and QUIT starts over.
    pub fn run_top_level(&mut self) -> error::Result<()>
    {
        let quit = self.word_value(TOP_LEVEL_WORD)?;

        loop
        {
            match self.execute_value(quit.clone())
            {
                Ok(()) => continue,

                Err(error) if *error.kind() == ErrorKind::EndOfInput => return Ok(()),

                Err(error) if error.is_fatal() => return Err(error),

                Err(error) =>
                    {
                        tracing::warn!(kind = ?error.kind(), "recovering from error");

                        self.output.flush()?;
                        eprintln!("Error: {}", error);

                        self.reset();
                    }
            }
        }
    }

    /// Compile the words of a program and run it once.  BYE, or running out of input, count as a
    /// normal end.
    pub fn run_program(&mut self, words: &[String]) -> error::Result<()>
    {
        let program = self.compile_program(words)?;

        match self.execute(program)
        {
            Err(error) if *error.kind() == ErrorKind::EndOfInput => Ok(()),
            result => result
        }
    }
}


impl ForthInterpreter
{
    /// Create an interpreter with an empty dictionary reading from the given source and writing to
    /// the given output.
    pub fn new(input: InputSource, output: Box<dyn Write>) -> ForthInterpreter
    {
        ForthInterpreter
            {
                stack: Vec::with_capacity(20),

                frame: None,
                call_stack: CallStack::with_capacity(40),
                next_frame_id: 0,

                dictionary: Dictionary::new(),
                variables: VariableList::new(),

                input: SourceBuffer::new(input),
                output
            }
    }
}


impl Default for ForthInterpreter
{
    fn default() -> Self
    {
        Self::new(InputSource::stdin(), Box::new(stdout()))
    }
}
