use crate::{
    lang::{code::BodyPtr, source_buffer::SourceLocation},
    runtime::data_structures::value::{NativeOperation, Value},
};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// Flag bit marking a word as immediate.
pub const F_IMMED: u8 = 0x80;

/// What runs when a word is executed.
#[derive(Clone)]
pub enum WordDefinition {
    /// The word is a native word written in Rust.
    Native(NativeOperation),

    /// The word was compiled from Forth source, or built from a list of other words.
    Compiled(BodyPtr),
}

impl WordDefinition {
    /// The cell to place in a body to call this word.
    pub fn to_value(&self) -> Value {
        match self {
            WordDefinition::Native(operation) => Value::Native(operation.clone()),
            WordDefinition::Compiled(body) => Value::Body(body.clone()),
        }
    }
}

/// The information stored in the dictionary for each word.
#[derive(Clone)]
pub struct WordInfo {
    /// Where the word was defined, either in Rust or Forth source.
    pub location: SourceLocation,

    /// The name of the word.
    pub name: String,

    /// Flag bits, see F_IMMED.
    pub flags: u8,

    /// The word's native operation or compiled body.
    pub definition: WordDefinition,

    /// A simple description of the word.
    pub description: String,

    /// The stack signature of the word.
    pub signature: String,
}

impl WordInfo {
    /// Create a new WordInfo with no flags and no documentation.
    pub fn new(location: SourceLocation, name: String, definition: WordDefinition) -> WordInfo {
        WordInfo {
            location,
            name,
            flags: 0,
            definition,
            description: String::new(),
            signature: String::new(),
        }
    }

    /// Does the word run even while compiling?
    pub fn is_immediate(&self) -> bool {
        self.flags & F_IMMED != 0
    }

    /// Flip the immediate flag.
    pub fn toggle_immediate(&mut self) {
        self.flags ^= F_IMMED;
    }
}

/// The word dictionary used by the interpreter.  There is exactly one entry per name, defining a
/// word again replaces the old entry.  Bodies that already call the old entry keep calling it.
pub struct Dictionary {
    words: HashMap<String, WordInfo>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Pretty print the dictionary, sorted by name.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let max_size = self.words.keys().map(|name| name.len()).max().unwrap_or(0);
        let mut string_result = format!("{} words defined.\n\n", self.words.len());

        let mut keys: Vec<&String> = self.words.keys().collect();
        keys.sort();

        for key in keys.iter() {
            let word = &self.words[*key];

            string_result += &format!("{:width$}", key, width = max_size);

            string_result += {
                if word.is_immediate() {
                    "  immediate"
                } else {
                    "           "
                }
            };

            string_result += match word.definition {
                WordDefinition::Native(_) => "  native  ",
                WordDefinition::Compiled(_) => "  compiled",
            };

            string_result += &format!("  --  {}\n", word.description);
        }

        write!(formatter, "{}", string_result)
    }
}

impl Dictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Dictionary {
        Dictionary {
            words: HashMap::new(),
        }
    }

    /// Insert a word, replacing any existing word of the same name.
    pub fn insert(&mut self, name: String, info: WordInfo) {
        if let Some(old) = self.words.insert(name, info) {
            tracing::debug!(word = %old.name, "replaced existing word");
        }
    }

    /// Try to get a word from the dictionary.
    pub fn try_get(&self, name: &str) -> Option<&WordInfo> {
        self.words.get(name)
    }

    /// Try to get a word from the dictionary for modification.
    pub fn try_get_mut(&mut self, name: &str) -> Option<&mut WordInfo> {
        self.words.get_mut(name)
    }

    /// How many words are defined.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::code::Body;

    fn compiled(name: &str) -> WordInfo {
        WordInfo::new(
            SourceLocation::new(),
            name.to_string(),
            WordDefinition::Compiled(Body::new_ptr(name, Vec::new())),
        )
    }

    #[test]
    fn redefinition_replaces_the_entry() {
        let mut dictionary = Dictionary::new();
        let first = compiled("FOO");
        let second = compiled("FOO");
        let second_value = second.definition.to_value();

        dictionary.insert("FOO".to_string(), first);
        dictionary.insert("FOO".to_string(), second);

        assert_eq!(dictionary.len(), 1);
        assert!(dictionary.try_get("FOO").unwrap().definition.to_value() == second_value);
    }

    #[test]
    fn toggling_immediate_flips_the_flag_bit() {
        let mut word = compiled("BAR");

        word.toggle_immediate();
        assert!(word.is_immediate());
        assert_eq!(word.flags, F_IMMED);

        word.toggle_immediate();
        assert!(!word.is_immediate());
    }

    #[test]
    fn listing_marks_immediate_words() {
        let mut dictionary = Dictionary::new();
        let mut word = compiled("BAZ");

        word.toggle_immediate();
        dictionary.insert("BAZ".to_string(), word);

        let listing = dictionary.to_string();

        assert!(listing.starts_with("1 words defined."));
        assert!(listing.contains("BAZ  immediate  compiled"));
    }
}
