//! # Legacy Unit Decoder
//!
//! Older recipe exports store the unit of an ingredient as the text of a
//! dictionary literal instead of a structured object, e.g.
//! `{'name': 'tablespoon', 'abbreviation': 'tbsp', 'fraction': True}`.
//! This module recovers the mapping from that text.
//!
//! ## Grammar
//!
//! ```text
//! dict  := '{' [ entry { ',' entry } [ ',' ] ] '}'
//! entry := key ':' value
//! key   := quoted-string | identifier | number
//! value := quoted-string | number | 'None' | 'True' | 'False' | dict | list
//! list  := '[' [ value { ',' value } [ ',' ] ] ']'
//! ```
//!
//! Nested dicts and lists are accepted so that real exports stay balanced, but
//! entries holding them are left out of the result: a decoded unit only ever
//! carries strings, numbers and booleans. `None` entries are dropped as well.
//! Anything outside the grammar makes the whole decode fail.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_card::legacy_unit::{decode, is_dict_shaped};
//!
//! let text = "{'name': 'cup', 'plural': None}";
//! assert!(is_dict_shaped(text));
//!
//! let unit = decode(text).unwrap();
//! assert_eq!(unit.name(), "cup");
//! assert!(unit.get("plural").is_none());
//!
//! assert!(decode("{not valid").is_none());
//! ```

use crate::ingredient_model::DecodedUnit;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::iter::Peekable;
use std::str::CharIndices;

/// Nesting limit for dicts and lists inside the literal
const MAX_DEPTH: usize = 32;

lazy_static! {
    static ref INTEGER_REGEX: Regex =
        Regex::new(r"^[+-]?\d+$").expect("Integer literal pattern should be valid");
    static ref FLOAT_REGEX: Regex =
        Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?$")
            .expect("Float literal pattern should be valid");
    static ref IDENTIFIER_REGEX: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Identifier pattern should be valid");
}

/// Check whether a unit string looks like a serialized dictionary
pub fn is_dict_shaped(text: &str) -> bool {
    text.trim_start().starts_with('{')
}

/// Decode legacy unit text, returning `None` on any structural failure
pub fn decode(text: &str) -> Option<DecodedUnit> {
    match try_decode(text) {
        Ok(unit) => Some(unit),
        Err(e) => {
            debug!("Could not decode legacy unit text: {}", e);
            None
        }
    }
}

/// Decode legacy unit text, reporting why decoding failed
pub fn try_decode(text: &str) -> Result<DecodedUnit, DecodeError> {
    let mut parser = Parser::new(text)?;
    let entries = match parser.parse_value(0)? {
        Literal::Dict(entries) => entries,
        _ => return Err(DecodeError::NotADictionary),
    };

    if let Some(token) = parser.next_token()? {
        return Err(DecodeError::TrailingInput(token.describe()));
    }

    let mut mapping = Map::new();
    for (key, literal) in entries {
        match literal.into_scalar() {
            Some(value) => {
                mapping.insert(key, value);
            }
            None => {
                // A later `None` or container hides an earlier scalar for the same key
                mapping.remove(&key);
                trace!("Dropping non-scalar legacy unit entry '{}'", key);
            }
        }
    }

    Ok(DecodedUnit::from_entries(mapping))
}

/// Errors that can occur while decoding legacy unit text
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Input ended in the middle of the literal
    UnexpectedEnd,
    /// A quoted string was never closed
    UnterminatedString,
    /// A character that cannot start any token
    UnexpectedCharacter(char),
    /// A token that is valid but not allowed at this position
    UnexpectedToken(String),
    /// A bare word that is not a recognized literal
    UnrecognizedLiteral(String),
    /// A malformed escape sequence inside a quoted string
    InvalidEscape(String),
    /// The top-level value is not a dictionary
    NotADictionary,
    /// Content after the closing brace
    TrailingInput(String),
    /// Dicts or lists nested deeper than the limit
    TooDeep,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnexpectedEnd => write!(f, "Unexpected end of input"),
            DecodeError::UnterminatedString => write!(f, "Unterminated quoted string"),
            DecodeError::UnexpectedCharacter(ch) => write!(f, "Unexpected character: {:?}", ch),
            DecodeError::UnexpectedToken(token) => write!(f, "Unexpected token: {}", token),
            DecodeError::UnrecognizedLiteral(word) => write!(f, "Unrecognized literal: {}", word),
            DecodeError::InvalidEscape(seq) => write!(f, "Invalid escape sequence: {}", seq),
            DecodeError::NotADictionary => write!(f, "Top-level value is not a dictionary"),
            DecodeError::TrailingInput(token) => write!(f, "Trailing input after dictionary: {}", token),
            DecodeError::TooDeep => write!(f, "Nesting exceeds {} levels", MAX_DEPTH),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    /// Quoted string with escapes resolved
    Str(String),
    /// Unquoted run of literal characters (numbers, identifiers, None/True/False)
    Word(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Str(s) => format!("string {:?}", s),
            Token::Word(w) => w.clone(),
        }
    }
}

/// Intermediate parse result before narrowing to scalar values
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Number(Number),
    Bool(bool),
    None,
    Dict(Vec<(String, Literal)>),
    List(Vec<Literal>),
}

impl Literal {
    fn into_scalar(self) -> Option<Value> {
        match self {
            Literal::Str(s) => Some(Value::String(s)),
            Literal::Number(n) => Some(Value::Number(n)),
            Literal::Bool(b) => Some(Value::Bool(b)),
            Literal::None | Literal::Dict(_) | Literal::List(_) => None,
        }
    }
}

struct Lexer<'a> {
    source: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.source.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.source.next();
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, DecodeError> {
        self.skip_whitespace();

        let ch = match self.source.peek() {
            Some(&(_, ch)) => ch,
            None => return Ok(None),
        };

        let token = match ch {
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '\'' | '"' => {
                self.source.next();
                Token::Str(self.quoted(ch)?)
            }
            ch if is_word_char(ch) => Token::Word(self.word()),
            other => return Err(DecodeError::UnexpectedCharacter(other)),
        };

        Ok(Some(token))
    }

    fn single(&mut self, token: Token) -> Token {
        self.source.next();
        token
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&(_, ch)) = self.source.peek() {
            if !is_word_char(ch) {
                break;
            }
            word.push(ch);
            self.source.next();
        }
        word
    }

    fn quoted(&mut self, quote: char) -> Result<String, DecodeError> {
        let mut text = String::new();
        loop {
            let (_, ch) = self.source.next().ok_or(DecodeError::UnterminatedString)?;
            match ch {
                c if c == quote => return Ok(text),
                '\\' => text.push(self.escape()?),
                c => text.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, DecodeError> {
        let (_, ch) = self.source.next().ok_or(DecodeError::UnterminatedString)?;
        let resolved = match ch {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'x' => self.hex_escape('x', 2)?,
            'u' => self.hex_escape('u', 4)?,
            'U' => self.hex_escape('U', 8)?,
            other => return Err(DecodeError::InvalidEscape(format!("\\{}", other))),
        };
        Ok(resolved)
    }

    fn hex_escape(&mut self, marker: char, digits: usize) -> Result<char, DecodeError> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            let (_, ch) = self.source.next().ok_or(DecodeError::UnterminatedString)?;
            hex.push(ch);
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DecodeError::InvalidEscape(format!("\\{}{}", marker, hex)));
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| DecodeError::InvalidEscape(format!("\\{}{}", marker, hex)))
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '+' | '-')
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, DecodeError> {
        let mut lexer = Lexer::new(source);
        let peeked = lexer.next_token()?;
        Ok(Self { lexer, peeked })
    }

    fn next_token(&mut self) -> Result<Option<Token>, DecodeError> {
        let current = self.peeked.take();
        self.peeked = self.lexer.next_token()?;
        Ok(current)
    }

    fn expect_token(&mut self) -> Result<Token, DecodeError> {
        self.next_token()?.ok_or(DecodeError::UnexpectedEnd)
    }

    fn parse_value(&mut self, depth: usize) -> Result<Literal, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }

        match self.expect_token()? {
            Token::LBrace => self.parse_dict_body(depth),
            Token::LBracket => self.parse_list_body(depth),
            Token::Str(s) => Ok(Literal::Str(s)),
            Token::Word(word) => parse_word(&word),
            other => Err(DecodeError::UnexpectedToken(other.describe())),
        }
    }

    fn parse_dict_body(&mut self, depth: usize) -> Result<Literal, DecodeError> {
        let mut entries = Vec::new();
        loop {
            let key = match self.expect_token()? {
                Token::RBrace => break,
                Token::Str(s) => s,
                Token::Word(word) => parse_key_word(&word)?,
                other => return Err(DecodeError::UnexpectedToken(other.describe())),
            };

            match self.expect_token()? {
                Token::Colon => {}
                other => return Err(DecodeError::UnexpectedToken(other.describe())),
            }

            let value = self.parse_value(depth + 1)?;
            entries.push((key, value));

            match self.expect_token()? {
                Token::Comma => continue,
                Token::RBrace => break,
                other => return Err(DecodeError::UnexpectedToken(other.describe())),
            }
        }
        Ok(Literal::Dict(entries))
    }

    fn parse_list_body(&mut self, depth: usize) -> Result<Literal, DecodeError> {
        let mut items = Vec::new();
        loop {
            if self.peeked == Some(Token::RBracket) {
                self.next_token()?;
                break;
            }

            items.push(self.parse_value(depth + 1)?);

            match self.expect_token()? {
                Token::Comma => continue,
                Token::RBracket => break,
                other => return Err(DecodeError::UnexpectedToken(other.describe())),
            }
        }
        Ok(Literal::List(items))
    }
}

/// Classify a bare word in value position
fn parse_word(word: &str) -> Result<Literal, DecodeError> {
    match word {
        "None" => Ok(Literal::None),
        "True" => Ok(Literal::Bool(true)),
        "False" => Ok(Literal::Bool(false)),
        _ => parse_number(word)
            .map(Literal::Number)
            .ok_or_else(|| DecodeError::UnrecognizedLiteral(word.to_string())),
    }
}

/// Classify a bare word in key position
fn parse_key_word(word: &str) -> Result<String, DecodeError> {
    if IDENTIFIER_REGEX.is_match(word) {
        return Ok(word.to_string());
    }
    parse_number(word)
        .map(|number| number.to_string())
        .ok_or_else(|| DecodeError::UnrecognizedLiteral(word.to_string()))
}

fn parse_number(word: &str) -> Option<Number> {
    if INTEGER_REGEX.is_match(word) {
        if let Ok(int) = word.trim_start_matches('+').parse::<i64>() {
            return Some(Number::from(int));
        }
    }
    if FLOAT_REGEX.is_match(word) {
        return word
            .trim_start_matches('+')
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64);
    }
    None
}
