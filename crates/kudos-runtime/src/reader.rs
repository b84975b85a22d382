//! Token-stream reader.
//!
//! [`JsonReader`] is the surface generated deserializers call. [`TokenReader`]
//! implements it over a parsed `serde_json` document flattened into tokens.

use crate::error::RuntimeError;
use kudos_core::ir::JsonToken;
use serde_json::{Number, Value as Json};

///
/// JsonReader
///

pub trait JsonReader {
    fn begin_object(&mut self) -> Result<(), RuntimeError>;
    fn end_object(&mut self) -> Result<(), RuntimeError>;
    fn begin_array(&mut self) -> Result<(), RuntimeError>;
    fn end_array(&mut self) -> Result<(), RuntimeError>;

    /// More elements before the enclosing object or array ends.
    fn has_next(&mut self) -> Result<bool, RuntimeError>;

    fn next_name(&mut self) -> Result<String, RuntimeError>;
    fn peek(&mut self) -> Result<JsonToken, RuntimeError>;
    fn skip_value(&mut self) -> Result<(), RuntimeError>;

    fn next_string(&mut self) -> Result<String, RuntimeError>;
    fn next_long(&mut self) -> Result<i64, RuntimeError>;
    fn next_int(&mut self) -> Result<i32, RuntimeError>;
    fn next_double(&mut self) -> Result<f64, RuntimeError>;
    fn next_boolean(&mut self) -> Result<bool, RuntimeError>;
}

///
/// Token
///

#[derive(Clone, Debug, PartialEq)]
enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Name(String),
    Str(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Token {
    const fn kind(&self) -> JsonToken {
        match self {
            Self::BeginObject => JsonToken::BeginObject,
            Self::EndObject => JsonToken::EndObject,
            Self::BeginArray => JsonToken::BeginArray,
            Self::EndArray => JsonToken::EndArray,
            Self::Name(_) => JsonToken::Name,
            Self::Str(_) => JsonToken::String,
            Self::Number(_) => JsonToken::Number,
            Self::Bool(_) => JsonToken::Boolean,
            Self::Null => JsonToken::Null,
        }
    }
}

///
/// TokenReader
///

#[derive(Clone, Debug)]
pub struct TokenReader {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenReader {
    #[must_use]
    pub fn new(document: &Json) -> Self {
        let mut tokens = Vec::new();
        flatten(document, &mut tokens);

        Self { tokens, pos: 0 }
    }

    pub fn from_json(text: &str) -> Result<Self, RuntimeError> {
        let document = serde_json::from_str::<Json>(text)?;

        Ok(Self::new(&document))
    }

    /// Every token consumed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current(&self) -> JsonToken {
        self.tokens
            .get(self.pos)
            .map_or(JsonToken::EndDocument, Token::kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }

        token
    }

    // take
    // consumes the current token when `f` accepts it
    fn take<T>(
        &mut self,
        expected: JsonToken,
        f: impl FnOnce(&Token) -> Option<T>,
    ) -> Result<T, RuntimeError> {
        let value = self.tokens.get(self.pos).and_then(f);
        match value {
            Some(value) => {
                self.pos += 1;
                Ok(value)
            }
            None => Err(RuntimeError::Expected {
                expected,
                found: self.current(),
            }),
        }
    }

    fn expect(&mut self, expected: JsonToken) -> Result<(), RuntimeError> {
        self.take(expected, |t| (t.kind() == expected).then_some(()))
    }

    fn next_number(&mut self) -> Result<Number, RuntimeError> {
        let text = self.take(JsonToken::Number, |t| match t {
            Token::Number(n) => Some(Ok(n.clone())),
            Token::Str(s) => Some(Err(s.clone())),
            _ => None,
        })?;

        text.or_else(|s| {
            s.trim()
                .parse::<Number>()
                .map_err(|_| RuntimeError::InvalidNumber {
                    value: s,
                    target: "number",
                })
        })
    }
}

impl JsonReader for TokenReader {
    fn begin_object(&mut self) -> Result<(), RuntimeError> {
        self.expect(JsonToken::BeginObject)
    }

    fn end_object(&mut self) -> Result<(), RuntimeError> {
        self.expect(JsonToken::EndObject)
    }

    fn begin_array(&mut self) -> Result<(), RuntimeError> {
        self.expect(JsonToken::BeginArray)
    }

    fn end_array(&mut self) -> Result<(), RuntimeError> {
        self.expect(JsonToken::EndArray)
    }

    fn has_next(&mut self) -> Result<bool, RuntimeError> {
        Ok(!matches!(
            self.current(),
            JsonToken::EndObject | JsonToken::EndArray | JsonToken::EndDocument
        ))
    }

    fn next_name(&mut self) -> Result<String, RuntimeError> {
        self.take(JsonToken::Name, |t| match t {
            Token::Name(name) => Some(name.clone()),
            _ => None,
        })
    }

    fn peek(&mut self) -> Result<JsonToken, RuntimeError> {
        Ok(self.current())
    }

    // skip_value
    // consumes one complete value, nested containers included
    fn skip_value(&mut self) -> Result<(), RuntimeError> {
        let mut depth = 0usize;

        loop {
            let Some(token) = self.advance() else {
                return Err(RuntimeError::Expected {
                    expected: JsonToken::Null,
                    found: JsonToken::EndDocument,
                });
            };

            match token {
                Token::BeginObject | Token::BeginArray => depth += 1,
                Token::EndObject | Token::EndArray => {
                    depth = depth.saturating_sub(1);
                }
                Token::Name(_) => continue,
                Token::Str(_) | Token::Number(_) | Token::Bool(_) | Token::Null => {}
            }

            if depth == 0 {
                return Ok(());
            }
        }
    }

    // numbers are accepted as strings
    fn next_string(&mut self) -> Result<String, RuntimeError> {
        self.take(JsonToken::String, |t| match t {
            Token::Str(s) => Some(s.clone()),
            Token::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn next_long(&mut self) -> Result<i64, RuntimeError> {
        let n = self.next_number()?;
        n.as_i64().ok_or_else(|| RuntimeError::InvalidNumber {
            value: n.to_string(),
            target: "long",
        })
    }

    fn next_int(&mut self) -> Result<i32, RuntimeError> {
        let n = self.next_number()?;
        n.as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| RuntimeError::InvalidNumber {
                value: n.to_string(),
                target: "int",
            })
    }

    fn next_double(&mut self) -> Result<f64, RuntimeError> {
        let n = self.next_number()?;
        n.as_f64().ok_or_else(|| RuntimeError::InvalidNumber {
            value: n.to_string(),
            target: "double",
        })
    }

    fn next_boolean(&mut self) -> Result<bool, RuntimeError> {
        self.take(JsonToken::Boolean, |t| match t {
            Token::Bool(v) => Some(*v),
            _ => None,
        })
    }
}

fn flatten(value: &Json, out: &mut Vec<Token>) {
    match value {
        Json::Null => out.push(Token::Null),
        Json::Bool(v) => out.push(Token::Bool(*v)),
        Json::Number(n) => out.push(Token::Number(n.clone())),
        Json::String(s) => out.push(Token::Str(s.clone())),
        Json::Array(items) => {
            out.push(Token::BeginArray);
            for item in items {
                flatten(item, out);
            }
            out.push(Token::EndArray);
        }
        Json::Object(map) => {
            out.push(Token::BeginObject);
            for (key, item) in map {
                out.push(Token::Name(key.clone()));
                flatten(item, out);
            }
            out.push(Token::EndObject);
        }
    }
}

///
/// TESTS
///
