//! Reader for the Graph Modelling Language.
//!
//! A GML document is a list of `key value` pairs, where a value is an
//! integer, a real, a quoted string or a nested list in square brackets.
//! Only the `graph` list and its `directed`, `node` and `edge` entries are
//! interpreted, all other keys are accepted and ignored.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use log::debug;
use petgraph::graph::NodeIndex;

use crate::error::{Error, Result};
use crate::network::{Link, Network, Node};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<(String, Value)>),
}

impl Value {
    fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            _ => None,
        }
    }

    fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> Error {
        Error::GmlSyntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                self.line += 1;
                self.chars.next();
            } else if c.is_whitespace() {
                self.chars.next();
            } else if c == '#' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                break;
            }
        }
    }

    /// Returns the next token together with the line it started in.
    fn next_token(&mut self) -> Result<Option<(Token, usize)>> {
        self.skip_whitespace_and_comments();
        let line = self.line;
        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '[' => {
                self.chars.next();
                Token::Open
            }
            ']' => {
                self.chars.next();
                Token::Close
            }
            '"' => {
                self.chars.next();
                self.read_string()?
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut key = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        key.push(c);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                Token::Key(key)
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.read_number()?,
            c => return Err(self.syntax_error(format!("unexpected character '{}'", c))),
        };
        Ok(Some((token, line)))
    }

    fn read_string(&mut self) -> Result<Token> {
        let mut raw = String::new();
        loop {
            match self.chars.next() {
                Some('"') => break,
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    raw.push(c);
                }
                None => return Err(self.syntax_error("unterminated string")),
            }
        }
        Ok(Token::Str(decode_entities(&raw)))
    }

    fn read_number(&mut self) -> Result<Token> {
        let mut literal = String::new();
        while let Some(&c) = self.chars.peek() {
            let is_sign_after_exponent =
                (c == '-' || c == '+') && (literal.is_empty() || literal.ends_with(['e', 'E']));
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || is_sign_after_exponent {
                literal.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        let is_real = literal.contains(['.', 'e', 'E']);
        if !is_real {
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(Token::Int(i));
            }
        }
        literal
            .parse::<f64>()
            .map(Token::Real)
            .map_err(|_| self.syntax_error(format!("invalid number '{}'", literal)))
    }
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn parse_list(lexer: &mut Lexer, nested: bool) -> Result<Vec<(String, Value)>> {
    let mut entries = Vec::new();
    loop {
        let key = match lexer.next_token()? {
            None if nested => return Err(lexer.syntax_error("missing ']' at end of input")),
            None => return Ok(entries),
            Some((Token::Close, _)) if nested => return Ok(entries),
            Some((Token::Key(key), _)) => key,
            Some((token, line)) => {
                return Err(Error::GmlSyntax {
                    line,
                    message: format!("expected a key, but found {:?}", token),
                })
            }
        };
        let value = match lexer.next_token()? {
            Some((Token::Int(i), _)) => Value::Int(i),
            Some((Token::Real(r), _)) => Value::Real(r),
            Some((Token::Str(s), _)) => Value::Str(s),
            Some((Token::Open, _)) => Value::List(parse_list(lexer, true)?),
            Some((token, line)) => {
                return Err(Error::GmlSyntax {
                    line,
                    message: format!("expected a value for key '{}', but found {:?}", key, token),
                })
            }
            None => {
                return Err(lexer.syntax_error(format!("missing value for key '{}'", key)));
            }
        };
        entries.push((key, value));
    }
}

/// Parses a GML document into its key/value tree.
pub fn parse_tree(text: &str) -> Result<Vec<(String, Value)>> {
    let mut lexer = Lexer::new(text);
    parse_list(&mut lexer, false)
}

fn find<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn required_int(entries: &[(String, Value)], key: &str, context: &str) -> Result<i64> {
    find(entries, key)
        .and_then(Value::as_int)
        .ok_or_else(|| Error::GmlStructure(format!("{} has no integer '{}'", context, key)))
}

/// Parses a GML document into a [`Network`].
pub fn parse(text: &str) -> Result<Network> {
    let tree = parse_tree(text)?;
    let graph = match find(&tree, "graph") {
        Some(Value::List(entries)) => entries,
        Some(_) => return Err(Error::GmlStructure("'graph' is not a list".to_string())),
        None => return Err(Error::GmlStructure("no 'graph' found".to_string())),
    };

    let directed = find(graph, "directed")
        .and_then(Value::as_int)
        .map_or(false, |d| d != 0);
    let mut network = Network::new(directed);
    let mut ids = HashMap::new();

    for (n, (_, value)) in graph.iter().filter(|(k, _)| k == "node").enumerate() {
        let attributes = match value {
            Value::List(attributes) => attributes,
            _ => return Err(Error::GmlStructure(format!("node #{} is not a list", n))),
        };
        let id = required_int(attributes, "id", &format!("node #{}", n))?;
        let label = match find(attributes, "label") {
            Some(Value::Str(s)) => Some(s.clone()),
            Some(Value::Int(i)) => Some(i.to_string()),
            Some(Value::Real(r)) => Some(r.to_string()),
            _ => None,
        };
        let idx = network.add_node(Node { id, label });
        if ids.insert(id, idx).is_some() {
            return Err(Error::GmlStructure(format!("duplicate node id {}", id)));
        }
    }

    for (n, (_, value)) in graph.iter().filter(|(k, _)| k == "edge").enumerate() {
        let attributes = match value {
            Value::List(attributes) => attributes,
            _ => return Err(Error::GmlStructure(format!("edge #{} is not a list", n))),
        };
        let context = format!("edge #{}", n);
        let endpoint = |key: &str| -> Result<NodeIndex> {
            let id = required_int(attributes, key, &context)?;
            ids.get(&id).copied().ok_or_else(|| {
                Error::GmlStructure(format!("{} references unknown node id {}", context, id))
            })
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        let weight = find(attributes, "weight").and_then(Value::as_real);
        network.add_edge(source, target, Link { weight });
    }

    debug!(
        "parsed GML graph with {} nodes and {} edges (directed: {})",
        network.node_count(),
        network.edge_count(),
        directed
    );
    Ok(network)
}
