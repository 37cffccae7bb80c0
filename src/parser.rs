//! Command line parsing module for the action.
//!
//! This module splits input strings into arguments, respecting shell quoting
//! rules, escape sequences and `$` substitutions. It also provides the
//! inverse operation ([`quote`]) used when echoing commands back to the log.

use crate::error::TokenizeError;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::LazyLock;

// --- Constants ---
pub const BACKSLASH: char = '\\';
pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';
pub const DOLLAR: char = '$';
pub const HASH: char = '#';

/// Characters that end a word and start an operator.
const META: &str = "|&;()<>";

/// Single-character parameters: `$*`, `$@`, `$#`, `$?`, `$$`, `$!`, `$_`, `$-`.
const SPECIAL_PARAMS: &str = "*@#?$!_-";

/// Quote-pair splitter: `"..."`, `'...'`, `` `...` `` or a run of non-space.
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'|`([^`]*)`|(\S+)"#).expect("split regex is valid")
});

/// Characters that must be escaped in a bare (unquoted) word.
static BARE_ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z]:)?([#!"$&'()*,:;<=>?@\[\\\]^`{|}])"#).expect("escape regex is valid")
});

/// A recognized shell control sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `||`
    OrIf,
    /// `&&`
    AndIf,
    /// `;;`
    DoubleSemi,
    /// `|&`
    PipeAll,
    /// `<(`
    ProcessSubst,
    /// `<<<`
    HereString,
    /// `>>`
    Append,
    /// `>&`
    DupOutput,
    /// `<&`
    DupInput,
    /// `&`
    Background,
    /// `;`
    Semi,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `|`
    Pipe,
    /// `<`
    Less,
    /// `>`
    Great,
}

impl Operator {
    /// Every operator, in matching priority order.
    const ALL: [Operator; 16] = [
        Operator::OrIf,
        Operator::AndIf,
        Operator::DoubleSemi,
        Operator::PipeAll,
        Operator::ProcessSubst,
        Operator::HereString,
        Operator::Append,
        Operator::DupOutput,
        Operator::DupInput,
        Operator::Background,
        Operator::Semi,
        Operator::LParen,
        Operator::RParen,
        Operator::Pipe,
        Operator::Less,
        Operator::Great,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::OrIf => "||",
            Operator::AndIf => "&&",
            Operator::DoubleSemi => ";;",
            Operator::PipeAll => "|&",
            Operator::ProcessSubst => "<(",
            Operator::HereString => "<<<",
            Operator::Append => ">>",
            Operator::DupOutput => ">&",
            Operator::DupInput => "<&",
            Operator::Background => "&",
            Operator::Semi => ";",
            Operator::LParen => "(",
            Operator::RParen => ")",
            Operator::Pipe => "|",
            Operator::Less => "<",
            Operator::Great => ">",
        }
    }

    /// Returns the operator that `input` starts with, if any.
    pub fn parse_prefix(input: &str) -> Option<Operator> {
        Self::ALL
            .into_iter()
            .find(|op| input.starts_with(op.as_str()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of tokenizer output.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A resolved argument with quotes, escapes and variables already applied.
    Word(String),
    /// A structured value produced by a substitution, kept intact.
    Value(Value),
    /// A control operator such as `&&` or `;`.
    Op(Operator),
    /// An unquoted word containing `*` or `?`.
    Glob(String),
    /// Everything after an unquoted `#`. Always the last token.
    Comment(String),
}

impl Token {
    /// Flattens the token into a command line argument.
    ///
    /// Comments carry no argument and yield `None`.
    pub fn into_arg(self) -> Option<String> {
        match self {
            Token::Word(word) => Some(word),
            Token::Glob(pattern) => Some(pattern),
            Token::Op(op) => Some(op.as_str().to_string()),
            Token::Value(Value::String(text)) => Some(text),
            Token::Value(value) => Some(value.to_string()),
            Token::Comment(_) => None,
        }
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Self {
        Token::Word(word.to_string())
    }
}

/// The result of resolving a variable name.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    Text(String),
    Structured(Value),
}

impl From<String> for Expansion {
    fn from(text: String) -> Self {
        Expansion::Text(text)
    }
}

impl From<&str> for Expansion {
    fn from(text: &str) -> Self {
        Expansion::Text(text.to_string())
    }
}

impl From<Value> for Expansion {
    fn from(value: Value) -> Self {
        Expansion::Structured(value)
    }
}

/// Variable resolver handed to the tokenizer.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<Expansion>;

/// Tokenizes `input` without variable expansion.
///
/// `$name` and `${name}` references are kept verbatim, but `${}` and an
/// unterminated `${name` are still rejected.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    Scanner::new(input, None).run()
}

/// Tokenizes `input`, resolving `$` references through `lookup`.
///
/// A named variable that `lookup` doesn't know expands to the empty string,
/// so `$UNSET` on its own is still an (empty) argument. A bare `$`
/// that isn't followed by a name stays a literal `$`.
///
/// # Examples
///
/// ```
/// use cmake_action::parser::{tokenize_with, Token};
///
/// let tokens = tokenize_with("$HOME/src", |name| {
///     (name == "HOME").then(|| "/root".into())
/// })
/// .unwrap();
/// assert_eq!(tokens, vec![Token::Word("/root/src".to_string())]);
/// ```
pub fn tokenize_with<F>(input: &str, lookup: F) -> Result<Vec<Token>, TokenizeError>
where
    F: Fn(&str) -> Option<Expansion>,
{
    Scanner::new(input, Some(&lookup)).run()
}

/// Parses an input string straight into command line arguments.
/// Comments are dropped, every other token is flattened with [`Token::into_arg`].
pub fn parse_tokens(input: &str, lookup: Option<Lookup<'_>>) -> Result<Vec<String>, TokenizeError> {
    let tokens = Scanner::new(input, lookup).run()?;
    Ok(tokens.into_iter().filter_map(Token::into_arg).collect())
}

/// Splits on whitespace, keeping `"..."`, `'...'` and `` `...` `` spans together.
/// No escapes or substitutions are processed, and the delimiters are stripped.
pub fn split_args(input: &str) -> Vec<String> {
    SPLIT_RE
        .captures_iter(input)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
        })
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Quotes a single argument so that [`tokenize`] reads it back unchanged.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    if arg.is_empty() {
        return Cow::Borrowed("''");
    }

    let has_space = arg.chars().any(char::is_whitespace);
    let has_double = arg.contains(DOUBLE_QUOTE);
    let has_single = arg.contains(SINGLE_QUOTE);

    if (has_space || has_double) && !has_single {
        // Everything is literal inside single quotes
        return Cow::Owned(format!("'{arg}'"));
    }

    if has_space || has_double || has_single {
        let mut out = String::with_capacity(arg.len() + 2);
        out.push(DOUBLE_QUOTE);
        for c in arg.chars() {
            if matches!(c, DOUBLE_QUOTE | BACKSLASH | DOLLAR) {
                out.push(BACKSLASH);
            }
            out.push(c);
        }
        out.push(DOUBLE_QUOTE);
        return Cow::Owned(out);
    }

    BARE_ESCAPE_RE.replace_all(arg, "${1}\\${2}")
}

/// Joins tokens back into a single string.
///
/// Words are quoted with [`quote_arg`], operators are escaped so they read
/// back as plain words, and glob patterns keep their `*` and `?` bare.
pub fn quote(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Word(word) => quote_arg(word).into_owned(),
            Token::Value(value) => quote_arg(&value.to_string()).into_owned(),
            Token::Op(op) => op.as_str().chars().flat_map(|c| [BACKSLASH, c]).collect::<String>(),
            Token::Glob(pattern) => pattern
                .chars()
                .fold(String::with_capacity(pattern.len()), |mut out, c| {
                    if c != '*' && c != '?' && needs_escape(c) {
                        out.push(BACKSLASH);
                    }
                    out.push(c);
                    out
                }),
            Token::Comment(text) => format!("{HASH}{text}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn needs_escape(c: char) -> bool {
    c.is_whitespace() || "#!\"$&'()*,:;<=>?@[\\]^`{|}".contains(c)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn ends_word(c: char) -> bool {
    c.is_whitespace() || META.contains(c)
}

/// Word being accumulated across quote-context switches.
#[derive(Default)]
struct Word {
    /// Completed pieces split off by structured substitutions.
    parts: Vec<Token>,
    text: String,
    quoted: bool,
    /// Set once a variable has been resolved into this word.
    expanded: bool,
    glob: bool,
}

impl Word {
    fn push(&mut self, c: char) {
        self.text.push(c);
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    fn push_value(&mut self, value: Value) {
        if !self.text.is_empty() {
            self.parts.push(Token::Word(std::mem::take(&mut self.text)));
        }
        self.parts.push(Token::Value(value));
    }

    fn finish(self, tokens: &mut Vec<Token>) {
        if self.glob {
            let mut pattern = String::new();
            for part in self.parts {
                match part {
                    Token::Word(word) => pattern.push_str(&word),
                    Token::Value(value) => pattern.push_str(&value.to_string()),
                    _ => {}
                }
            }
            pattern.push_str(&self.text);
            tokens.push(Token::Glob(pattern));
            return;
        }

        let had_parts = !self.parts.is_empty();
        tokens.extend(self.parts);
        // '' and an empty expansion are still arguments
        if !self.text.is_empty() || ((self.quoted || self.expanded) && !had_parts) {
            tokens.push(Token::Word(self.text));
        }
    }
}

struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    lookup: Option<Lookup<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, lookup: Option<Lookup<'a>>) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            lookup,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut word = Word::default();

        while let Some((idx, c)) = self.chars.next() {
            match c {
                // Outside quotes a backslash escapes whatever follows it
                BACKSLASH => match self.chars.next() {
                    Some((_, next)) => word.push(next),
                    // A trailing backslash escapes nothing and is dropped
                    None => {}
                },
                SINGLE_QUOTE => {
                    word.quoted = true;
                    self.single_quoted(&mut word)?;
                }
                DOUBLE_QUOTE => {
                    word.quoted = true;
                    self.double_quoted(&mut word)?;
                }
                DOLLAR => self.substitute(idx, &mut word, false)?,
                HASH => {
                    std::mem::take(&mut word).finish(&mut self.tokens);
                    let comment = self.input[idx + c.len_utf8()..].to_string();
                    self.tokens.push(Token::Comment(comment));
                    return Ok(self.tokens);
                }
                '*' | '?' => {
                    word.glob = true;
                    word.push(c);
                }
                c if ends_word(c) => {
                    std::mem::take(&mut word).finish(&mut self.tokens);
                    if let Some(op) = Operator::parse_prefix(&self.input[idx..]) {
                        // Operators are ASCII, the first char is already consumed
                        for _ in 1..op.as_str().len() {
                            self.chars.next();
                        }
                        self.tokens.push(Token::Op(op));
                    }
                }
                _ => word.push(c),
            }
        }

        word.finish(&mut self.tokens);
        Ok(self.tokens)
    }

    fn single_quoted(&mut self, word: &mut Word) -> Result<(), TokenizeError> {
        for (_, c) in self.chars.by_ref() {
            if c == SINGLE_QUOTE {
                return Ok(());
            }
            word.push(c);
        }
        Err(TokenizeError::UnterminatedQuote {
            quote: SINGLE_QUOTE,
        })
    }

    fn double_quoted(&mut self, word: &mut Word) -> Result<(), TokenizeError> {
        while let Some((idx, c)) = self.chars.next() {
            match c {
                DOUBLE_QUOTE => return Ok(()),
                BACKSLASH => match self.chars.peek() {
                    Some(&(_, next)) if matches!(next, DOUBLE_QUOTE | BACKSLASH | DOLLAR) => {
                        self.chars.next();
                        word.push(next);
                    }
                    // Any other escape is kept as written
                    _ => word.push(BACKSLASH),
                },
                DOLLAR => self.substitute(idx, word, true)?,
                _ => word.push(c),
            }
        }
        Err(TokenizeError::UnterminatedQuote {
            quote: DOUBLE_QUOTE,
        })
    }

    /// Handles a `$` at byte offset `start`, which has already been consumed.
    fn substitute(&mut self, start: usize, word: &mut Word, quoted: bool) -> Result<(), TokenizeError> {
        let input = self.input;

        let name = match self.chars.peek().copied() {
            Some((_, '{')) => {
                self.chars.next();
                self.braced_name(start, quoted)?
            }
            Some((i, c)) if SPECIAL_PARAMS.contains(c) => {
                self.chars.next();
                &input[i..i + c.len_utf8()]
            }
            Some((i, c)) if is_name_char(c) => {
                let mut end = i;
                while let Some(&(j, c)) = self.chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    end = j + c.len_utf8();
                    self.chars.next();
                }
                &input[i..end]
            }
            _ => "",
        };

        let Some(lookup) = self.lookup else {
            let end = self.offset();
            word.push_str(&input[start..end]);
            return Ok(());
        };

        if name.is_empty() {
            word.push(DOLLAR);
            return Ok(());
        }

        word.expanded = true;
        match lookup(name) {
            Some(Expansion::Text(text)) => word.push_str(&text),
            Some(Expansion::Structured(value)) => word.push_value(value),
            None => {}
        }
        Ok(())
    }

    /// Reads the name of a `${name}` reference, after the opening brace.
    fn braced_name(&mut self, start: usize, quoted: bool) -> Result<&'a str, TokenizeError> {
        let input = self.input;
        let name_start = self.offset();

        while let Some(&(i, c)) = self.chars.peek() {
            if c == '}' {
                self.chars.next();
                if i == name_start {
                    return Err(TokenizeError::BadSubstitution {
                        text: input[start..=i].to_string(),
                    });
                }
                return Ok(&input[name_start..i]);
            }
            if (quoted && c == DOUBLE_QUOTE) || (!quoted && ends_word(c)) {
                break;
            }
            self.chars.next();
        }

        Err(TokenizeError::BadSubstitution {
            text: input[start..self.offset()].to_string(),
        })
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }
}
