use std::{fmt, iter::Peekable, str::CharIndices};

use tracing::trace;

use crate::builtins::Op;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Number(f64),
    Operator(Op),
    /// A function name, or any other lexeme that is neither a number nor an operator.
    /// Only `ln`, `cos`, `sin` and `sqrt` survive evaluation.
    Function(String),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Function(name) => write!(f, "{}", name),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct TokenizedInput(pub Vec<Token>);

impl std::ops::Deref for TokenizedInput {
    type Target = Vec<Token>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for TokenizedInput {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<Token> for TokenizedInput {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenizedInput(iter.into_iter().collect())
    }
}

impl IntoIterator for TokenizedInput {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Lazy token stream over an expression.
///
/// Holds nothing but a cursor into the input, so cloning it (or calling
/// [`tokenize`] again) replays exactly the same tokens.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

/// Splits `input` into tokens. Never fails: a lexeme that looks numeric but does not
/// parse as `f64` comes out as a [`Token::Function`] and is rejected by the evaluator.
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens {
        input,
        chars: input.char_indices().peekable(),
    }
}

impl<'a> Tokens<'a> {
    /// Drains the remaining tokens into a [`TokenizedInput`].
    pub fn collect_input(self) -> TokenizedInput {
        self.collect()
    }

    fn next_is_digit(&mut self) -> bool {
        self.chars.peek().is_some_and(|(_, c)| c.is_ascii_digit())
    }

    /// Greedily extends a numeric lexeme: digits, one `.`, one exponent marker,
    /// and a sign only right after the exponent marker.
    fn number(&mut self, start: usize, first: char) -> Token {
        let mut seen_dot = first == '.';
        let mut seen_exp = false;
        let mut prev = first;
        let mut end = start + first.len_utf8();

        while let Some(&(i, c)) = self.chars.peek() {
            let accept = match c {
                '0'..='9' => true,
                '.' => !seen_dot,
                'e' | 'E' => !seen_exp,
                '+' | '-' => matches!(prev, 'e' | 'E'),
                _ => false,
            };
            if !accept {
                break;
            }

            match c {
                '.' => seen_dot = true,
                'e' | 'E' => seen_exp = true,
                _ => {}
            }
            prev = c;
            end = i + c.len_utf8();
            self.chars.next();
        }

        let lexeme = &self.input[start..end];
        match lexeme.parse::<f64>() {
            Ok(value) => Token::Number(value),
            Err(_) => {
                trace!(lexeme, "numeric lexeme does not parse, deferring to evaluation");
                Token::Function(lexeme.to_string())
            }
        }
    }

    fn word(&mut self, start: usize, first: char) -> Token {
        let mut end = start + first.len_utf8();
        while let Some((i, c)) = self.chars.next_if(|(_, c)| c.is_alphabetic()) {
            end = i + c.len_utf8();
        }

        Token::Function(self.input[start..end].to_string())
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let (start, c) = self.chars.by_ref().find(|(_, c)| !c.is_whitespace())?;

        let token = match c {
            '0'..='9' => self.number(start, c),
            '.' if self.next_is_digit() => self.number(start, c),
            c if c.is_alphabetic() => self.word(start, c),
            '(' => Token::LParen,
            ')' => Token::RParen,
            c => match Op::from_symbol(c) {
                Some(op) => Token::Operator(op),
                None => Token::Function(c.to_string()),
            },
        };

        trace!(%token, "token");
        Some(token)
    }
}
