use std::{fmt, str::FromStr};

use tracing::{debug, trace};

use crate::builtins::{Associativity, Builtin, Op};
use crate::tokenizer::Token;

/// Which side of a parenthesis pair was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Opening,
    Closing,
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Paren::Opening => write!(f, "opening"),
            Paren::Closing => write!(f, "closing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RPNConverterError {
    #[error("Mismatched parentheses: unmatched {0} parenthesis")]
    MismatchedParentheses(Paren),
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct RPNExpr(pub Vec<Token>);

impl std::ops::Deref for RPNExpr {
    type Target = Vec<Token>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for RPNExpr {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for RPNExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }

        Ok(())
    }
}

/// Reads hand-written postfix: whitespace separated words, each one a number,
/// an operator symbol, a parenthesis, or a function name. Never fails; words
/// the evaluator does not understand are kept as function names.
impl FromStr for RPNExpr {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RPNExpr(s.split_whitespace().map(postfix_word).collect()))
    }
}

fn postfix_word(word: &str) -> Token {
    let mut chars = word.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        match c {
            '(' => return Token::LParen,
            ')' => return Token::RParen,
            c => {
                if let Some(op) = Op::from_symbol(c) {
                    return Token::Operator(op);
                }
            }
        }
    }

    match word.parse::<f64>() {
        Ok(n) if looks_numeric(word) => Token::Number(n),
        _ => Token::Function(word.to_string()),
    }
}

/// Rejects the spelled-out `inf`/`nan` forms that `f64::from_str` accepts.
fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix(&['+', '-'][..]).unwrap_or(word);
    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

pub struct RpnConverter;

impl RpnConverter {
    /// Whether `incoming` has to wait until `top` has been emitted.
    fn yields_to(incoming: Op, top: Op) -> bool {
        match incoming.associativity() {
            Associativity::Left => incoming.precedence() <= top.precedence(),
            Associativity::Right => incoming.precedence() < top.precedence(),
        }
    }

    /// Converts infix notation to Reverse Polish Notation
    /// using the Shunting Yard algorithm.
    ///
    /// Function tokens are only released by the `)` that closes the group right
    /// after them, or by the final flush. Only the known builtins are released by
    /// `)`; any other name stays on the stack until the flush.
    pub fn convert<I>(tokens: I) -> Result<RPNExpr, RPNConverterError>
    where
        I: IntoIterator<Item = Token>,
    {
        use Token::*;
        let mut output = Vec::new();
        let mut stack: Vec<Token> = Vec::new();

        for token in tokens {
            trace!(%token, depth = stack.len(), "convert");
            match token {
                Number(_) => output.push(token),
                Function(_) | LParen => stack.push(token),
                Operator(op) => {
                    while let Some(&Operator(top)) = stack.last() {
                        if !RpnConverter::yields_to(op, top) {
                            break;
                        }
                        output.push(Operator(top));
                        stack.pop();
                    }

                    stack.push(token);
                }
                RParen => {
                    let mut found = false;
                    while let Some(tok) = stack.pop() {
                        if tok == LParen {
                            found = true;
                            break;
                        }
                        output.push(tok);
                    }

                    if !found {
                        return Err(RPNConverterError::MismatchedParentheses(Paren::Closing));
                    }

                    if let Some(Function(name)) = stack.last() {
                        if Builtin::from_name(name).is_some() {
                            output.extend(stack.pop());
                        }
                    }
                }
            }
        }

        while let Some(tok) = stack.pop() {
            match tok {
                LParen => return Err(RPNConverterError::MismatchedParentheses(Paren::Opening)),
                RParen => return Err(RPNConverterError::MismatchedParentheses(Paren::Closing)),
                _ => output.push(tok),
            }
        }

        let rpn = RPNExpr(output);
        debug!(%rpn, "converted to postfix");
        Ok(rpn)
    }
}
