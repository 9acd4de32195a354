//! Infix to postfix translation (shunting-yard) and postfix evaluation over `f64`.
//!
//! ```
//! let rpn = rpn_calc::translate(rpn_calc::tokenize("2 ^ 3 ^ 2")).unwrap();
//! assert_eq!(rpn.to_string(), "2 3 2 ^ ^");
//! assert_eq!(rpn_calc::evaluate(&rpn).unwrap(), 512.0);
//! ```

pub mod builtins;
pub mod error;
pub mod ffi;
pub mod rpn_converter;
pub mod rpn_evaluator;
pub mod tokenizer;

pub use error::{Error, Result};
pub use rpn_converter::{RPNConverterError, RPNExpr, RpnConverter};
pub use rpn_evaluator::{RpnEvaluator, RpnEvaluatorError};
pub use tokenizer::{tokenize, Token, Tokens};

/// Infix tokens to postfix. See [`RpnConverter::convert`].
pub fn translate<I>(tokens: I) -> std::result::Result<RPNExpr, RPNConverterError>
where
    I: IntoIterator<Item = Token>,
{
    RpnConverter::convert(tokens)
}

/// Postfix tokens to a number. See [`RpnEvaluator::evaluate`].
pub fn evaluate(tokens: &[Token]) -> std::result::Result<f64, RpnEvaluatorError> {
    RpnEvaluator::evaluate(tokens)
}

/// Tokenizes, translates and evaluates an infix expression.
pub fn calculate(input: &str) -> Result<f64> {
    let rpn = translate(tokenize(input))?;
    Ok(evaluate(&rpn)?)
}
