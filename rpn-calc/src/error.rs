use crate::rpn_converter::RPNConverterError;
use crate::rpn_evaluator::RpnEvaluatorError;

/// Any failure along the tokenize → translate → evaluate pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Failed to convert the input to RPN: {0}")]
    Translate(#[from] RPNConverterError),
    #[error("Failed to evaluate the RPN expression: {0}")]
    Evaluate(#[from] RpnEvaluatorError),
}

pub type Result<T> = std::result::Result<T, Error>;
