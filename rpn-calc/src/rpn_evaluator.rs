use tracing::{debug, trace};

use crate::builtins::Builtin;
use crate::tokenizer::Token;

pub struct RpnEvaluator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpnEvaluatorError {
    #[error("Not enough operands for '{token}': needs {required}, found {available}")]
    InsufficientOperands {
        token: String,
        required: usize,
        available: usize,
    },
    #[error("Unknown token: {0}")]
    UnknownToken(String),
    #[error("Invalid postfix expression: {remaining} values left on the stack")]
    MalformedPostfix { remaining: usize },
}

impl RpnEvaluator {
    /// Pops `N` operands, the last one pushed ending up last in the array.
    fn pop_operands<const N: usize>(
        eval_stack: &mut Vec<f64>,
        token: &Token,
    ) -> Result<[f64; N], RpnEvaluatorError> {
        if eval_stack.len() < N {
            return Err(RpnEvaluatorError::InsufficientOperands {
                token: token.to_string(),
                required: N,
                available: eval_stack.len(),
            });
        }

        let mut operands = [0.0; N];
        operands.copy_from_slice(&eval_stack[eval_stack.len() - N..]);
        eval_stack.truncate(eval_stack.len() - N);
        Ok(operands)
    }

    /// Evaluates a postfix sequence.
    ///
    /// Numeric domain problems are not errors: `1 0 /` is `inf`, `-1 sqrt` is NaN.
    pub fn evaluate(tokens: &[Token]) -> Result<f64, RpnEvaluatorError> {
        use Token::*;

        let mut eval_stack: Vec<f64> = vec![];

        for token in tokens {
            match token {
                Number(num) => eval_stack.push(*num),
                Operator(op) => {
                    let [a, b] = RpnEvaluator::pop_operands::<2>(&mut eval_stack, token)?;
                    eval_stack.push(op.apply(a, b));
                }
                Function(_) | LParen | RParen => {
                    let [a] = RpnEvaluator::pop_operands::<1>(&mut eval_stack, token)?;
                    let builtin = match token {
                        Function(name) => Builtin::from_name(name),
                        _ => None,
                    }
                    .ok_or_else(|| RpnEvaluatorError::UnknownToken(token.to_string()))?;
                    eval_stack.push(builtin.apply(a));
                }
            }
            trace!(%token, top = ?eval_stack.last(), "evaluate");
        }

        match eval_stack.as_slice() {
            [result] => {
                debug!(result, "evaluated postfix");
                Ok(*result)
            }
            rest => Err(RpnEvaluatorError::MalformedPostfix {
                remaining: rest.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::Op::*;
    use crate::rpn_converter::RPNExpr;
    use crate::tokenizer::Token::*;

    fn eval(postfix: &str) -> Result<f64, RpnEvaluatorError> {
        let rpn: RPNExpr = postfix.parse().unwrap();
        RpnEvaluator::evaluate(&rpn)
    }

    #[test]
    fn test_rpn_evaluator() {
        let tokens = RPNExpr(vec![Number(1.0), Number(2.0), Operator(Plus)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), 3.0);

        let tokens = RPNExpr(vec![Number(1.0), Number(2.0), Operator(Minus)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), -1.0);

        let tokens = RPNExpr(vec![Number(2.0), Number(3.0), Operator(Mult)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), 6.0);

        let tokens = RPNExpr(vec![Number(6.0), Number(3.0), Operator(Div)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), 2.0);

        let tokens = RPNExpr(vec![Number(7.0), Number(2.0), Operator(Ratio)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), 3.5);

        let tokens = RPNExpr(vec![Number(5.0), Number(2.0), Operator(Pow)]);
        assert_eq!(RpnEvaluator::evaluate(&tokens).unwrap(), 25.0);
    }

    #[test]
    fn test_rpn_evaluator_operand_order() {
        assert_eq!(eval("10 4 -").unwrap(), 6.0);
        assert_eq!(eval("2 3 2 ^ ^").unwrap(), 512.0);
        assert_eq!(eval("2 3 ^ 2 ^").unwrap(), 64.0);
    }

    #[test]
    fn test_rpn_evaluator_functions() {
        assert_eq!(eval("16 sqrt").unwrap(), 4.0);
        assert_eq!(eval("1 LN").unwrap(), 0.0);
        assert_eq!(eval("0 cos").unwrap(), 1.0);
        assert_eq!(eval("0 Sin").unwrap(), 0.0);
    }

    #[test]
    fn test_rpn_evaluator_ieee_semantics() {
        assert_eq!(eval("1 0 /").unwrap(), f64::INFINITY);
        assert_eq!(eval("-1 0 :").unwrap(), f64::NEG_INFINITY);
        assert!(eval("0 0 /").unwrap().is_nan());
        assert!(eval("-4 sqrt").unwrap().is_nan());
        assert!(eval("-1 ln").unwrap().is_nan());
    }

    #[test]
    fn test_rpn_evaluator_insufficient_operands() {
        assert_eq!(
            eval("+").unwrap_err(),
            RpnEvaluatorError::InsufficientOperands {
                token: "+".to_string(),
                required: 2,
                available: 0,
            }
        );
        assert_eq!(
            eval("1 ^").unwrap_err(),
            RpnEvaluatorError::InsufficientOperands {
                token: "^".to_string(),
                required: 2,
                available: 1,
            }
        );
        assert_eq!(
            eval("sqrt").unwrap_err(),
            RpnEvaluatorError::InsufficientOperands {
                token: "sqrt".to_string(),
                required: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn test_rpn_evaluator_unknown_token() {
        assert_eq!(
            eval("1 tan").unwrap_err(),
            RpnEvaluatorError::UnknownToken("tan".to_string())
        );
        assert_eq!(
            eval("2 foo").unwrap_err(),
            RpnEvaluatorError::UnknownToken("foo".to_string())
        );
        assert_eq!(
            eval("1 2 ( +").unwrap_err(),
            RpnEvaluatorError::UnknownToken("(".to_string())
        );
    }

    #[test]
    fn test_rpn_evaluator_spelled_out_floats_are_unknown() {
        assert_eq!(
            eval("1 inf +").unwrap_err(),
            RpnEvaluatorError::UnknownToken("inf".to_string())
        );
        assert_eq!(
            eval("1 nan").unwrap_err(),
            RpnEvaluatorError::UnknownToken("nan".to_string())
        );
    }

    #[test]
    fn test_rpn_evaluator_operands_checked_before_name() {
        assert_eq!(
            eval("foo").unwrap_err(),
            RpnEvaluatorError::InsufficientOperands {
                token: "foo".to_string(),
                required: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn test_rpn_evaluator_malformed() {
        assert_eq!(
            eval("1 2").unwrap_err(),
            RpnEvaluatorError::MalformedPostfix { remaining: 2 }
        );
        assert_eq!(
            eval("").unwrap_err(),
            RpnEvaluatorError::MalformedPostfix { remaining: 0 }
        );
    }

    #[test]
    fn test_convert_to_rpn_and_eval() {
        use crate::rpn_converter::RpnConverter;
        use crate::tokenizer::tokenize;

        let input = "3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3";
        let rpn = RpnConverter::convert(tokenize(input)).unwrap();
        assert_eq!(RpnEvaluator::evaluate(&rpn).unwrap(), 3.0001220703125);

        let input = "((12 * 6 + 1.5) : (2 - 0.5)) ^ 2";
        let rpn = RpnConverter::convert(tokenize(input)).unwrap();
        assert_eq!(RpnEvaluator::evaluate(&rpn).unwrap(), 2401.0);

        let input = "sqrt(ln(1) + 9) * 2e1";
        let rpn = RpnConverter::convert(tokenize(input)).unwrap();
        assert_eq!(RpnEvaluator::evaluate(&rpn).unwrap(), 60.0);
    }

    #[test]
    fn test_convert_malformed_number_fails_late() {
        use crate::rpn_converter::RpnConverter;
        use crate::tokenizer::tokenize;

        let rpn = RpnConverter::convert(tokenize("2 * 3e")).unwrap();
        assert_eq!(rpn.to_string(), "2 3e *");
        assert_eq!(
            RpnEvaluator::evaluate(&rpn).unwrap_err(),
            RpnEvaluatorError::UnknownToken("3e".to_string())
        );
    }
}
