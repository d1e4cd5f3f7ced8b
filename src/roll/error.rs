use super::value::Value;
use crate::common::Int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("range error: {low} is greater than {high}")]
    Range { low: Int, high: Int },
    #[error("shape over: {0} reaches the limit of {1}")]
    ShapeOver(Int, u32),
    #[error("count over: {0} reaches the limit of {1}")]
    AmountOver(Int, u32),
    #[error("zero division")]
    DivisionByZero,
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("too many dice rolled")]
    TooManyRolls,
}

impl EvalError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }
}
