use crate::{parse::ParseError, roll::EvalError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RollError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

impl RollError {
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_eval(&self) -> Option<&EvalError> {
        match self {
            Self::Eval(e) => Some(e),
            _ => None,
        }
    }
}
