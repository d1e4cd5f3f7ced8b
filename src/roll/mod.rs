mod ctx;
mod error;
mod eval;
mod outcome;
mod roller;
mod trace;
mod value;

use crate::parse::ast::Node;

pub type EResult<T> = Result<T, EvalError>;

pub use ctx::{DefaultRoller, EvalContext, Limits};
pub use error::EvalError;
pub use eval::Evaluate;
pub use outcome::{CompareOutcome, DiceOutcome, KeepOutcome, RepeatOutcome, Shape};
pub use roller::Roller;
pub use trace::{Recorders, SessionId, Trace, TraceEvent};
pub use value::{IntList, Pair, Value};

/// Evaluates `node`, appending its trace lines to `trace`.
pub fn eval<R: Roller>(node: &Node, roller: R, limits: Limits, trace: &mut Trace) -> EResult<Value> {
    EvalContext::new(roller, limits, trace).eval(node)
}
