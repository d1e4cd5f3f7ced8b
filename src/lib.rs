//! Dice expressions with a step-by-step trace of every roll.
//!
//! ```
//! let roll = dice_trace::roll("3n(1d6 > 3)").unwrap();
//! assert_eq!(roll.value.as_list().unwrap().len(), 3);
//! for line in roll.trace.lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod common;
pub mod error;
pub mod parse;
pub mod roll;

pub use error::RollError;
pub use parse::{parse, Grammar};
pub use roll::{Limits, Roller, Trace, Value};

/// A finished evaluation: the final value and every line it traced.
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
    pub value: Value,
    pub trace: Trace,
}

/// Parses `s` with the default dice grammar and rolls it with the thread-local RNG.
pub fn roll(s: &str) -> Result<Roll, RollError> {
    let mut trace = Trace::new();
    let value = roll_with(&Grammar::dice(), s, rand::thread_rng(), Limits::default(), &mut trace)?;
    Ok(Roll { value, trace })
}

/// Parses `s` with `grammar` and evaluates it, appending trace lines to `trace`.
pub fn roll_with<R: Roller>(
    grammar: &Grammar,
    s: &str,
    roller: R,
    limits: Limits,
    trace: &mut Trace,
) -> Result<Value, RollError> {
    let node = grammar.parse(s)?;
    Ok(roll::eval(&node, roller, limits, trace)?)
}
