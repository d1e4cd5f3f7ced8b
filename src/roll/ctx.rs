use super::{
    error::EvalError, roller::Roller, trace::Trace, value::IntList, EResult, Evaluate, Value,
};
use crate::common::*;
use crate::parse::ast::Node;
use num_traits::ToPrimitive;
use std::fmt::Display;

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Ceilings that bound the work a single evaluation may do.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Limits {
    /// Dice and repeat counts must stay below this.
    pub max_amount: u32,
    /// A die's upper bound must stay below this.
    pub max_shape: u32,
    /// Total draws allowed per evaluation; `None` is unbounded.
    pub max_rolls: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_amount: MAX_AMOUNT,
            max_shape: MAX_SHAPE,
            max_rolls: None,
        }
    }
}

pub struct EvalContext<'t, R = DefaultRoller> {
    roller: R,
    limits: Limits,
    trace: &'t mut Trace,
    rolls: usize,
}

impl<'t, R: Roller> EvalContext<'t, R> {
    pub fn new(roller: R, limits: Limits, trace: &'t mut Trace) -> Self {
        Self {
            roller,
            limits,
            trace,
            rolls: 0,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn trace(&self) -> &Trace {
        self.trace
    }

    pub fn rolls(&self) -> usize {
        self.rolls
    }

    pub fn eval(&mut self, node: &Node) -> EResult<Value> {
        self.trace.reset();
        self.rolls = 0;
        let mark = self.trace.len();

        let result = node.evaluate(self);
        match &result {
            Ok(value) => tracing::debug!(
                %value,
                rolls = self.rolls,
                lines = self.trace.len(),
                "evaluated dice expression"
            ),
            Err(why) => {
                tracing::debug!(error = %why, "evaluation aborted");
                self.trace.truncate(mark);
                self.trace.reset();
            }
        }
        result
    }

    pub(crate) fn check_amount(&self, amount: &Int) -> EResult<()> {
        if *amount >= Int::from(self.limits.max_amount) {
            tracing::warn!(%amount, limit = self.limits.max_amount, "amount over limit");
            Err(EvalError::AmountOver(amount.clone(), self.limits.max_amount))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_shape(&self, high: &Int) -> EResult<()> {
        if *high >= Int::from(self.limits.max_shape) {
            tracing::warn!(shape = %high, limit = self.limits.max_shape, "shape over limit");
            Err(EvalError::ShapeOver(high.clone(), self.limits.max_shape))
        } else {
            Ok(())
        }
    }

    fn count_rolls(&mut self, n: usize) -> EResult<()> {
        self.rolls += n;
        if self.limits.max_rolls.map_or(false, |max| self.rolls > max) {
            tracing::warn!(rolls = self.rolls, "roll budget exhausted");
            Err(EvalError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    /// Draws `amount` values from `low..=high`; a non-positive amount draws nothing.
    pub(crate) fn roll(&mut self, amount: &Int, low: &Int, high: &Int) -> EResult<IntList> {
        let num = amount.to_usize().unwrap_or(0);
        if num == 0 {
            return Ok(IntList::new());
        }
        if low > high {
            return Err(EvalError::Range {
                low: low.clone(),
                high: high.clone(),
            });
        }
        self.count_rolls(num)?;

        tracing::trace!(num, %low, %high, "rolling dice");
        Ok(self.roller.roll_n(num, low, high).into())
    }

    /// Runs one traced node: opens a repeat step if needed and records the node's line.
    pub(crate) fn step<F, O>(&mut self, f: F) -> EResult<Value>
    where
        F: FnOnce(&mut Self) -> EResult<(Value, O)>,
        O: Display,
    {
        self.trace.enter_step();
        let (value, outcome) = f(self)?;
        self.trace.leave_step(outcome.to_string());
        Ok(value)
    }

    /// Runs a repeat node: everything traced inside is numbered under a new counter.
    pub(crate) fn repeat_block<F, O>(&mut self, f: F) -> EResult<Value>
    where
        F: FnOnce(&mut Self) -> EResult<(Value, O)>,
        O: Display,
    {
        self.trace.enter_repeat();
        let (value, outcome) = f(self)?;
        self.trace.leave_repeat(outcome.to_string());
        Ok(value)
    }
}
