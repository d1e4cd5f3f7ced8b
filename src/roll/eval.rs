use super::{
    ctx::EvalContext,
    error::EvalError,
    outcome::{CompareOutcome, DiceOutcome, KeepOutcome, RepeatOutcome, Shape},
    roller::Roller,
    value::{IntList, Pair},
    EResult, Value,
};
use crate::common::*;
use crate::parse::ast::{Arith, Compare, Dice, Keep, Literal, Neg, Node, PairNode, Repeat, SingleDice};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value>;
}

impl Evaluate for Literal {
    fn evaluate<R: Roller>(&self, _ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        Ok(Value::Int(self.value.clone()))
    }
}

impl Evaluate for PairNode {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let low = self.low.evaluate(ctx)?.to_scalar()?;
        let high = self.high.evaluate(ctx)?.to_scalar()?;
        Ok(Pair::new(low, high)?.into())
    }
}

fn shape_of(value: Value) -> EResult<Shape> {
    match value {
        Value::Pair(p) => Ok(Shape::Range(p)),
        other => Ok(Shape::Faces(other.to_scalar()?)),
    }
}

fn roll_dice<R: Roller>(
    ctx: &mut EvalContext<'_, R>,
    amount: Int,
    shape: Shape,
) -> EResult<(Value, DiceOutcome)> {
    ctx.check_amount(&amount)?;
    let result = match &shape {
        Shape::Faces(faces) => {
            ctx.check_shape(faces)?;
            ctx.roll(&amount, &Int::one(), faces)?
        }
        Shape::Range(pair) => {
            ctx.check_shape(pair.high())?;
            ctx.roll(&amount, pair.low(), pair.high())?
        }
    };
    let sum = result.sum();
    let outcome = DiceOutcome {
        amount,
        shape,
        result: result.clone(),
        sum,
    };
    Ok((result.into(), outcome))
}

impl Evaluate for Dice {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        ctx.step(|ctx| {
            let amount = self.amount.evaluate(ctx)?.to_scalar()?;
            let shape = shape_of(self.shape.evaluate(ctx)?)?;
            roll_dice(ctx, amount, shape)
        })
    }
}

impl Evaluate for SingleDice {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        ctx.step(|ctx| {
            let shape = shape_of(self.shape.evaluate(ctx)?)?;
            roll_dice(ctx, Int::one(), shape)
        })
    }
}

impl Evaluate for Repeat {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        ctx.repeat_block(|ctx| {
            let amount = self.amount.evaluate(ctx)?.to_scalar()?;
            ctx.check_amount(&amount)?;

            let num = amount.to_usize().unwrap_or(0);
            let mut result = IntList::with_capacity(num);
            for _ in 0..num {
                result.push(self.body.evaluate(ctx)?.to_scalar()?);
            }
            let sum = result.sum();
            let outcome = RepeatOutcome {
                result: result.clone(),
                sum,
            };
            Ok((result.into(), outcome))
        })
    }
}

impl Evaluate for Neg {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        match self.value.evaluate(ctx)? {
            Value::Int(x) => Ok(Value::Int(-x)),
            Value::List(xs) => Ok(Value::List(xs.into_iter().map(|x| -x).collect())),
            other => Err(EvalError::type_mismatch("integer or integer list", &other)),
        }
    }
}

impl ArithOperator {
    pub fn apply(self, x: Int, y: Int) -> EResult<Int> {
        match self {
            Self::Add => Ok(x + y),
            Self::Sub => Ok(x - y),
            Self::Mul => Ok(x * y),
            Self::Div if y.is_zero() => Err(EvalError::DivisionByZero),
            Self::Div => Ok(x.div_floor(&y)),
        }
    }
}

impl Evaluate for Arith {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        let values = self
            .operands
            .iter()
            .map(|node| node.evaluate(ctx))
            .collect::<EResult<Vec<_>>>()?;

        let mut values = values.iter();
        let mut acc = match values.next() {
            Some(first) => first.to_scalar()?,
            None => return Ok(Value::Int(Int::zero())),
        };
        for value in values {
            acc = self.op.apply(acc, value.to_scalar()?)?;
        }
        Ok(Value::Int(acc))
    }
}

impl Evaluate for Compare {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        ctx.step(|ctx| {
            let x = self.lhs.evaluate(ctx)?;
            let y = self.rhs.evaluate(ctx)?;
            let threshold = y.to_scalar()?;

            let result: IntList = x
                .clone()
                .into_list()?
                .iter()
                .map(|e| Int::from(u8::from(self.op.test(e, &threshold))))
                .collect();
            let sum = result.sum();
            let outcome = CompareOutcome {
                op: self.op,
                x,
                y,
                result: result.clone(),
                sum,
            };
            Ok((result.into(), outcome))
        })
    }
}

/// Drops the lowest (for [`KeepMode::Highest`]) or highest values one at a time
/// until at most `amount` remain, preserving the original order of survivors.
fn select(mode: KeepMode, list: &IntList, amount: &Int) -> IntList {
    let mut kept = list.clone();
    while Int::from(kept.len()) > *amount {
        let target = match mode {
            KeepMode::Highest => kept.iter().min(),
            KeepMode::Lowest => kept.iter().max(),
        }
        .cloned();
        match target {
            Some(x) => kept.remove_first(&x),
            None => break,
        };
    }
    kept
}

impl Evaluate for Keep {
    fn evaluate<R: Roller>(&self, ctx: &mut EvalContext<'_, R>) -> EResult<Value> {
        ctx.step(|ctx| {
            let list = self.list.evaluate(ctx)?;
            let amount = self.amount.evaluate(ctx)?;
            let list = match list {
                Value::List(xs) => xs,
                other => return Err(EvalError::type_mismatch("integer list", &other)),
            };
            let kept = select(self.mode, &list, &amount.to_scalar()?);

            let mut removed = list;
            for x in kept.iter() {
                removed.remove_first(x);
            }
            let outcome = KeepOutcome {
                mode: self.mode,
                removed,
                kept: kept.clone(),
                amount,
            };
            Ok((kept.into(), outcome))
        })
    }
}
