use super::{error::EvalError, EResult};
use crate::common::*;
use num_traits::Zero;
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    Int(Int),
    List(IntList),
    Pair(Pair),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::List(_) => "integer list",
            Self::Pair(_) => "pair",
        }
    }

    /// Integers pass through, lists collapse to their sum.
    pub fn to_scalar(&self) -> EResult<Int> {
        match self {
            Self::Int(x) => Ok(x.clone()),
            Self::List(xs) => Ok(xs.sum()),
            Self::Pair(_) => Err(EvalError::type_mismatch("integer or integer list", self)),
        }
    }

    /// Lists pass through, integers become a one-element list.
    pub fn into_list(self) -> EResult<IntList> {
        match self {
            Self::Int(x) => Ok(IntList::from(vec![x])),
            Self::List(xs) => Ok(xs),
            Self::Pair(_) => Err(EvalError::type_mismatch("integer or integer list", &self)),
        }
    }

    pub fn as_list(&self) -> Option<&IntList> {
        match self {
            Self::List(xs) => Some(xs),
            _ => None,
        }
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<IntList> for Value {
    fn from(xs: IntList) -> Self {
        Self::List(xs)
    }
}

impl From<Pair> for Value {
    fn from(p: Pair) -> Self {
        Self::Pair(p)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::List(xs) => fmt::Display::fmt(xs, f),
            Self::Pair(p) => fmt::Display::fmt(p, f),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct IntList(Vec<Int>);

impl IntList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub fn push(&mut self, x: Int) {
        self.0.push(x);
    }

    pub fn sum(&self) -> Int {
        self.0.iter().fold(Int::zero(), |a, b| a + b)
    }

    /// Removes the first element equal to `x`.
    pub fn remove_first(&mut self, x: &Int) -> bool {
        match self.0.iter().position(|y| y == x) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }
}

impl Deref for IntList {
    type Target = [Int];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Int>> for IntList {
    fn from(xs: Vec<Int>) -> Self {
        Self(xs)
    }
}

impl FromIterator<Int> for IntList {
    fn from_iter<I: IntoIterator<Item = Int>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for IntList {
    type Item = Int;
    type IntoIter = std::vec::IntoIter<Int>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for IntList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_list(&self.0, f)
    }
}

/// An inclusive `(low, high)` range with `low <= high`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pair {
    low: Int,
    high: Int,
}

impl Pair {
    pub fn new(low: Int, high: Int) -> EResult<Self> {
        if low > high {
            Err(EvalError::Range { low, high })
        } else {
            Ok(Self { low, high })
        }
    }

    pub fn low(&self) -> &Int {
        &self.low
    }

    pub fn high(&self) -> &Int {
        &self.high
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(xs: &[i64]) -> IntList {
        xs.iter().map(|&x| Int::from(x)).collect()
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(Value::from(Int::from(6)).to_scalar().unwrap(), Int::from(6));
        assert_eq!(Value::from(list(&[3, 4, 5])).to_scalar().unwrap(), Int::from(12));
        assert_eq!(Value::from(list(&[])).to_scalar().unwrap(), Int::from(0));

        let pair = Value::from(Pair::new(Int::from(1), Int::from(2)).unwrap());
        assert!(matches!(pair.to_scalar(), Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn test_into_list_wraps_scalar() {
        assert_eq!(Value::from(Int::from(4)).into_list().unwrap(), list(&[4]));
        assert_eq!(Value::from(list(&[1, 2])).into_list().unwrap(), list(&[1, 2]));
    }

    #[test]
    fn test_pair_bounds() {
        assert!(Pair::new(Int::from(6), Int::from(6)).is_ok());
        assert_eq!(
            Pair::new(Int::from(7), Int::from(6)),
            Err(EvalError::Range {
                low: Int::from(7),
                high: Int::from(6)
            })
        );
    }

    #[test]
    fn test_remove_first_only_removes_one() {
        let mut xs = list(&[2, 5, 2, 3]);
        assert!(xs.remove_first(&Int::from(2)));
        assert_eq!(xs, list(&[5, 2, 3]));
        assert!(!xs.remove_first(&Int::from(9)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(list(&[1, -2, 3])).to_string(), "[1, -2, 3]");
        assert_eq!(Value::from(list(&[])).to_string(), "[]");
        assert_eq!(
            Value::from(Pair::new(Int::from(-1), Int::from(6)).unwrap()).to_string(),
            "(-1, 6)"
        );
    }
}
