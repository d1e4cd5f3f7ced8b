use super::value::{IntList, Pair, Value};
use crate::common::*;
use std::fmt::{self, Write};

/// What a die draws from: `1..=faces` or an explicit pair.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Shape {
    Faces(Int),
    Range(Pair),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Faces(x) => fmt::Display::fmt(x, f),
            Self::Range(p) => fmt::Display::fmt(p, f),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceOutcome {
    pub amount: Int,
    pub shape: Shape,
    pub result: IntList,
    pub sum: Int,
}

impl fmt::Display for DiceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d{} -> {} **{}**",
            self.amount, self.shape, self.result, self.sum
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompareOutcome {
    pub op: CompareOperator,
    pub x: Value,
    pub y: Value,
    pub result: IntList,
    pub sum: Int,
}

impl fmt::Display for CompareOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} {}",
            self.x, self.op, self.y, self.result, self.sum
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeepOutcome {
    pub mode: KeepMode,
    pub removed: IntList,
    pub kept: IntList,
    pub amount: Value,
}

struct Struck<'a>(&'a Int);

impl fmt::Display for Struck<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~~{}~~", self.0)
    }
}

impl fmt::Display for KeepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        let struck = self.removed.iter().map(|x| Struck(x).to_string());
        let plain = self.kept.iter().map(ToString::to_string);
        for (i, item) in struck.chain(plain).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&item)?;
        }
        write!(f, "]{}{} -> {}", self.mode, self.amount, self.kept)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RepeatOutcome {
    pub result: IntList,
    pub sum: Int,
}

impl fmt::Display for RepeatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "repeat result -> {} **{}**", self.result, self.sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(xs: &[i64]) -> IntList {
        xs.iter().map(|&x| Int::from(x)).collect()
    }

    #[test]
    fn test_dice_line() {
        let o = DiceOutcome {
            amount: Int::from(3),
            shape: Shape::Faces(Int::from(6)),
            result: list(&[2, 5, 1]),
            sum: Int::from(8),
        };
        assert_eq!(o.to_string(), "3d6 -> [2, 5, 1] **8**");

        let o = DiceOutcome {
            amount: Int::from(1),
            shape: Shape::Range(Pair::new(Int::from(6), Int::from(6)).unwrap()),
            result: list(&[6]),
            sum: Int::from(6),
        };
        assert_eq!(o.to_string(), "1d(6, 6) -> [6] **6**");
    }

    #[test]
    fn test_compare_line() {
        let o = CompareOutcome {
            op: CompareOperator::Gt,
            x: list(&[3, 5, 2]).into(),
            y: Int::from(4).into(),
            result: list(&[0, 1, 0]),
            sum: Int::from(1),
        };
        assert_eq!(o.to_string(), "[3, 5, 2] > 4 -> [0, 1, 0] 1");
    }

    #[test]
    fn test_keep_line() {
        let o = KeepOutcome {
            mode: KeepMode::Lowest,
            removed: list(&[6, 5, 4]),
            kept: list(&[1, 2]),
            amount: Int::from(2).into(),
        };
        assert_eq!(o.to_string(), "[~~6~~, ~~5~~, ~~4~~, 1, 2]l2 -> [1, 2]");

        let o = KeepOutcome {
            mode: KeepMode::Highest,
            removed: list(&[]),
            kept: list(&[3]),
            amount: Int::from(4).into(),
        };
        assert_eq!(o.to_string(), "[3]k4 -> [3]");
    }

    #[test]
    fn test_repeat_line() {
        let o = RepeatOutcome {
            result: list(&[7, 9]),
            sum: Int::from(16),
        };
        assert_eq!(o.to_string(), "repeat result -> [7, 9] **16**");
    }
}
