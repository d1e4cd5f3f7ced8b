use crate::common::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Evaluate)]
pub enum Node {
    Literal(Literal),
    Pair(PairNode),
    Repeat(Repeat),
    Dice(Dice),
    SingleDice(SingleDice),
    Neg(Neg),
    Arith(Arith),
    Compare(Compare),
    Keep(Keep),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Integer,
    Pair,
    Repeat,
    Dice,
    SingleDice,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    Ne,
    KeepMax,
    KeepMin,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        use NodeKind::*;

        match self {
            Integer => "Integer",
            Pair => "Pair",
            Repeat => "Repeat",
            Dice => "Dice",
            SingleDice => "SingleDice",
            Neg => "Neg",
            Add => "Add",
            Sub => "Sub",
            Mul => "Mul",
            Div => "Div",
            Ge => "GE",
            Le => "LE",
            Gt => "GT",
            Lt => "LT",
            Eq => "EQ",
            Ne => "NE",
            KeepMax => "KeepMax",
            KeepMin => "KeepMin",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Node {
    pub fn literal(value: impl Into<Int>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
        })
    }

    pub fn pair(low: Node, high: Node) -> Self {
        Self::Pair(PairNode {
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    pub fn repeat(amount: Node, body: Node) -> Self {
        Self::Repeat(Repeat {
            amount: Box::new(amount),
            body: Box::new(body),
        })
    }

    pub fn dice(amount: Node, shape: Node) -> Self {
        Self::Dice(Dice {
            amount: Box::new(amount),
            shape: Box::new(shape),
        })
    }

    pub fn single_dice(shape: Node) -> Self {
        Self::SingleDice(SingleDice {
            shape: Box::new(shape),
        })
    }

    pub fn neg(value: Node) -> Self {
        Self::Neg(Neg {
            value: Box::new(value),
        })
    }

    pub fn arith(op: ArithOperator, operands: NonEmpty<Node>) -> Self {
        Self::Arith(Arith { op, operands })
    }

    pub fn binary(op: ArithOperator, lhs: Node, rhs: Node) -> Self {
        Self::arith(op, vec1![lhs, rhs])
    }

    pub fn compare(op: CompareOperator, lhs: Node, rhs: Node) -> Self {
        Self::Compare(Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn keep(mode: KeepMode, list: Node, amount: Node) -> Self {
        Self::Keep(Keep {
            mode,
            list: Box::new(list),
            amount: Box::new(amount),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Literal(_) => NodeKind::Integer,
            Self::Pair(_) => NodeKind::Pair,
            Self::Repeat(_) => NodeKind::Repeat,
            Self::Dice(_) => NodeKind::Dice,
            Self::SingleDice(_) => NodeKind::SingleDice,
            Self::Neg(_) => NodeKind::Neg,
            Self::Arith(x) => match x.op {
                ArithOperator::Add => NodeKind::Add,
                ArithOperator::Sub => NodeKind::Sub,
                ArithOperator::Mul => NodeKind::Mul,
                ArithOperator::Div => NodeKind::Div,
            },
            Self::Compare(x) => match x.op {
                CompareOperator::Ge => NodeKind::Ge,
                CompareOperator::Le => NodeKind::Le,
                CompareOperator::Gt => NodeKind::Gt,
                CompareOperator::Lt => NodeKind::Lt,
                CompareOperator::Eq => NodeKind::Eq,
                CompareOperator::Ne => NodeKind::Ne,
            },
            Self::Keep(x) => match x.mode {
                KeepMode::Highest => NodeKind::KeepMax,
                KeepMode::Lowest => NodeKind::KeepMin,
            },
        }
    }

    pub fn children(&self) -> Vec<&Node> {
        match self {
            Self::Literal(_) => vec![],
            Self::Pair(x) => vec![&*x.low, &*x.high],
            Self::Repeat(x) => vec![&*x.amount, &*x.body],
            Self::Dice(x) => vec![&*x.amount, &*x.shape],
            Self::SingleDice(x) => vec![&*x.shape],
            Self::Neg(x) => vec![&*x.value],
            Self::Arith(x) => x.operands.iter().collect(),
            Self::Compare(x) => vec![&*x.lhs, &*x.rhs],
            Self::Keep(x) => vec![&*x.list, &*x.amount],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(x) => fmt::Display::fmt(&x.value, f),
            Self::Pair(x) => write!(f, "({}, {})", x.low, x.high),
            _ => {
                write!(f, "{}(", self.kind())?;
                for (i, child) in self.children().into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(child, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Literal {
    pub value: Int,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairNode {
    pub low: Box<Node>,
    pub high: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Repeat {
    pub amount: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dice {
    pub amount: Box<Node>,
    pub shape: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleDice {
    pub shape: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Neg {
    pub value: Box<Node>,
}

/// A left-associative arithmetic chain; evaluation folds `op` over the operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Arith {
    pub op: ArithOperator,
    pub operands: NonEmpty<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub op: CompareOperator,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keep {
    pub mode: KeepMode,
    pub list: Box<Node>,
    pub amount: Box<Node>,
}
