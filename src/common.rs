use std::fmt::{self, Write};
pub use vec1::vec1;

pub type Int = num_bigint::BigInt;

pub type NonEmpty<T> = vec1::Vec1<T>;

pub const MAX_AMOUNT: u32 = 10_000;
pub const MAX_SHAPE: u32 = 10_000;
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArithOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CompareOperator {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    Ne,
}

impl CompareOperator {
    pub fn test(self, x: &Int, y: &Int) -> bool {
        match self {
            Self::Ge => x >= y,
            Self::Le => x <= y,
            Self::Gt => x > y,
            Self::Lt => x < y,
            Self::Eq => x == y,
            Self::Ne => x != y,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeepMode {
    Highest,
    Lowest,
}

impl fmt::Display for KeepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Highest => 'k',
            Self::Lowest => 'l',
        };
        f.write_char(c)
    }
}

/// Joins displayable items the way the trace prints lists: `[a, b, c]`.
pub(crate) fn fmt_list<T: fmt::Display>(items: &[T], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(item, f)?;
    }
    f.write_char(']')
}
