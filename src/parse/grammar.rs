//! Operator-precedence grammar assembly.
//!
//! A [`Grammar`] is folded from an atom rule, a [`PairDescriptor`] and an ordered
//! list of [`Descriptor`]s. Each descriptor wraps the level assembled before it,
//! so descriptors earlier in the list bind tighter.

use super::ast::Node;
use super::lexer::TokenKind;
use super::parser::{ParseError, Parser};
use crate::common::*;

pub type UnaryAction = fn(Node) -> Node;
pub type ChainAction = fn(NonEmpty<Node>) -> Node;
pub type PairAction = fn(Node, Node) -> Node;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Extension {
    /// A pair may stand in for the inner rule on the right of the operator. Pairs
    /// opened with `(` are atoms anyway; other openers are only accepted here.
    Pair,
}

#[derive(Debug, Copy, Clone)]
pub enum Associativity {
    /// Contributes no syntax of its own.
    Single,
    /// `symbol (this | inner)`
    RightUnary { action: UnaryAction },
    /// `inner (symbol (inner | extension))+`, handed to `action` as one flat operand list.
    LeftBinary {
        action: ChainAction,
        extension: Option<Extension>,
    },
}

#[derive(Debug, Clone)]
pub struct Descriptor {
    pub name: &'static str,
    pub symbols: Vec<TokenKind>,
    pub assoc: Associativity,
}

impl Descriptor {
    pub fn single(name: &'static str) -> Self {
        Self {
            name,
            symbols: Vec::new(),
            assoc: Associativity::Single,
        }
    }

    pub fn right_unary(name: &'static str, symbols: &[TokenKind], action: UnaryAction) -> Self {
        Self {
            name,
            symbols: symbols.to_vec(),
            assoc: Associativity::RightUnary { action },
        }
    }

    pub fn left_binary(name: &'static str, symbols: &[TokenKind], action: ChainAction) -> Self {
        Self {
            name,
            symbols: symbols.to_vec(),
            assoc: Associativity::LeftBinary {
                action,
                extension: None,
            },
        }
    }

    pub fn with_extension(mut self, ext: Extension) -> Self {
        if let Associativity::LeftBinary { extension, .. } = &mut self.assoc {
            *extension = Some(ext);
        }
        self
    }

    fn wrap(self, inner: Rule, levels: &mut Vec<Level>) -> Rule {
        match self.assoc {
            Associativity::Single => inner,
            _ => {
                levels.push(Level {
                    descriptor: self,
                    inner,
                });
                Rule::Level(levels.len() - 1)
            }
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PairDescriptor {
    pub open: TokenKind,
    pub separator: TokenKind,
    pub close: TokenKind,
    pub action: PairAction,
}

impl Default for PairDescriptor {
    fn default() -> Self {
        Self {
            open: TokenKind::LeftParen,
            separator: TokenKind::Comma,
            close: TokenKind::RightParen,
            action: Node::pair,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Rule {
    Atom,
    Level(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub descriptor: Descriptor,
    pub inner: Rule,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) pair: PairDescriptor,
    pub(crate) levels: Vec<Level>,
    pub(crate) top: Rule,
    pub(crate) max_depth: usize,
}

impl Grammar {
    pub fn assemble(pair: PairDescriptor, descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        let mut levels = Vec::new();
        let top = descriptors
            .into_iter()
            .fold(Rule::Atom, |last, d| d.wrap(last, &mut levels));
        Self {
            pair,
            levels,
            top,
            max_depth: MAX_DEPTH,
        }
    }

    /// The dice language: `d` binds tightest, comparisons loosest.
    pub fn dice() -> Self {
        use TokenKind::*;

        Self::assemble(
            PairDescriptor::default(),
            [
                Descriptor::left_binary("Dice", &[Dice], dice).with_extension(Extension::Pair),
                Descriptor::right_unary("SingleDice", &[Dice], Node::single_dice),
                Descriptor::left_binary("Repeat", &[Repeat], repeat).with_extension(Extension::Pair),
                Descriptor::left_binary("KeepMax", &[KeepHighest], keep_max),
                Descriptor::left_binary("KeepMin", &[KeepLowest], keep_min),
                Descriptor::right_unary("Neg", &[Minus], Node::neg),
                Descriptor::left_binary("Div", &[Slash], div),
                Descriptor::left_binary("Mul", &[Star], mul),
                Descriptor::left_binary("Sub", &[Minus], sub),
                Descriptor::left_binary("Add", &[Plus], add),
                Descriptor::left_binary("GE", &[GreaterEqual], ge),
                Descriptor::left_binary("GT", &[GreaterThan], gt),
                Descriptor::left_binary("LE", &[LessEqual], le),
                Descriptor::left_binary("LT", &[LessThan], lt),
                Descriptor::left_binary("EQ", &[EqualEqual], eq),
                Descriptor::left_binary("NE", &[BangEqual], ne),
            ],
        )
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Level names from tightest to loosest binding.
    pub fn precedence(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.levels.iter().map(|l| l.descriptor.name)
    }

    pub fn parse(&self, s: &str) -> Result<Node, ParseError> {
        Parser::new(self, s).parse()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::dice()
    }
}

fn fold_left(operands: NonEmpty<Node>, f: impl Fn(Node, Node) -> Node) -> Node {
    let (first, rest) = operands.split_off_first();
    rest.into_iter().fold(first, f)
}

fn dice(operands: NonEmpty<Node>) -> Node {
    fold_left(operands, Node::dice)
}

fn repeat(operands: NonEmpty<Node>) -> Node {
    fold_left(operands, Node::repeat)
}

fn keep_max(operands: NonEmpty<Node>) -> Node {
    fold_left(operands, |l, r| Node::keep(KeepMode::Highest, l, r))
}

fn keep_min(operands: NonEmpty<Node>) -> Node {
    fold_left(operands, |l, r| Node::keep(KeepMode::Lowest, l, r))
}

macro_rules! arith_actions {
    ($($fn_name:ident => $op:ident),+ $(,)?) => {
        $(fn $fn_name(operands: NonEmpty<Node>) -> Node {
            Node::arith(ArithOperator::$op, operands)
        })+
    };
}

arith_actions!(div => Div, mul => Mul, sub => Sub, add => Add);

macro_rules! compare_actions {
    ($($fn_name:ident => $op:ident),+ $(,)?) => {
        $(fn $fn_name(operands: NonEmpty<Node>) -> Node {
            fold_left(operands, |l, r| Node::compare(CompareOperator::$op, l, r))
        })+
    };
}

compare_actions!(ge => Ge, gt => Gt, le => Le, lt => Lt, eq => Eq, ne => Ne);
