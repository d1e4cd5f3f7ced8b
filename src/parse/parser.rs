use super::ast::Node;
use super::grammar::{Associativity, Extension, Grammar, Rule};
use super::lexer::{tokenize, Token, TokenKind};
use crate::common::*;
use std::fmt;
use std::ops::Range;

type PResult<T = Parsed> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

impl ParseError {
    fn is_fatal(&self) -> bool {
        matches!(self.kind, ParseErrorKind::TooDeep(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    TooDeep(usize),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                match found {
                    Some(found) => write!(f, "unexpected token: found {}, expected ", found)?,
                    None => write!(f, "unexpected end of input, expected ")?,
                }
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::TooDeep(max) => write!(f, "expression nests deeper than {} levels", max),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = expected.len();

    if expected.is_empty() {
        f.write_str("end of input")
    } else if len == 1 {
        f.write_str(expected[0].as_str())
    } else if len == 2 {
        write!(f, "{} or {}", expected[0].as_str(), expected[1].as_str())
    } else {
        for exp in &expected[..len - 1] {
            write!(f, "{}, ", exp.as_str())?;
        }
        write!(f, "or {}", expected[len - 1].as_str())
    }
}

/// A parsed subtree with an upper bound on its depth.
struct Parsed {
    node: Node,
    depth: usize,
}

impl Parsed {
    fn leaf(node: Node) -> Self {
        Self { node, depth: 1 }
    }
}

pub(crate) struct Parser<'g, 'a> {
    grammar: &'g Grammar,
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    nesting: usize,
    furthest: Option<ParseError>,
}

impl<'g, 'a> Parser<'g, 'a> {
    pub fn new(grammar: &'g Grammar, source: &'a str) -> Self {
        Self {
            grammar,
            source,
            tokens: tokenize(source),
            pos: 0,
            nesting: 0,
            furthest: None,
        }
    }

    pub fn parse(mut self) -> Result<Node, ParseError> {
        let parsed = match self.parse_rule(self.grammar.top) {
            Ok(parsed) => parsed,
            Err(e) if e.is_fatal() => {
                tracing::warn!(limit = self.grammar.max_depth, "expression nests too deeply");
                return Err(e);
            }
            Err(e) => return Err(self.furthest_of(e)),
        };

        if self.pos < self.tokens.len() {
            let e = self.unexpected(vec![]);
            return Err(self.furthest_of(e));
        }

        tracing::debug!(
            kind = %parsed.node.kind(),
            depth = parsed.depth,
            source = self.source,
            "parsed dice expression"
        );
        Ok(parsed.node)
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |peeked| peeked.kind == kind)
    }

    fn matches_any(&self, options: &[TokenKind]) -> bool {
        self.peek()
            .map_or(false, |peeked| options.contains(&peeked.kind))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        let (span, slice) = match self.peek() {
            Some(token) => (token.span.clone(), token.slice.to_string()),
            None => (self.source.len()..self.source.len(), String::new()),
        };
        ParseError { kind, span, slice }
    }

    fn error<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        Err(self.error_here(kind))
    }

    fn unexpected(&self, expected: Vec<TokenKind>) -> ParseError {
        let found = self.peek().map(|t| t.kind);
        if matches!(found, Some(TokenKind::Error)) {
            self.error_here(ParseErrorKind::UnexpectedString { expected })
        } else {
            self.error_here(ParseErrorKind::UnexpectedToken { found, expected })
        }
    }

    fn unexpected_token<T>(&self, expected: Vec<TokenKind>) -> PResult<T> {
        Err(self.unexpected(expected))
    }

    /// Remembers a failed alternative so the final report points at the furthest failure.
    fn note(&mut self, e: ParseError) {
        if self
            .furthest
            .as_ref()
            .map_or(true, |f| e.span.start >= f.span.start)
        {
            self.furthest = Some(e);
        }
    }

    fn furthest_of(&mut self, e: ParseError) -> ParseError {
        match self.furthest.take() {
            Some(f) if f.span.start > e.span.start => f,
            _ => e,
        }
    }

    fn descend(&mut self) -> PResult<()> {
        self.nesting += 1;
        if self.nesting > self.grammar.max_depth {
            self.error(ParseErrorKind::TooDeep(self.grammar.max_depth))
        } else {
            Ok(())
        }
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    fn check_depth(&self, parsed: Parsed) -> PResult {
        if parsed.depth > self.grammar.max_depth {
            self.error(ParseErrorKind::TooDeep(self.grammar.max_depth))
        } else {
            Ok(parsed)
        }
    }

    /// Parses `rule`: prefix operators or an atom, then each binary level up to `rule`
    /// in turn. Every call counts as one level of nesting.
    fn parse_rule(&mut self, rule: Rule) -> PResult {
        self.descend()?;
        let top = match rule {
            Rule::Atom => None,
            Rule::Level(i) => Some(i),
        };

        let (mut parsed, from) = self.parse_prefix(top)?;
        if let Some(top) = top {
            for i in from..=top {
                parsed = self.parse_chain(i, parsed)?;
            }
        }
        self.ascend();
        Ok(parsed)
    }

    /// Tries the prefix levels admitted under `top`, loosest first, then an atom.
    /// Also returns the first level that may still extend the result.
    fn parse_prefix(&mut self, top: Option<usize>) -> PResult<(Parsed, usize)> {
        let grammar = self.grammar;
        let admitted = top.map_or(0, |top| top + 1);

        for (i, level) in grammar.levels[..admitted].iter().enumerate().rev() {
            let action = match level.descriptor.assoc {
                Associativity::RightUnary { action } => action,
                _ => continue,
            };
            if !self.matches_any(&level.descriptor.symbols) {
                continue;
            }

            let (start, nesting) = (self.pos, self.nesting);
            self.advance();
            match self.parse_rule(Rule::Level(i)) {
                Ok(operand) => {
                    let parsed = self.check_depth(Parsed {
                        node: action(operand.node),
                        depth: operand.depth + 1,
                    })?;
                    return Ok((parsed, i + 1));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.note(e);
                    self.pos = start;
                    self.nesting = nesting;
                }
            }
        }

        Ok((self.parse_atom()?, 0))
    }

    /// Extends `first` with the chain of level `index`, if that level is left-binary.
    fn parse_chain(&mut self, index: usize, first: Parsed) -> PResult {
        let grammar = self.grammar;
        let level = &grammar.levels[index];
        let (action, extension) = match level.descriptor.assoc {
            Associativity::LeftBinary { action, extension } => (action, extension),
            _ => return Ok(first),
        };

        let mut depth = first.depth;
        let mut rest = Vec::new();
        while self.matches_any(&level.descriptor.symbols) {
            let (start, nesting) = (self.pos, self.nesting);
            self.advance();

            match self.parse_operand(level.inner, extension) {
                Ok(operand) => {
                    depth = depth.max(operand.depth);
                    rest.push(operand.node);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.note(e);
                    self.pos = start;
                    self.nesting = nesting;
                    break;
                }
            }
        }

        if rest.is_empty() {
            return Ok(first);
        }

        let depth = depth + rest.len();
        let mut operands = vec1![first.node];
        for node in rest {
            operands.push(node);
        }
        self.check_depth(Parsed {
            node: action(operands),
            depth,
        })
    }

    fn parse_operand(&mut self, inner: Rule, extension: Option<Extension>) -> PResult {
        let open = self.grammar.pair.open;
        match extension {
            Some(Extension::Pair) if open != TokenKind::LeftParen && self.matches(open) => {
                self.parse_pair()
            }
            _ => self.parse_rule(inner),
        }
    }

    fn parse_atom(&mut self) -> PResult {
        if self.matches(TokenKind::Integer) {
            self.parse_integer()
        } else if self.matches(TokenKind::LeftParen) {
            self.parse_parenthesized()
        } else {
            self.unexpected_token(vec![TokenKind::Integer, TokenKind::LeftParen])
        }
    }

    fn parse_integer(&mut self) -> PResult {
        let value = self.peek().map(|t| t.slice.parse::<Int>());
        match value {
            Some(Ok(value)) => {
                self.advance();
                Ok(Parsed::leaf(Node::literal(value)))
            }
            _ => self.unexpected_token(vec![TokenKind::Integer]),
        }
    }

    /// `"(" expression ")"`, or a pair when the grammar's pair also opens with `(`.
    fn parse_parenthesized(&mut self) -> PResult {
        let pair = self.grammar.pair;
        let top = self.grammar.top;

        self.consume(TokenKind::LeftParen)?;
        let first = self.parse_rule(top)?;

        let parsed = if pair.open == TokenKind::LeftParen && self.matches(pair.separator) {
            self.advance();
            let second = self.parse_rule(top)?;
            self.consume(pair.close)?;
            Parsed {
                depth: first.depth.max(second.depth) + 1,
                node: (pair.action)(first.node, second.node),
            }
        } else if self.matches(TokenKind::RightParen) {
            self.advance();
            first
        } else if pair.open == TokenKind::LeftParen {
            return self.unexpected_token(vec![pair.separator, TokenKind::RightParen]);
        } else {
            return self.unexpected_token(vec![TokenKind::RightParen]);
        };
        self.check_depth(parsed)
    }

    fn parse_pair(&mut self) -> PResult {
        let pair = self.grammar.pair;
        let top = self.grammar.top;

        self.consume(pair.open)?;
        let low = self.parse_rule(top)?;
        self.consume(pair.separator)?;
        let high = self.parse_rule(top)?;
        self.consume(pair.close)?;

        self.check_depth(Parsed {
            depth: low.depth.max(high.depth) + 1,
            node: (pair.action)(low.node, high.node),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ast::NodeKind;

    fn parse(s: &str) -> Result<Node, ParseError> {
        Grammar::dice().parse(s)
    }

    fn check(s: &str, expected: &str) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed.to_string(), expected);
    }

    #[test]
    fn test_parse_nums() {
        check("6", "6");
        check("  32 ", "32");
        check("123456789012345678901234567890", "123456789012345678901234567890");
    }

    #[test]
    fn test_parse_dice() {
        check("3d6", "Dice(3, 6)");
        check("3D6", "Dice(3, 6)");
        check("d20", "SingleDice(20)");
        check("3d(1d6)", "Dice(3, Dice(1, 6))");
        check("1d(10, 20)", "Dice(1, (10, 20))");
        check("2d6d4", "Dice(Dice(2, 6), 4)");
        check("dd6", "SingleDice(SingleDice(6))");
        check("d2d6", "SingleDice(Dice(2, 6))");
    }

    #[test]
    fn test_parse_repeat_and_keep() {
        check("3n2d6", "Repeat(3, Dice(2, 6))");
        check("3N2d6", "Repeat(3, Dice(2, 6))");
        check("3d6k2", "KeepMax(Dice(3, 6), 2)");
        check("3d6L2", "KeepMin(Dice(3, 6), 2)");
        check("5d6l2", "KeepMin(Dice(5, 6), 2)");
        check("(3n1d6)k1", "KeepMax(Repeat(3, Dice(1, 6)), 1)");
        check("2n(3n1d6)", "Repeat(2, Repeat(3, Dice(1, 6)))");
    }

    #[test]
    fn test_parse_unary() {
        check("-2", "Neg(2)");
        check("--2", "Neg(Neg(2))");
        check("-1d20", "Neg(Dice(1, 20))");
        check("3--2", "Sub(3, Neg(2))");
    }

    #[test]
    fn test_parse_arith() {
        check("4+2*3", "Add(4, Mul(2, 3))");
        check("1 + 2 + 3", "Add(1, 2, 3)");
        check("10 - 2 - 3", "Sub(10, 2, 3)");
        check("8 - 2 + 1", "Add(Sub(8, 2), 1)");
        check("2 * 6 / 3", "Mul(2, Div(6, 3))");
        check("(1 + 2) * 3", "Mul(Add(1, 2), 3)");
    }

    #[test]
    fn test_parse_comparisons() {
        check("1d6 > 0", "GT(Dice(1, 6), 0)");
        check("1d6 >= 1", "GE(Dice(1, 6), 1)");
        check("1d6 <= 1", "LE(Dice(1, 6), 1)");
        check("1d6 < 0", "LT(Dice(1, 6), 0)");
        check("1d(6, 6) == 6", "EQ(Dice(1, (6, 6)), 6)");
        check("1d6 != 0", "NE(Dice(1, 6), 0)");
        check("3d6 + 1 > 4", "GT(Add(Dice(3, 6), 1), 4)");
        check("1 > 2 > 3", "GT(GT(1, 2), 3)");
    }

    #[test]
    fn test_parse_complex() {
        check(
            "(5d6)n(2n((((2*3)d6 > 3)l3)d6))",
            "Repeat(Dice(5, 6), Repeat(2, Dice(KeepMin(GT(Dice(Mul(2, 3), 6), 3), 3), 6)))",
        );
        assert_eq!(parse("(1, 2)").unwrap().kind(), NodeKind::Pair);
        check("((1, 2))", "(1, 2)");
    }

    #[test]
    fn test_parse_errors() {
        let e = parse("3+").unwrap_err();
        assert_eq!(e.span, 2..2);
        assert_eq!(
            e.kind,
            ParseErrorKind::UnexpectedToken {
                found: None,
                expected: vec![TokenKind::Integer, TokenKind::LeftParen],
            }
        );

        let e = parse("3 ) 4").unwrap_err();
        assert_eq!(e.span, 2..3);
        assert_eq!(
            e.kind,
            ParseErrorKind::UnexpectedToken {
                found: Some(TokenKind::RightParen),
                expected: vec![],
            }
        );

        let e = parse("1 ? 2").unwrap_err();
        assert!(matches!(e.kind, ParseErrorKind::UnexpectedString { .. }));
        assert_eq!(e.slice, "?");

        assert!(parse("").is_err());
        assert!(parse("(1, 2").is_err());
        assert!(parse("d").is_err());
    }

    #[test]
    fn test_parse_too_deep() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        let e = parse(&deep).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::TooDeep(MAX_DEPTH));

        let chain = vec!["1"; 300].join("d");
        let e = parse(&chain).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::TooDeep(MAX_DEPTH));

        let negs = format!("{}1", "-".repeat(300));
        assert_eq!(parse(&negs).unwrap_err().kind, ParseErrorKind::TooDeep(MAX_DEPTH));

        let shallow = Grammar::dice().with_max_depth(4);
        assert!(shallow.parse("((1))").is_ok());
        assert!(shallow.parse("((((((1))))))").is_err());
    }

    #[test]
    fn test_nesting_limit_counts_parens() {
        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert!(parse(&ok).is_ok());

        let over = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse(&over).unwrap_err().kind, ParseErrorKind::TooDeep(MAX_DEPTH));
    }

    #[test]
    fn test_unclosed_operands_fail_fast() {
        for opener in ["1d(", "2n(", "-(", "d("] {
            let s = format!("{}1", opener.repeat(40));
            let started = std::time::Instant::now();
            let e = parse(&s).unwrap_err();
            assert!(started.elapsed().as_secs() < 2, "{:?} took {:?}", opener, started.elapsed());
            assert_eq!(e.span, s.len()..s.len());
        }
    }

    fn on_small_stack<F: FnOnce() + Send + 'static>(f: F) {
        std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_deep_nesting_fits_small_stack() {
        on_small_stack(|| {
            let parens = format!("{}1d6{}", "(".repeat(MAX_DEPTH - 2), ")".repeat(MAX_DEPTH - 2));
            assert_eq!(parse(&parens).unwrap().kind(), NodeKind::Dice);

            let negs = format!("{}1", "-(".repeat(MAX_DEPTH / 2 - 1)) + &")".repeat(MAX_DEPTH / 2 - 1);
            assert!(parse(&negs).is_ok());

            // every binary level on the way down to each paren
            let link = "1!=1==1<1<=1>1>=1+1-1*1/-1l1k1n1d(";
            let chained = |n: usize| format!("{}1{}", link.repeat(n), ")".repeat(n));
            assert!(parse(&chained(6)).is_ok());
            assert_eq!(parse(&chained(40)).unwrap_err().kind, ParseErrorKind::TooDeep(MAX_DEPTH));
        });
    }

    #[test]
    fn test_error_display() {
        let e = parse("3+").unwrap_err();
        assert_eq!(
            e.to_string(),
            "error at position 2 (\"\"): unexpected end of input, expected <integer> or '('"
        );
    }
}
