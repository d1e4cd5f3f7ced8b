use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub slice: &'a str,
}

pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut lex = TokenKind::lexer(s);
    let mut tokens = Vec::new();
    while let Some(kind) = lex.next() {
        tokens.push(Token {
            kind,
            span: lex.span(),
            slice: lex.slice(),
        });
    }
    tokens
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    #[token("d")]
    #[token("D")]
    Dice,
    #[token("n")]
    #[token("N")]
    Repeat,
    #[token("k")]
    #[token("K")]
    KeepHighest,
    #[token("l")]
    #[token("L")]
    KeepLowest,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqualEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            LeftParen => "'('",
            RightParen => "')'",
            Comma => "','",
            Dice => "'d'",
            Repeat => "'n'",
            KeepHighest => "'k'",
            KeepLowest => "'l'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            EqualEqual => "'=='",
            GreaterEqual => "'>='",
            LessEqual => "'<='",
            BangEqual => "'!='",
            LessThan => "'<'",
            GreaterThan => "'>'",
            Error => "<error>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
