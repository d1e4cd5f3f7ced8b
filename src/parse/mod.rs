pub mod ast;
pub mod grammar;
pub mod lexer;
mod parser;

pub use grammar::{Associativity, Descriptor, Extension, Grammar, PairDescriptor};
pub use parser::{ParseError, ParseErrorKind};

/// Parses `s` with the default dice grammar.
pub fn parse(s: &str) -> Result<ast::Node, ParseError> {
    Grammar::dice().parse(s)
}
