pub use modfile_syntax::{
    Diagnostic, Document, ErrorKind, Lexer, Package, PackageMapping, ParseError, Span, Token,
    TokenKind, parse, tokenize,
};

pub mod prelude {
    pub use crate::{Document, Package, PackageMapping, ParseError, parse};
}
