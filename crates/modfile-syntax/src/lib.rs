//! # modfile-syntax
//!
//! Lexer, parser and document model for module manifest files.
//!
//! ## Overview
//!
//! A manifest names a module and lists its dependency relationships:
//!
//! ```text
//! module "example.com/widget"
//!
//! require "example.com/dep" v1.2.3
//! require (
//!     "example.com/dep2" v0.1.0
//!     "example.com/dep3" v2.0.0
//! )
//! exclude "example.com/bad" v0.0.1
//! replace "example.com/dep" v1.2.3 => "example.com/fork" v1.2.4-patched
//! ```
//!
//! - **Lexer**: pull-based scanner producing one [`Token`] at a time
//! - **Parser**: state machine that pulls tokens and builds a [`Document`]
//! - **Errors**: [`ParseError`] with line/column and the expected production
//!
//! ## Architecture
//!
//! ```text
//! Source text
//!     ↓
//! Lexer (next_token, on demand)
//!     ↓
//! Parser (Module → ModuleName → Verb ⇄ List/ListElem → End)
//!     ↓
//! Document
//! ```
//!
//! Newlines are significant: every declaration ends at the end of its line.
//! Parsing stops at the first error and no partial document is returned.
//!
//! ## Example
//!
//! ```rust
//! use modfile_syntax::parse;
//!
//! let doc = parse("module \"m\"\nrequire \"p\" v1.0.0\n").expect("valid manifest");
//!
//! assert_eq!(doc.name, "m");
//! assert_eq!(doc.requires[0].path, "p");
//! assert_eq!(doc.requires[0].version, "v1.0.0");
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use modfile_syntax::{parse, Diagnostic, ErrorKind};
//!
//! let source = "module \"m\"\nbogus \"x\" v1\n";
//! let err = parse(source).unwrap_err();
//!
//! assert_eq!(err.kind(), ErrorKind::Structural);
//! assert!(err.to_string().starts_with("expected verb declaration"));
//! println!("{}", Diagnostic::new(source, &err));
//! ```

pub mod document;
pub mod error;
pub mod lexer;
pub mod parser;

pub use document::{Document, Package, PackageMapping};
pub use error::{Diagnostic, ErrorKind, ParseError, Span};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{Parser, parse};
