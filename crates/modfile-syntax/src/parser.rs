use crate::document::{Document, Package, PackageMapping};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use tracing::{debug, trace};

/// Collection a verb's entries are appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Require,
    Exclude,
    Replace,
}

impl Target {
    fn from_verb(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Require => Some(Target::Require),
            TokenKind::Exclude => Some(Target::Exclude),
            TokenKind::Replace => Some(Target::Replace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Module,
    ModuleName,
    Verb,
    List(Target),
    ListElem(Target),
    End,
}

/// State-machine parser for module manifests.
///
/// Tokens are pulled from a [`Lexer`] one at a time; each state consumes
/// what it needs and hands back the next state. The first grammar violation
/// ends the parse and the partially built [`Document`] is dropped.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    document: Document,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            document: Document::default(),
        }
    }

    pub fn parse(mut self) -> Result<Document, ParseError> {
        let mut state = State::Module;
        while state != State::End {
            let next = self.step(state)?;
            trace!(from = ?state, to = ?next, "state transition");
            state = next;
        }

        debug!(
            module = %self.document.name,
            requires = self.document.requires.len(),
            excludes = self.document.excludes.len(),
            replaces = self.document.replaces.len(),
            "parsed module manifest"
        );
        Ok(self.document)
    }

    fn step(&mut self, state: State) -> Result<State, ParseError> {
        match state {
            State::Module => self.parse_module(),
            State::ModuleName => self.parse_module_name(),
            State::Verb => self.parse_verb(),
            State::List(target) => self.parse_list(target),
            State::ListElem(target) => self.parse_list_elem(target),
            State::End => Ok(State::End),
        }
    }

    #[inline]
    fn next_token(&mut self) -> Token {
        self.lexer.next_token()
    }

    fn skip_newlines(&mut self) -> Token {
        loop {
            let token = self.next_token();
            if token.kind != TokenKind::Newline {
                return token;
            }
        }
    }

    fn expect_newline(&mut self) -> Result<(), ParseError> {
        let token = self.next_token();
        if token.kind != TokenKind::Newline {
            return Err(ParseError::expected("newline", &token));
        }
        Ok(())
    }

    fn parse_module(&mut self) -> Result<State, ParseError> {
        let token = self.skip_newlines();
        if token.kind != TokenKind::Module {
            return Err(ParseError::expected("module declaration", &token));
        }
        Ok(State::ModuleName)
    }

    fn parse_module_name(&mut self) -> Result<State, ParseError> {
        let token = self.next_token();
        if token.kind != TokenKind::String {
            return Err(ParseError::expected("module name", &token));
        }

        let name = unquote(&token.value);
        if name.is_empty() {
            return Err(ParseError::expected("non-empty module name", &token));
        }
        self.document.name = name.to_string();

        self.expect_newline()?;
        Ok(State::Verb)
    }

    fn parse_verb(&mut self) -> Result<State, ParseError> {
        let token = self.next_token();
        if let Some(target) = Target::from_verb(token.kind) {
            return Ok(State::List(target));
        }
        match token.kind {
            TokenKind::Newline => Ok(State::Verb),
            TokenKind::Eof => Ok(State::End),
            _ => Err(ParseError::expected("verb declaration", &token)),
        }
    }

    fn parse_list(&mut self, target: Target) -> Result<State, ParseError> {
        let token = self.next_token();
        match token.kind {
            TokenKind::LeftParen => {
                self.expect_newline()?;
                Ok(State::ListElem(target))
            }
            TokenKind::String => {
                self.read_entry(target, token)?;
                self.expect_newline()?;
                Ok(State::Verb)
            }
            _ => Err(ParseError::expected("package path or '('", &token)),
        }
    }

    fn parse_list_elem(&mut self, target: Target) -> Result<State, ParseError> {
        let token = self.skip_newlines();
        match token.kind {
            TokenKind::RightParen => {
                self.expect_newline()?;
                Ok(State::Verb)
            }
            TokenKind::String => {
                self.read_entry(target, token)?;
                self.expect_newline()?;
                Ok(State::ListElem(target))
            }
            _ => Err(ParseError::expected("package path or ')'", &token)),
        }
    }

    fn read_entry(&mut self, target: Target, first: Token) -> Result<(), ParseError> {
        match target {
            Target::Require => {
                let pkg = self.read_package(first)?;
                self.document.requires.push(pkg);
            }
            Target::Exclude => {
                let pkg = self.read_package(first)?;
                self.document.excludes.push(pkg);
            }
            Target::Replace => {
                let mapping = self.read_mapping(first)?;
                self.document.replaces.push(mapping);
            }
        }
        Ok(())
    }

    fn read_package(&mut self, token: Token) -> Result<Package, ParseError> {
        if token.kind != TokenKind::String {
            return Err(ParseError::expected("package path", &token));
        }

        let path = unquote(&token.value);
        if path.is_empty() {
            return Err(ParseError::expected("non-empty package path", &token));
        }

        let version = self.next_token();
        if version.kind != TokenKind::Version {
            return Err(ParseError::expected("package version", &version));
        }

        Ok(Package::new(path, version.value))
    }

    fn read_mapping(&mut self, first: Token) -> Result<PackageMapping, ParseError> {
        let from = self.read_package(first)?;

        let arrow = self.next_token();
        if arrow.kind != TokenKind::MapArrow {
            return Err(ParseError::expected("'=>'", &arrow));
        }

        let next = self.next_token();
        let to = self.read_package(next)?;
        Ok(PackageMapping { from, to })
    }
}

/// Strips the surrounding quote characters; escapes are left untouched.
fn unquote(raw: &str) -> &str {
    &raw[1..raw.len() - 1]
}

/// Parses a complete manifest.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new(input).parse()
}
