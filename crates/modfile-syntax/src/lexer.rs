use crate::error::Span;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(4);
    m.insert("module", TokenKind::Module);
    m.insert("require", TokenKind::Require);
    m.insert("exclude", TokenKind::Exclude);
    m.insert("replace", TokenKind::Replace);
    m
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Module,
    Require,
    Exclude,
    Replace,
    /// Double- or back-quoted literal; the raw value keeps its quotes.
    String,
    /// `v` followed by a digit, e.g. `v1.2.3-rc.1+meta`.
    Version,
    MapArrow,
    LeftParen,
    RightParen,
    Newline,
    /// A bare word that is not a reserved keyword.
    Word,
    Eof,
    Invalid,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Module | TokenKind::Require | TokenKind::Exclude | TokenKind::Replace
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn display_name(&self) -> String {
        match self.kind {
            TokenKind::Module | TokenKind::Require | TokenKind::Exclude | TokenKind::Replace => {
                format!("keyword '{}'", self.value)
            }
            TokenKind::String => format!("string {}", self.value),
            TokenKind::Version => format!("version '{}'", self.value),
            TokenKind::MapArrow => "'=>'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Word => format!("'{}'", self.value),
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Invalid => format!("invalid token '{}'", self.value),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "{}", self.value),
        }
    }
}

/// Pull-based scanner over a manifest.
///
/// Tokens are produced one at a time by [`Lexer::next_token`]. Once the
/// input is exhausted every further call yields [`TokenKind::Eof`]. If the
/// input does not end with a line terminator, a synthetic empty
/// [`TokenKind::Newline`] is emitted before end-of-input so that the last
/// declaration is still terminated.
pub struct Lexer<'a> {
    input: &'a str,
    line: usize,
    col: usize,
    offset: usize,
    last: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            line: 1,
            col: 1,
            offset: 0,
            last: None,
        }
    }

    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        self.last = Some(token.kind);
        token
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch != '\n' && ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    self.eat_while(|ch| ch != '\n');
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self) -> Token {
        self.skip_trivia();

        let (line, col, start) = (self.line, self.col, self.offset);
        let Some(ch) = self.peek() else {
            return self.end_of_input();
        };

        let kind = match ch {
            '\n' => {
                self.bump();
                TokenKind::Newline
            }
            '(' => {
                self.bump();
                TokenKind::LeftParen
            }
            ')' => {
                self.bump();
                TokenKind::RightParen
            }
            '=' if self.peek_second() == Some('>') => {
                self.bump();
                self.bump();
                TokenKind::MapArrow
            }
            '"' | '`' => self.scan_string(ch),
            'v' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.eat_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '+'));
                TokenKind::Version
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                self.eat_while(|ch| ch.is_alphanumeric() || ch == '_');
                KEYWORDS
                    .get(&self.input[start..self.offset])
                    .copied()
                    .unwrap_or(TokenKind::Word)
            }
            _ => {
                self.bump();
                self.eat_while(|ch| !ch.is_whitespace() && !matches!(ch, '(' | ')' | '"' | '`'));
                TokenKind::Invalid
            }
        };

        Token {
            kind,
            value: self.input[start..self.offset].to_string(),
            span: Span::new(line, col, start, self.offset),
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return TokenKind::Invalid,
                Some(ch) if ch == quote => {
                    self.bump();
                    return TokenKind::String;
                }
                Some('\\') if quote == '"' => {
                    self.bump();
                    if self.peek().is_some_and(|ch| ch != '\n') {
                        self.bump();
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn end_of_input(&self) -> Token {
        let span = Span::new(self.line, self.col, self.offset, self.offset);
        let kind = match self.last {
            None | Some(TokenKind::Newline) | Some(TokenKind::Eof) => TokenKind::Eof,
            Some(_) => TokenKind::Newline,
        };
        Token {
            kind,
            value: String::new(),
            span,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including a single end-of-input token.
    fn next(&mut self) -> Option<Token> {
        if self.last == Some(TokenKind::Eof) {
            return None;
        }
        Some(self.next_token())
    }
}

/// Scans the whole input, including the trailing end-of-input token.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_keywords() {
        let tokens = tokenize("module require exclude replace\n");

        assert_eq!(tokens[0].kind, TokenKind::Module);
        assert_eq!(tokens[1].kind, TokenKind::Require);
        assert_eq!(tokens[2].kind, TokenKind::Exclude);
        assert_eq!(tokens[3].kind, TokenKind::Replace);
        assert_eq!(tokens[4].kind, TokenKind::Newline);
        assert_eq!(tokens[5].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keyword_prefix_is_word() {
        let tokens = tokenize("requires modules");

        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].value, "requires");
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].value, "modules");
    }

    #[test]
    fn test_tokenize_string_keeps_quotes() {
        let tokens = tokenize(r#""example.com/dep" `raw/path`"#);

        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, "\"example.com/dep\"");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].value, "`raw/path`");
    }

    #[test]
    fn test_tokenize_string_escaped_quote() {
        let tokens = tokenize(r#""a\"b" x"#);

        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, r#""a\"b""#);
        assert_eq!(tokens[1].kind, TokenKind::Word);
    }

    #[test]
    fn test_unterminated_string_is_invalid() {
        let tokens = tokenize("\"open\nmodule");

        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].value, "\"open");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::Module);
    }

    #[test]
    fn test_tokenize_versions() {
        let tokens = tokenize("v1.2.3 v0.0.0-20180101-abcdef v2.0.0+incompatible v1.2.4-patched");

        for (token, expected) in tokens.iter().zip([
            "v1.2.3",
            "v0.0.0-20180101-abcdef",
            "v2.0.0+incompatible",
            "v1.2.4-patched",
        ]) {
            assert_eq!(token.kind, TokenKind::Version);
            assert_eq!(token.value, expected);
        }
    }

    #[test]
    fn test_v_without_digit_is_word() {
        let tokens = tokenize("v vendor");

        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[1].kind, TokenKind::Word);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) =>"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::MapArrow,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_equals_is_invalid() {
        let tokens = tokenize("= >");

        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].value, "=");
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[1].value, ">");
    }

    #[test]
    fn test_invalid_run() {
        let tokens = tokenize("@foo(\n");

        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].value, "@foo");
        assert_eq!(tokens[1].kind, TokenKind::LeftParen);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("// header\nmodule \"m\" // trailing\n"),
            vec![
                TokenKind::Newline,
                TokenKind::Module,
                TokenKind::String,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            kinds("module \"m\"\r\n"),
            vec![TokenKind::Module, TokenKind::String, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_synthetic_newline_before_eof() {
        let tokens = tokenize("module \"m\"");

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].kind, TokenKind::Newline);
        assert_eq!(tokens[2].value, "");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   // only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("module");

        assert_eq!(lexer.next_token().kind, TokenKind::Module);
        assert_eq!(lexer.next_token().kind, TokenKind::Newline);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let mut lexer = Lexer::new("\n");

        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Newline));
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("module \"m\"\nrequire \"p\" v1.0.0\n");

        assert_eq!((tokens[0].span.line, tokens[0].span.col), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.col), (1, 8));
        assert_eq!((tokens[3].span.line, tokens[3].span.col), (2, 1));
        assert_eq!((tokens[5].span.line, tokens[5].span.col), (2, 13));
        assert_eq!(tokens[5].span.start, 23);
        assert_eq!(tokens[5].span.end, 29);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::Replace.is_keyword());
        assert!(!TokenKind::Word.is_keyword());
    }
}
