use modfile_syntax::lexer::{Lexer, Token, TokenKind, tokenize};

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_full_manifest_stream() {
    let source = r#"module "example.com/widget"

require "example.com/dep" v1.2.3
require (
    "example.com/dep2" v0.1.0
)
replace "example.com/dep" v1.2.3 => "example.com/fork" v1.2.4-patched
"#;
    let tokens = tokenize(source);

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Module,
            TokenKind::String,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Require,
            TokenKind::String,
            TokenKind::Version,
            TokenKind::Newline,
            TokenKind::Require,
            TokenKind::LeftParen,
            TokenKind::Newline,
            TokenKind::String,
            TokenKind::Version,
            TokenKind::Newline,
            TokenKind::RightParen,
            TokenKind::Newline,
            TokenKind::Replace,
            TokenKind::String,
            TokenKind::Version,
            TokenKind::MapArrow,
            TokenKind::String,
            TokenKind::Version,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_exactly_one_eof() {
    let tokens = tokenize("module \"m\"\nrequire \"p\" v1\n");
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();

    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn test_raw_values() {
    let tokens = tokenize(r#"require "example.com/dep" v1.2.3-rc.1"#);

    assert_eq!(tokens[0].value, "require");
    assert_eq!(tokens[1].value, "\"example.com/dep\"");
    assert_eq!(tokens[2].value, "v1.2.3-rc.1");
}

#[test]
fn test_display_names() {
    let tokens = tokenize("module \"m\" v1 bogus @ =>");
    let names: Vec<_> = tokens.iter().map(|t| t.display_name()).collect();

    assert_eq!(names[0], "keyword 'module'");
    assert_eq!(names[1], "string \"m\"");
    assert_eq!(names[2], "version 'v1'");
    assert_eq!(names[3], "'bogus'");
    assert_eq!(names[4], "invalid token '@'");
    assert_eq!(names[5], "'=>'");
    assert_eq!(names[6], "newline");
    assert_eq!(names[7], "end of input");
}

#[test]
fn test_pull_based_scanning() {
    let mut lexer = Lexer::new("module \"m\"\n\nrequire \"p\" v1\n");

    assert_eq!(lexer.next_token().kind, TokenKind::Module);
    assert_eq!(lexer.next_token().kind, TokenKind::String);
    assert_eq!(lexer.next_token().kind, TokenKind::Newline);

    let blank = lexer.next_token();
    assert_eq!(blank.kind, TokenKind::Newline);
    assert_eq!(blank.span.line, 2);

    let verb = lexer.next_token();
    assert_eq!(verb.kind, TokenKind::Require);
    assert_eq!((verb.span.line, verb.span.col), (3, 1));
}

#[test]
fn test_unicode_columns() {
    let tokens = tokenize("module \"é\" v1");

    assert_eq!(tokens[2].span.col, 12);
    assert_eq!(tokens[2].span.start, 12);
}

#[test]
fn test_comment_only_lines_keep_newlines() {
    let tokens = tokenize("module \"m\"\n// require \"p\" v1\n");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Module,
            TokenKind::String,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}
