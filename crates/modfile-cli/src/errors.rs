use colored::*;
use modfile::{ErrorKind, ParseError, Span};
use std::fmt;

/// Parse error with source context and suggestions
pub struct EnhancedError {
    pub message: String,
    pub span: Option<Span>,
    pub file: Option<String>,
    pub source: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl EnhancedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            file: None,
            source: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message.bold());

        if let (Some(file), Some(span)) = (&self.file, &self.span) {
            eprintln!("  {} {}:{}:{}", "-->".blue().bold(), file, span.line, span.col);
        } else if let Some(file) = &self.file {
            eprintln!("  {} {}", "-->".blue().bold(), file);
        }

        if let (Some(source), Some(span)) = (&self.source, &self.span) {
            eprintln!();
            self.display_source_with_span(source, span);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!();
            eprintln!("{} {}", "suggestion:".green().bold(), suggestion);
        }

        if let Some(help) = &self.help {
            eprintln!();
            eprintln!("{} {}", "help:".cyan().bold(), help);
        }
    }

    fn display_source_with_span(&self, source: &str, span: &Span) {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return;
        }

        // End-of-input errors may point one line past the last one.
        let line_idx = span.line.saturating_sub(1).min(lines.len() - 1);
        let error_line = line_idx + 1;

        let max_line = (error_line + 2).min(lines.len());
        let line_num_width = max_line.to_string().len();

        let start = line_idx.saturating_sub(2);
        let end = (line_idx + 3).min(lines.len());

        for (i, line) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;

            if line_num == error_line {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().blue().bold(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                );

                let col = if error_line == span.line {
                    span.col
                } else {
                    line.chars().count() + 1
                };
                let spaces = " ".repeat(col.saturating_sub(1));
                let caret_len = source
                    .get(span.start..span.end)
                    .map(|text| text.trim_end_matches('\n').chars().count())
                    .unwrap_or(0)
                    .max(1);
                eprintln!(
                    "{:>width$} {} {}{}",
                    "",
                    "|".blue().bold(),
                    spaces,
                    "^".repeat(caret_len).red().bold(),
                    width = line_num_width
                );
            } else {
                eprintln!(
                    "{:>width$} {} {}",
                    line_num.to_string().dimmed(),
                    "|".blue().bold(),
                    line,
                    width = line_num_width
                );
            }
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnhancedError: {}", self.message)
    }
}

impl std::error::Error for EnhancedError {}

/// Wrap a [`ParseError`] with its source and a hint for the failed production.
pub fn enhance_parse_error(err: &ParseError, file: String, source: String) -> EnhancedError {
    let mut enhanced = EnhancedError::new(format!("Parse error: {}", err))
        .with_span(err.span())
        .with_file(file)
        .with_source(source);

    let expected = err.expected_what();
    if err.kind() == ErrorKind::Lexical {
        enhanced = enhanced
            .with_suggestion("Check for unterminated strings or stray characters")
            .with_help("Paths are quoted (\"example.com/dep\") and versions start with 'v' (v1.2.3)");
    } else if expected == "module declaration" {
        enhanced = enhanced
            .with_suggestion("Start the file with: module \"<module path>\"")
            .with_help("Only blank lines and comments may precede the module declaration");
    } else if expected == "verb declaration" {
        enhanced = enhanced
            .with_suggestion("Declarations start with 'require', 'exclude' or 'replace'");
    } else if expected == "newline" {
        enhanced = enhanced
            .with_suggestion("Each declaration must end at the end of its line");
    } else if expected == "'=>'" {
        enhanced = enhanced
            .with_suggestion("Replacements take the form: \"old/path\" v1.0.0 => \"new/path\" v1.0.1");
    } else if expected == "package version" {
        enhanced = enhanced
            .with_suggestion("Follow every package path with a version such as v1.2.3");
    } else if expected.ends_with("')'") {
        enhanced = enhanced
            .with_suggestion("Close the block with ')' on its own line");
    }

    enhanced
}
