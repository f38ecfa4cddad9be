//! # modfile-cli
//!
//! Command-line interface for module manifest files.
//!
//! Reads a manifest from disk, runs it through the parser and prints the
//! resulting document, the token stream, or a diagnostic for the first error.

mod config;
mod errors;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use config::{Config, OutputFormat};
use errors::enhance_parse_error;
use modfile::{Diagnostic, Document, Lexer, ParseError, TokenKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "modfile")]
#[command(about = "Inspect and validate module manifest files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Parse a manifest and print the resulting document")]
    Parse {
        file: PathBuf,
        /// Output format (defaults to the config value)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    #[command(about = "Validate one or more manifests")]
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    #[command(about = "Print the token stream of a manifest")]
    Tokens { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("{} Failed to load config: {:#}", "⚠".yellow().bold(), e);
        Config::default()
    });

    let format = match &cli.command {
        Commands::Parse { format, .. } => *format,
        _ => None,
    };
    config.merge_cli_args(format, cli.no_color);
    if !config.colored {
        colored::control::set_override(false);
    }
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Parse { file, .. } => parse_file(&file, &config),
        Commands::Check { files } => check_files(&files, &config),
        Commands::Tokens { file } => print_tokens(&file),
    }
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read manifest from {:?}", path))
}

fn report_parse_error(err: &ParseError, path: &Path, source: &str, config: &Config) {
    if config.colored {
        enhance_parse_error(err, path.display().to_string(), source.to_string()).display();
    } else {
        eprint!("{}: {}", path.display(), Diagnostic::new(source, err));
    }
}

fn parse_file(path: &Path, config: &Config) -> Result<()> {
    let source = read_manifest(path)?;

    let document = match modfile::parse(&source) {
        Ok(document) => document,
        Err(err) => {
            report_parse_error(&err, path, &source, config);
            std::process::exit(1);
        }
    };

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
        OutputFormat::Text => print_document(&document),
    }
    Ok(())
}

fn print_document(document: &Document) {
    println!("{} {}", "module".cyan().bold(), document.name.bold());

    if !document.requires.is_empty() {
        println!("\n{}", "require".cyan().bold());
        for pkg in &document.requires {
            let mut line = format!("  {} {}", pkg.path, pkg.version.green());
            if let Some(to) = document.replacement(&pkg.path, &pkg.version) {
                line.push_str(&format!(" {} {} {}", "=>".yellow(), to.path, to.version.green()));
            }
            if document.is_excluded(&pkg.path, &pkg.version) {
                line.push_str(&format!(" {}", "(excluded)".red()));
            }
            println!("{}", line);
        }
    }

    if !document.excludes.is_empty() {
        println!("\n{}", "exclude".cyan().bold());
        for pkg in &document.excludes {
            println!("  {} {}", pkg.path, pkg.version.red());
        }
    }

    if !document.replaces.is_empty() {
        println!("\n{}", "replace".cyan().bold());
        for mapping in &document.replaces {
            println!(
                "  {} {} {} {} {}",
                mapping.from.path,
                mapping.from.version.green(),
                "=>".yellow(),
                mapping.to.path,
                mapping.to.version.green()
            );
        }
    }
}

fn check_files(files: &[PathBuf], config: &Config) -> Result<()> {
    let mut failed = 0;

    for path in files {
        let source = match read_manifest(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                failed += 1;
                continue;
            }
        };

        match modfile::parse(&source) {
            Ok(document) => println!(
                "{} {} {}",
                "ok".green().bold(),
                path.display(),
                format!(
                    "({}: {} require, {} exclude, {} replace)",
                    document.name,
                    document.requires.len(),
                    document.excludes.len(),
                    document.replaces.len()
                )
                .dimmed()
            ),
            Err(err) => {
                report_parse_error(&err, path, &source, config);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!(
            "\n{} {} of {} manifests failed",
            "x".red().bold(),
            failed,
            files.len()
        );
        std::process::exit(1);
    }
    Ok(())
}

fn print_tokens(path: &Path) -> Result<()> {
    let source = read_manifest(path)?;

    for token in Lexer::new(&source) {
        let kind = format!("{:<12}", format!("{:?}", token.kind));
        let kind = match token.kind {
            TokenKind::Invalid => kind.red().bold(),
            TokenKind::Newline | TokenKind::Eof => kind.dimmed(),
            _ if token.kind.is_keyword() => kind.cyan(),
            _ => kind.normal(),
        };
        println!(
            "{:>4}:{:<3} {} {}",
            token.span.line, token.span.col, kind, token
        );
    }
    Ok(())
}
