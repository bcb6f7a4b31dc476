use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nibpad_loader::{Charset, LoadMessage, LoadOptions, LoadResult, LoadWorker};
use nibpad_search::{SearchFlags, Searcher};
use nibpad_text::{match_brackets, Document};
use serde::Serialize;

mod config;

#[derive(Parser, Debug)]
#[command(name = "nibpad")]
#[command(version, about = "Text model services for plain-text editors", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print load metadata (charset, flags) for a file
    Info {
        file: PathBuf,
        /// Charset override: UTF-8, UTF-16, UTF-32, ISO-8859-1, Hex
        #[arg(short, long)]
        encoding: Option<String>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a file and write the text to stdout
    Cat {
        file: PathBuf,
        #[arg(short, long)]
        encoding: Option<String>,
    },
    /// Render a file as a canonical hex dump
    Hexdump { file: PathBuf },
    /// List pattern matches with line and column positions
    Search {
        file: PathBuf,
        pattern: String,
        /// Treat the pattern as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long)]
        whole_word: bool,
        #[arg(short, long)]
        encoding: Option<String>,
        /// Emit matches as JSON, one object per line
        #[arg(long)]
        json: bool,
    },
    /// Show the delimiter match for a cursor offset
    Brackets {
        file: PathBuf,
        cursor: usize,
        #[arg(short, long)]
        encoding: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config_path = config::default_config_path();
    let config = config::AppConfig::load_or_default(&config_path);
    tracing::debug!("config read from {}", config_path.display());

    match args.command {
        Command::Info {
            file,
            encoding,
            json,
        } => info(&file, parse_charset(encoding.as_deref())?, json, &config),
        Command::Cat { file, encoding } => {
            let result = load_file(&file, parse_charset(encoding.as_deref())?, &config)?;
            print!("{}", result.text);
            Ok(())
        }
        Command::Hexdump { file } => {
            let result = load_file(&file, Some(Charset::Hex), &config)?;
            print!("{}", result.text);
            Ok(())
        }
        Command::Search {
            file,
            pattern,
            regex,
            case_sensitive,
            whole_word,
            encoding,
            json,
        } => {
            let flags = SearchFlags {
                case_sensitive: case_sensitive || config.search.case_sensitive,
                whole_word: whole_word || config.search.whole_word,
            };
            let use_regex = regex || config.search.regex;
            search(
                &file,
                &pattern,
                flags,
                use_regex,
                parse_charset(encoding.as_deref())?,
                json,
                &config,
            )
        }
        Command::Brackets {
            file,
            cursor,
            encoding,
        } => brackets(&file, cursor, parse_charset(encoding.as_deref())?, &config),
    }
}

fn parse_charset(value: Option<&str>) -> anyhow::Result<Option<Charset>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value
        .parse::<Charset>()
        .map(Some)
        .map_err(|()| anyhow::anyhow!("unknown charset '{value}'"))
}

/// Loads through the worker thread, then turns the sentinel result shapes
/// into user-facing errors.
fn load_file(
    path: &Path,
    encoding: Option<Charset>,
    config: &config::AppConfig,
) -> anyhow::Result<LoadResult> {
    let options = LoadOptions {
        charset: encoding.or(config.file.encoding),
        skip_non_text: config.file.skip_non_text,
    };
    let (tx, rx) = mpsc::channel();
    let worker = LoadWorker::spawn(path.to_path_buf(), options, tx);
    let LoadMessage::Loaded(result) = rx.recv().context("load worker hung up")?;
    worker.join();

    if result.is_missing() {
        anyhow::bail!("{}: no such file", path.display());
    }
    if result.is_rejected() {
        anyhow::bail!("{}: exceeds the size ceiling", path.display());
    }
    Ok(result)
}

#[derive(Serialize)]
struct InfoReport<'a> {
    file: &'a str,
    charset: Option<&'static str>,
    enforced_encoding: bool,
    force_uneditable: bool,
    truncated: bool,
    lines: usize,
    chars: usize,
}

fn info(
    path: &Path,
    encoding: Option<Charset>,
    json: bool,
    config: &config::AppConfig,
) -> anyhow::Result<()> {
    let result = load_file(path, encoding, config)?;
    let report = InfoReport {
        file: &result.file_name,
        charset: result.charset.map(Charset::label),
        enforced_encoding: result.enforced_encoding,
        force_uneditable: result.force_uneditable,
        truncated: result.truncated,
        lines: result.text.lines().count(),
        chars: result.text.chars().count(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("file:      {}", report.file);
    println!("charset:   {}", report.charset.unwrap_or("-"));
    println!("enforced:  {}", report.enforced_encoding);
    println!("read-only: {}", report.force_uneditable);
    println!("truncated: {}", report.truncated);
    println!("lines:     {}", report.lines);
    println!("chars:     {}", report.chars);
    Ok(())
}

#[derive(Serialize)]
struct MatchReport {
    line: usize,
    column: usize,
    start: usize,
    end: usize,
    preview: String,
}

fn search(
    path: &Path,
    pattern: &str,
    flags: SearchFlags,
    use_regex: bool,
    encoding: Option<Charset>,
    json: bool,
    config: &config::AppConfig,
) -> anyhow::Result<()> {
    let result = load_file(path, encoding, config)?;
    let doc = Document::from_text(&result.text);
    let searcher = Searcher::new(pattern, flags, use_regex);
    if use_regex && searcher.is_inert() {
        anyhow::bail!("invalid pattern '{pattern}'");
    }

    let rope = doc.rope();
    let matches = searcher.highlight_visible(rope, 0..rope.len_chars());
    for found in &matches {
        let line = rope.char_to_line(found.start);
        let column = found.start - rope.line_to_char(line);
        let preview: String = rope
            .line(line)
            .chars()
            .take(200)
            .filter(|ch| *ch != '\n' && *ch != '\r')
            .collect();
        if json {
            let report = MatchReport {
                line: line + 1,
                column: column + 1,
                start: found.start,
                end: found.end,
                preview,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}:{}: {preview}", line + 1, column + 1);
        }
    }
    if !json && matches.is_empty() {
        println!("no matches");
    }
    Ok(())
}

fn brackets(
    path: &Path,
    cursor: usize,
    encoding: Option<Charset>,
    config: &config::AppConfig,
) -> anyhow::Result<()> {
    let result = load_file(path, encoding, config)?;
    let doc = Document::from_text(&result.text);
    if cursor > doc.len_chars() {
        anyhow::bail!(
            "cursor {cursor} is past the end of the document ({})",
            doc.len_chars()
        );
    }

    let highlights = match_brackets(&doc, cursor);
    if highlights.is_empty() {
        println!("no match");
        return Ok(());
    }
    for pos in highlights {
        let line = doc.rope().char_to_line(pos);
        let column = pos - doc.rope().line_to_char(line);
        let ch = doc.char_at(pos).unwrap_or(' ');
        println!("{}:{}: {ch} at offset {pos}", line + 1, column + 1);
    }
    Ok(())
}
