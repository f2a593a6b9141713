// src/cli/shell.rs
use crate::cli::args::ShellLine;
use crate::cli::commands::{self, CommandContext};
use crate::cli::error::{CliError, CliResult};
use clap::Parser;
use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};
use std::path::PathBuf;
use termcolor::WriteColor;
use tracing::{debug, instrument};

/// Reads commands line by line until `exit`, `quit`, Ctrl-D or Ctrl-C.
///
/// A failing command prints its error and the shell keeps going; the session
/// (and its save queue) lives for the whole shell.
#[instrument(skip_all)]
pub fn run_shell<W: WriteColor>(ctx: &mut CommandContext<'_, W>) -> CliResult<()> {
    let mut rl = create_editor()?;
    let history_file = history_file_path();
    if let Err(e) = rl.load_history(&history_file) {
        debug!("No existing history file or failed to load: {}", e);
    }

    commands::run(ctx, crate::cli::args::Commands::Show { is_json: false })?;

    loop {
        match rl.readline("navigator> ") {
            Ok(line) => {
                let tokens = match split_line(&line) {
                    Ok(tokens) => tokens,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };
                match tokens.first().map(String::as_str) {
                    None => continue,
                    Some("exit") | Some("quit") => break,
                    _ => {}
                }
                match ShellLine::try_parse_from(tokens) {
                    Ok(parsed) => {
                        if let Err(e) = commands::run(ctx, parsed.command) {
                            eprintln!("Error: {}", e);
                        }
                    }
                    Err(e) => {
                        let _ = e.print();
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(CliError::Other(format!("Readline error: {}", e))),
        }
    }

    if let Err(e) = rl.save_history(&history_file) {
        debug!("Failed to save history: {}", e);
    }
    Ok(())
}

fn create_editor() -> CliResult<Editor<(), FileHistory>> {
    let mut rl = Editor::new()
        .map_err(|e| CliError::Other(format!("Failed to create readline editor: {}", e)))?;
    rl.set_auto_add_history(true);
    rl.set_history_ignore_space(true);
    let _ = rl.set_history_ignore_dups(true);
    Ok(rl)
}

fn history_file_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => {
            let dir = config_dir.join("navigator");
            std::fs::create_dir_all(&dir).ok();
            dir.join("shell_history.txt")
        }
        None => std::env::temp_dir().join("navigator_shell_history.txt"),
    }
}

/// Splits a shell line into words; single or double quotes group words
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("show", vec!["show"])]
    #[case("  add-category   Reading  ", vec!["add-category", "Reading"])]
    #[case(r#"add-bookmark 1 "Rust Book" https://doc.rust-lang.org/book"#, vec!["add-bookmark", "1", "Rust Book", "https://doc.rust-lang.org/book"])]
    #[case("rename-category 2 'Dev \"Tools\"'", vec!["rename-category", "2", "Dev \"Tools\""])]
    #[case(r#"rename-category 2 """#, vec!["rename-category", "2", ""])]
    #[case("", vec![])]
    fn given_line_when_split_then_words(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_line(line).unwrap(), expected);
    }

    #[test]
    fn given_unterminated_quote_when_split_then_error() {
        assert!(split_line("add-category \"oops").is_err());
    }
}
