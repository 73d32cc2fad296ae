use std::io::{self, BufRead, IsTerminal};

use anyhow::{Context, Result};
use colored::*;
use rustyline::{error::ReadlineError, DefaultEditor};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// One line read from the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// New value of the search field. May be empty or all whitespace.
    Value(String),
    Help,
    Exit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('!') {
            return Input::Value(line.to_string());
        }

        match trimmed.split_whitespace().next().unwrap_or_default() {
            "!help" | "!h" => Input::Help,
            "!exit" | "!quit" | "!q" => Input::Exit,
            other => Input::Unknown(other.to_string()),
        }
    }
}

/// Read lines on a blocking thread and forward every field value to `values`.
///
/// The sender is dropped when input ends (EOF, Ctrl+C, `!exit`), which lets the rest of
/// the pipeline drain and stop.
pub fn spawn_reader(values: mpsc::Sender<String>) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        if io::stdin().is_terminal() {
            read_interactive(&values)
        } else {
            read_piped(&values)
        }
    })
}

fn read_interactive(values: &mpsc::Sender<String>) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to create line editor")?;
    print_welcome();

    let prompt = format!("{} ", "flagly>".green().bold());
    loop {
        let line = match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                line
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                return Ok(());
            }
            Err(e) => anyhow::bail!("Failed to read input: {}", e),
        };

        if !dispatch(Input::parse(&line), values) {
            return Ok(());
        }
    }
}

fn read_piped(values: &mpsc::Sender<String>) -> Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;
        if !dispatch(Input::parse(&line), values) {
            break;
        }
    }
    debug!("input closed");
    Ok(())
}

/// Returns `false` once reading should stop.
fn dispatch(input: Input, values: &mpsc::Sender<String>) -> bool {
    match input {
        Input::Value(value) => values.blocking_send(value).is_ok(),
        Input::Help => {
            print_help();
            true
        }
        Input::Exit => {
            println!("{}", "Goodbye!".green());
            false
        }
        Input::Unknown(command) => {
            eprintln!("{}: Unknown command: {}", "Error".red().bold(), command);
            true
        }
    }
}

fn print_welcome() {
    println!("{}", "Welcome to flagly!".green().bold());
    println!(
        "Type a country name and press {}; an empty line clears the results.",
        "Enter".yellow()
    );
    println!("Type {} for help, {} to exit.", "!help".cyan(), "!exit".cyan());
    println!();
}

fn print_help() {
    println!("{}", "flagly Help".green().bold());
    println!();
    println!("{}", "Search:".cyan().bold());
    println!("  {}      - One match shows the country card", "poland".yellow());
    println!("  {}      - 2 to 10 matches show a list", "united".yellow());
    println!("  {}           - More than 10 matches asks for a longer name", "a".yellow());
    println!("  {}   - An empty line clears the results", "(empty)".yellow());
    println!();
    println!("{}", "Commands:".cyan().bold());
    println!("  {}           - Show this help", "!help".yellow());
    println!("  {}           - Exit flagly", "!exit".yellow());
    println!();
}
