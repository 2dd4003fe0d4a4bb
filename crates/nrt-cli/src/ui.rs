//! UI utilities for the CLI

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use nrt_core::{QueryResult, Result};

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    render_banner(terminal_width);
}

/// Inner padding for a framed line: banner width minus the frame chars
/// ("│  " and "│") and the content itself. Saturates so narrow terminals
/// just collapse the padding instead of underflowing.
fn pad(banner_width: usize, content_len: usize) -> String {
    " ".repeat(banner_width.saturating_sub(content_len + 4))
}

fn render_banner(terminal_width: usize) {
    let banner_width = std::cmp::min(62, terminal_width.saturating_sub(4));

    let top_border = format!("┌{}┐", "─".repeat(banner_width.saturating_sub(2)));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width.saturating_sub(2)));
    let empty_line = format!("│{}│", " ".repeat(banner_width.saturating_sub(2)));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "NRT - News Research Tool";
    let title_line = format!(
        "│  {}{}│",
        title.blue().bold(),
        pad(banner_width, title.len())
    );
    println!("{}", title_line);

    println!("{}", empty_line.blue());

    let feature_lines = vec![
        "🧠 Ask questions about a handful of news articles",
        "",
        "How it works:",
        "• 📰 add up to 3 article URLs, then 'process'",
        "• ❓ type any question to get an answer",
        "• 🔗 every answer cites its source URLs",
        "",
        "v0.1.0 • Powered by OpenAI",
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let content = if line.starts_with("v0.1.0") {
                format!("│  {}{}│", line.dimmed(), pad(banner_width, line.len()))
            } else {
                format!("│  {}{}│", line, pad(banner_width, line.len()))
            };
            println!("{}", content.blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: 'add <url>' to collect articles, 'help' for all commands".dimmed()
    );
    println!();
}

/// Editable input line for the raw-mode prompt. The cursor is a byte
/// offset into `text` and always sits on a char boundary, so multibyte
/// input edits cleanly.
struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char before the cursor. Returns false on an empty line.
    fn backspace(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(prev) => {
                self.cursor -= prev.len_utf8();
                self.text.remove(self.cursor);
                true
            }
            None => false,
        }
    }

    /// Replace the whole line, cursor at the end. Used by history recall.
    fn replace_with(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.text.len();
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Read one line of input with command history navigation
pub async fn prompt_input(history: &mut Vec<String>) -> Result<String> {
    // Piped input bypasses the raw-mode editor.
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let mut line = LineBuffer::new();
    let mut history_index: Option<usize> = None;

    print!("{} ", "nrt>".green().bold());
    io::stdout().flush()?;

    loop {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Enter => {
                    disable_raw_mode()?;
                    println!();
                    let input = line.take();
                    if !input.is_empty() {
                        history.push(input.clone());
                    }
                    return Ok(input);
                }
                KeyCode::Char(c) => {
                    line.insert(c);
                    print!("\r{} {}", "nrt>".green().bold(), line.text);
                    io::stdout().flush()?;
                }
                KeyCode::Backspace => {
                    if line.backspace() {
                        print!(
                            "\r{} {}  \r{} {}",
                            "nrt>".green().bold(),
                            line.text,
                            "nrt>".green().bold(),
                            line.text
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Up => {
                    if !history.is_empty() {
                        let new_index = match history_index {
                            None => history.len() - 1,
                            Some(idx) if idx > 0 => idx - 1,
                            Some(idx) => idx,
                        };
                        history_index = Some(new_index);
                        line.replace_with(&history[new_index]);
                        print!(
                            "\r{} {}  \r{} {}",
                            "nrt>".green().bold(),
                            " ".repeat(50),
                            "nrt>".green().bold(),
                            line.text
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Down => {
                    if let Some(idx) = history_index {
                        if idx < history.len() - 1 {
                            let new_index = idx + 1;
                            history_index = Some(new_index);
                            line.replace_with(&history[new_index]);
                        } else {
                            history_index = None;
                            line.replace_with("");
                        }
                        print!(
                            "\r{} {}  \r{} {}",
                            "nrt>".green().bold(),
                            " ".repeat(50),
                            "nrt>".green().bold(),
                            line.text
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Esc => {
                    disable_raw_mode()?;
                    println!();
                    return Ok(String::new());
                }
                _ => {}
            }
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Add an article URL (up to 3)", "add <url>".green());
    println!("  {} - List the collected URLs", "urls".green());
    println!("  {} - Drop the collected URLs", "clear".green());
    println!(
        "  {} - Fetch, index, and persist the collected articles",
        "process".green()
    );
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Anything else is treated as a question, e.g.:".bold());
    println!("  What did the article say about interest rates?");
    println!("  Who announced the merger?");
}

/// Render a generated answer with its source list
pub fn render_answer(result: &QueryResult) {
    println!();
    println!("{}", "📝 Answer".bold());
    println!("{}", result.answer);

    if !result.sources.is_empty() {
        println!();
        println!("{}", "🔗 Sources".bold());
        for source in &result.sources {
            println!("  {} {}", "•".cyan(), source);
        }
    }
    println!();
}

/// Render an operation failure as a single human-readable line
pub fn render_error(error: &nrt_core::Error) {
    if error.is_user_correctable() {
        println!("{} {}", "ℹ️".yellow(), error);
    } else {
        println!("{} {}", "❌".red(), error);
    }
}
