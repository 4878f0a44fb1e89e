use clap::{Parser, Subcommand};
use tasklist_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    Add {
        text: Option<String>,
    },
    /// Edit a task's text
    ///
    /// In the interactive session NEW_TEXT may be omitted; the current text
    /// is shown and the next input line becomes the new text.
    ///
    /// Example: tasklist edit task-1 "Buy oat milk"
    Edit {
        id: String,
        new_text: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete task-1
    Delete {
        id: String,
    },
    /// Mark a task as completed
    ///
    /// Example: tasklist done task-1
    Done {
        id: String,
    },
    /// Remove every completed task
    ///
    /// Example: tasklist clear
    Clear,
    /// List all tasks
    ///
    /// Example: tasklist list
    List,
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::split_command_line;

    #[test]
    fn split_command_line_keeps_quoted_text_together() {
        let args = split_command_line("add \"Buy milk\"").unwrap();
        assert_eq!(args, vec!["add".to_string(), "Buy milk".to_string()]);
    }

    #[test]
    fn split_command_line_collapses_whitespace() {
        let args = split_command_line("  delete   task-1  ").unwrap();
        assert_eq!(args, vec!["delete".to_string(), "task-1".to_string()]);
    }

    #[test]
    fn split_command_line_handles_escaped_quotes() {
        let args = split_command_line("add \"say \\\"hi\\\"\"").unwrap();
        assert_eq!(args, vec!["add".to_string(), "say \"hi\"".to_string()]);
    }

    #[test]
    fn split_command_line_rejects_unterminated_quote() {
        let err = split_command_line("add \"Buy milk").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
