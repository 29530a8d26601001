use thiserror::Error;

use crate::validation::Field;

pub const HELP: &str = "\
commands:
  name <value>     set the name field
  phone <value>    set the phone field
  email <value>    set the email field
  add              submit the form
  delete <n>       delete the n-th contact on this page
  yes | no         answer a delete confirmation
  next | prev      change page
  refresh          reload the current page
  help             show this text
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(Field, String),
    Add,
    Delete(usize),
    Yes,
    No,
    Next,
    Prev,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?}, type `help`")]
    Unknown(String),

    #[error("`delete` needs a list number, got {0:?}")]
    BadIndex(String),
}

pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim_start()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "name" => Command::Edit(Field::Name, rest.to_string()),
        "phone" => Command::Edit(Field::Phone, rest.to_string()),
        "email" => Command::Edit(Field::Email, rest.to_string()),
        "add" | "submit" => Command::Add,
        "delete" | "del" | "rm" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Delete(n),
            _ => return Err(InputError::BadIndex(rest.to_string())),
        },
        "yes" | "y" => Command::Yes,
        "no" | "n" => Command::No,
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "refresh" | "r" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(InputError::Unknown(word.to_string())),
    };
    Ok(Some(cmd))
}
