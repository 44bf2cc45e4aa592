//! Line-oriented front end: reads commands, forwards them to the controller and
//! re-renders the view after each one.

use std::io::{self, Write};

use phonebook::client::api::PersonsApi;
use phonebook::client::state::{Confirm, Controller};
use tokio::io::{AsyncBufRead, Lines};

use crate::view::render;

const HELP: &str = "\
commands:
  filter <text>          show names containing <text> (empty clears)
  name <text>            set the name input
  number <text>          set the number input
  add                    add the entry from the inputs
  add <name>, <number>   set both inputs and add
  delete <N>             delete the N-th entry shown
  reload                 fetch the list again
  help                   show this help
  quit                   leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Filter(String),
    Name(String),
    Number(String),
    Add(Option<(String, String)>),
    Delete(usize),
    Reload,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "filter" => Ok(Command::Filter(rest.to_string())),
        "name" => Ok(Command::Name(rest.to_string())),
        "number" => Ok(Command::Number(rest.to_string())),
        "add" if rest.is_empty() => Ok(Command::Add(None)),
        "add" => rest
            .rsplit_once(',')
            .map(|(name, number)| {
                Command::Add(Some((name.trim().to_string(), number.trim().to_string())))
            })
            .ok_or_else(|| "usage: add <name>, <number>".to_string()),
        "delete" => rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Command::Delete)
            .ok_or_else(|| "usage: delete <N>, where N is the entry's number".to_string()),
        "reload" => Ok(Command::Reload),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

/// Answers confirmations from the shell's own input.
struct LinePrompt<'a, R, W> {
    lines: &'a mut Lines<R>,
    out: &'a mut W,
}

impl<R, W> Confirm for LinePrompt<'_, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn confirm(&mut self, question: &str) -> bool {
        if write!(self.out, "{question} [y/N] ")
            .and_then(|_| self.out.flush())
            .is_err()
        {
            return false;
        }

        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

pub struct Shell<A, R, W> {
    controller: Controller<A>,
    lines: Lines<R>,
    out: W,
}

impl<A, R, W> Shell<A, R, W>
where
    A: PersonsApi,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(controller: Controller<A>, lines: Lines<R>, out: W) -> Self {
        Self {
            controller,
            lines,
            out,
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        self.controller.load().await;
        self.show()?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                break;
            };

            if !line.trim().is_empty() {
                match parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => self.execute(command).await?,
                    Err(usage) => writeln!(self.out, "{usage}")?,
                }
            }

            self.controller.tick();
            self.show()?;
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command) -> io::Result<()> {
        let mut prompt = LinePrompt {
            lines: &mut self.lines,
            out: &mut self.out,
        };

        match command {
            Command::Filter(text) => self.controller.set_filter(text),
            Command::Name(text) => self.controller.set_new_name(text),
            Command::Number(text) => self.controller.set_new_number(text),
            Command::Add(fields) => {
                if let Some((name, number)) = fields {
                    self.controller.set_new_name(name);
                    self.controller.set_new_number(number);
                }
                self.controller.submit(&mut prompt).await;
            }
            Command::Delete(n) => {
                let target = self
                    .controller
                    .state()
                    .visible()
                    .get(n - 1)
                    .map(|person| person.id);
                match target {
                    Some(id) => {
                        self.controller.delete(&id, &mut prompt).await;
                    }
                    None => writeln!(self.out, "no entry {n} in the list")?,
                }
            }
            Command::Reload => {
                self.controller.load().await;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {}
        }

        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        write!(self.out, "\n{}", render(self.controller.state()))?;
        self.out.flush()
    }
}
