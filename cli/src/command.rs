//! Line commands typed at the prompt.

use anyhow::{anyhow, bail, Context};

use globex_common::Currency;
use globex_coordinator::Edit;

/// A parsed prompt command. Slot numbers are 0-based here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Amount(String),
    Base(Currency),
    Quote { index: usize, code: Currency },
    Add,
    Remove(usize),
    Swap,
    Show,
    Currencies,
    Help,
    Quit,
}

impl Command {
    /// Edit sent to the coordinator, if the command changes state.
    pub fn into_edit(self) -> Option<Edit> {
        match self {
            Command::Amount(text) => Some(Edit::SetAmount(text)),
            Command::Base(code) => Some(Edit::SetBaseCurrency(code)),
            Command::Quote { index, code } => Some(Edit::SetQuoteCurrency { index, code }),
            Command::Add => Some(Edit::AddQuoteCurrency),
            Command::Remove(index) => Some(Edit::RemoveQuoteCurrency(index)),
            Command::Swap => Some(Edit::SwapBaseWithPrimaryQuote),
            Command::Show | Command::Currencies | Command::Help | Command::Quit => None,
        }
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        // `amount` alone clears the field.
        "amount" | "a" => Command::Amount(args.concat()),
        "base" | "b" => Command::Base(currency(&args, 0)?),
        "quote" | "q" => Command::Quote {
            index: slot(&args, 0)?,
            code: currency(&args, 1)?,
        },
        "add" => Command::Add,
        "remove" | "rm" => Command::Remove(slot(&args, 0)?),
        "swap" => Command::Swap,
        "show" => Command::Show,
        "currencies" | "list" => Command::Currencies,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: {other}. Type 'help' for a list of commands."),
    };

    Ok(Some(command))
}

fn currency(args: &[&str], position: usize) -> anyhow::Result<Currency> {
    args.get(position)
        .map(|code| Currency::new(*code))
        .ok_or_else(|| anyhow!("Missing currency code"))
}

// Users count slots from 1.
fn slot(args: &[&str], position: usize) -> anyhow::Result<usize> {
    let raw = args
        .get(position)
        .ok_or_else(|| anyhow!("Missing quote slot number"))?;
    let number: usize = raw
        .parse()
        .with_context(|| format!("Invalid quote slot number: {raw}"))?;
    if number == 0 {
        bail!("Quote slots are numbered from 1");
    }
    Ok(number - 1)
}
