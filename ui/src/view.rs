//! Text rendering of the client state.

use std::fmt::{self, Write};

use phonebook::client::state::ClientState;

pub fn render(state: &ClientState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, state);
    out
}

fn write_view(out: &mut String, state: &ClientState) -> fmt::Result {
    writeln!(out, "Phonebook")?;
    if let Some(info) = state.info() {
        writeln!(out, "[info] {info}")?;
    }
    if let Some(error) = state.error() {
        writeln!(out, "[error] {error}")?;
    }

    writeln!(out, "filter shown with: {}", state.filter())?;

    writeln!(out, "add a new")?;
    writeln!(out, "  name: {}", state.new_name())?;
    writeln!(out, "  number: {}", state.new_number())?;

    writeln!(out, "Numbers")?;
    let visible = state.visible();
    if visible.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (index, person) in visible.iter().enumerate() {
        writeln!(out, "  {}. {} {}", index + 1, person.name, person.number)?;
    }
    Ok(())
}
