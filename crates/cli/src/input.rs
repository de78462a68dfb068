//! Parsing of console input lines.

use anyhow::{Result, bail};
use assistant_core::ActivityKind;

/// Upper bound for a single `/tick n`.
const MAX_TICKS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Free-text question for the assistant.
    Query(String),
    /// Simulated user activity in the host tool.
    Activity(ActivityKind, String),
    /// Advance time by this many ticks.
    Tick(u32),
    Cancel,
    Save,
    Stats,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Type a question to ask the assistant.

Activity:
  !tool <name>      used a tool
  !error <command>  a command failed
  !undo             undid an operation
  !search <term>    searched menus or help
  !docs <topic>     opened documentation

Commands:
  /tick [n]   advance n ticks (default 1)
  /cancel     drop the query in progress
  /save       save learning history
  /stats      show learning progress
  /help       show this help
  /quit       save and exit";

pub fn parse(line: &str) -> Result<Input> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }

    if let Some(rest) = line.strip_prefix('!') {
        let (name, subject) = split_word(rest);
        let kind = match name {
            "tool" => ActivityKind::ToolUsed,
            "error" => ActivityKind::CommandFailed,
            "undo" => ActivityKind::Undo,
            "search" => ActivityKind::Search,
            "docs" => ActivityKind::DocsOpened,
            other => bail!("unknown activity '!{other}' (try /help)"),
        };
        if subject.is_empty() && !matches!(kind, ActivityKind::Undo) {
            bail!("'!{name}' needs a subject");
        }
        return Ok(Input::Activity(kind, subject.to_string()));
    }

    if let Some(rest) = line.strip_prefix('/') {
        let (name, arg) = split_word(rest);
        return Ok(match name {
            "tick" => {
                let ticks = if arg.is_empty() {
                    1
                } else {
                    arg.parse::<u32>()
                        .map_err(|_| anyhow::anyhow!("'/tick' expects a number, got '{arg}'"))?
                };
                if ticks == 0 || ticks > MAX_TICKS {
                    bail!("'/tick' expects 1..={MAX_TICKS}");
                }
                Input::Tick(ticks)
            }
            "cancel" => Input::Cancel,
            "save" => Input::Save,
            "stats" => Input::Stats,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            other => bail!("unknown command '/{other}' (try /help)"),
        });
    }

    Ok(Input::Query(line.to_string()))
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_queries() {
        assert_eq!(
            parse("  how do I add a collider ").unwrap(),
            Input::Query("how do I add a collider".into())
        );
        assert_eq!(parse("   ").unwrap(), Input::Empty);
    }

    #[test]
    fn activity_lines() {
        assert_eq!(
            parse("!error bake lightmap").unwrap(),
            Input::Activity(ActivityKind::CommandFailed, "bake lightmap".into())
        );
        assert_eq!(
            parse("!undo").unwrap(),
            Input::Activity(ActivityKind::Undo, String::new())
        );
        assert!(parse("!tool").is_err());
        assert!(parse("!dance now").is_err());
    }

    #[test]
    fn commands() {
        assert_eq!(parse("/tick").unwrap(), Input::Tick(1));
        assert_eq!(parse("/tick 40").unwrap(), Input::Tick(40));
        assert!(parse("/tick zero").is_err());
        assert!(parse("/tick 0").is_err());
        assert_eq!(parse("/quit").unwrap(), Input::Quit);
        assert!(parse("/fly").is_err());
    }
}
