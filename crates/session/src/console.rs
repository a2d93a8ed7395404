//! Line commands for driving a session without an engine.

use std::time::Duration;

use thiserror::Error;

use crate::session::GameSession;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Collect a named field pickup.
    Pickup(String),
    /// Add `n` units of an item directly.
    Give(String, u32),
    Craft,
    Fire,
    Wait(Duration),
    Inventory,
    Recipes,
    Snapshot,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

pub const HELP_TEXT: &str = "commands: pickup <name> | give <item> [n] | craft | fire | wait <secs> | inventory | recipes | snapshot | help | quit";

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "pickup" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("pickup"));
                }
                Command::Pickup(rest.to_string())
            }
            "give" => parse_give(rest)?,
            "craft" | "c" => Command::Craft,
            "fire" => Command::Fire,
            "wait" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("wait"));
                }
                let secs: f64 = rest
                    .parse()
                    .map_err(|_| ParseError::InvalidNumber(rest.to_string()))?;
                let dt = Duration::try_from_secs_f64(secs)
                    .map_err(|_| ParseError::InvalidNumber(rest.to_string()))?;
                Command::Wait(dt)
            }
            "inventory" | "inv" => Command::Inventory,
            "recipes" => Command::Recipes,
            "snapshot" => Command::Snapshot,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// `give <item words...> [n]`: a trailing number is the amount.
fn parse_give(rest: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument("give"));
    }
    if let Some((item, last)) = rest.rsplit_once(char::is_whitespace) {
        if last.chars().all(|c| c.is_ascii_digit()) {
            let n = last
                .parse()
                .map_err(|_| ParseError::InvalidNumber(last.to_string()))?;
            return Ok(Command::Give(item.trim().to_string(), n));
        }
    }
    Ok(Command::Give(rest.to_string(), 1))
}

/// Result of running one command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Output {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Output {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

/// Run one command as one frame: the command, then `tick`, then any HUD
/// message raised during the frame.
pub fn execute(session: &mut GameSession, command: Command) -> Output {
    let mut dt = Duration::ZERO;
    let mut show_inventory = false;

    let mut output = match command {
        Command::Pickup(name) => match session.collect_pickup(&name) {
            Ok(_) => Output::default(),
            Err(err) => Output::line(err.to_string()),
        },
        Command::Give(item, n) => match session.receive_item(item, n) {
            Ok(_) => Output::default(),
            Err(err) => Output::line(err.to_string()),
        },
        // Craft outcomes reach the player through the HUD message.
        Command::Craft => {
            let _ = session.craft();
            Output::default()
        }
        Command::Fire => match session.fire() {
            Some(shot) => Output::line(format!("bang! ({})", shot.weapon)),
            None => Output::line("click."),
        },
        Command::Wait(wait) => {
            dt = wait;
            Output::default()
        }
        Command::Inventory => {
            show_inventory = true;
            Output::default()
        }
        Command::Recipes => Output::line(session.hud().recipe_text()),
        Command::Snapshot => {
            let snapshot = session.inventory().snapshot();
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => Output::line(json),
                Err(err) => Output::line(format!("snapshot failed: {err}")),
            }
        }
        Command::Help => Output::line(HELP_TEXT),
        Command::Quit => Output {
            lines: Vec::new(),
            quit: true,
        },
    };

    let shown_before = session.hud().messages_shown();
    session.tick(dt);

    if show_inventory {
        output.lines.push(session.hud().inventory_text().to_string());
    }
    if session.hud().messages_shown() != shown_before {
        if let Some(message) = session.hud().message() {
            output.lines.push(message.to_string());
        }
    }
    output
}
