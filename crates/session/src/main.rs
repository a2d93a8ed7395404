use std::io::{BufRead, Write};

use anyhow::Context;

use scrapyard_session::console::{self, Command};
use scrapyard_session::{GameData, GameSession, SessionConfig};

fn main() -> anyhow::Result<()> {
    let config = SessionConfig::from_env().context("reading configuration")?;
    scrapyard_observability::init(config.log_format);

    let data = match &config.data_path {
        Some(path) => GameData::load(path)
            .with_context(|| format!("loading game data from {}", path.display()))?,
        None => GameData::builtin(),
    };

    let mut session = GameSession::new(&config, data);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}\n\n{}\n", session.hud().controls_text(), session.hud().recipe_text())?;
    writeln!(out, "{}", console::HELP_TEXT)?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let output = console::execute(&mut session, command);
        for text in &output.lines {
            writeln!(out, "{text}")?;
        }
        if output.quit {
            break;
        }
    }

    session.end();
    Ok(())
}
