mod debug;
mod game;
mod over;
mod title;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::debug::DebugAction;
pub use crate::action::game::GameAction;
pub use crate::action::over::OverAction;
pub use crate::action::title::TitleAction;
use crate::sim::Tunables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Display, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Refresh,
    Error(String),
    ToggleShowHelp,
    ToggleFps,
    // Session flow
    StartGame,
    OpenDebug,
    CloseDebug,
    BackToTitle,
    SetTunables(Tunables),
    SessionEnded { score: u32 },
    ShowGameOver { score: u32, best: u32, new_best: bool },
    // Page commands
    Title(TitleAction),
    Game(GameAction),
    Debug(DebugAction),
    Over(OverAction),
}

impl Command {
    /// Human-readable form for the help overlay.
    pub fn string(&self) -> String {
        match self {
            Command::Title(command) => command.to_string(),
            Command::Game(command) => command.to_string(),
            Command::Debug(command) => command.to_string(),
            Command::Over(command) => command.to_string(),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

#[macro_export]
macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub use act;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_act_defaults_to_start() {
        let action = act!(Command::Quit);
        assert_eq!(action.state, ActionState::Start);
        let action = act!(Command::Game(GameAction::Jump), ActionState::End);
        assert_eq!(action.state, ActionState::End);
    }

    #[test]
    fn test_commands_parse_from_yaml() {
        let command: Command = serde_yaml::from_str("Quit").unwrap();
        assert_eq!(command, Command::Quit);
        let command: GameAction = serde_yaml::from_str("Jump").unwrap();
        assert_eq!(command, GameAction::Jump);
    }
}
