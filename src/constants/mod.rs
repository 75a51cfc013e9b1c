pub mod game;

/// Playfield size the app centers inside the terminal.
pub const WIDTH: u16 = 100;
pub const HEIGHT: u16 = 36;

pub const TITLE_TEXT: &str = r#"
 _____ _       _     _            ____             _   _
|  ___| | __ _| |__ | |__  _   _ | __ )  __ _ _ __| |_| |__
| |_  | |/ _` | '_ \| '_ \| | | ||  _ \ / _` | '__| __| '_ \
|  _| | | (_| | |_) | |_) | |_| || |_) | (_| | |  | |_| | | |
|_|   |_|\__,_|_.__/|_.__/ \__, ||____/ \__,_|_|   \__|_| |_|
                           |___/
"#;

pub const GAME_OVER_TEXT: &str = r#"
  ____    _    __  __ _____    _____     _______ ____
 / ___|  / \  |  \/  | ____|  / _ \ \   / / ____|  _ \
| |  _  / _ \ | |\/| |  _|   | | | \ \ / /|  _| | |_) |
| |_| |/ ___ \| |  | | |___  | |_| |\ V / | |___|  _ <
 \____/_/   \_\_|  |_|_____|  \___/  \_/  |_____|_| \_\
"#;
