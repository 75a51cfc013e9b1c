use ratatui::style::Color;

/// Seconds the flap sprite stays up after a jump.
pub const FLAP_DURATION: f32 = 0.15;
/// Horizontal flyer position as a fraction of the canvas width.
pub const FLYER_X_RATIO: f32 = 0.2;

pub const PIPE_WIDTH: u16 = 6;
/// Rows of full-width cap on the gap-facing end of each pipe.
pub const PIPE_CAP_HEIGHT: u16 = 1;
/// Rows kept clear of the gap at the top and bottom of the canvas.
pub const GAP_MARGIN: u16 = 2;

pub const PIPE_COLOR: Color = Color::LightGreen;
pub const FLYER_COLOR: Color = Color::Yellow;
pub const HITBOX_COLOR: Color = Color::LightRed;

pub const FLYER_GLIDE_TEXT: &str = r#"
 ^ ^
(o.o)
(   )
- - -
"#;

pub const FLYER_FLAP_TEXT: &str = r#"
\\ //
(o.o)
(   )
 - -
"#;
