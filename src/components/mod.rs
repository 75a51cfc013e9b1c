pub mod fps;
pub mod help;
pub mod sprite_view;
