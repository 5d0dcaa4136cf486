//! macroquad front end: drawing, sound and input polling. Nothing in here
//! decides game state.

pub mod audio;
pub mod input;
pub mod render;

pub use audio::Sounds;
pub use input::poll_input;
pub use render::draw;
