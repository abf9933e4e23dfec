//! Terminal UI: renders the board bottom-up and turns key presses and mouse
//! clicks into column selections.

mod app;
pub mod game_view;

pub use app::App;
