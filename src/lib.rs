// Activity engine: config normalization, session state, validation.
// The terminal front end lives in the binary (main.rs, ui/).
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod migrations;
pub mod preferences;
pub mod runtime;
pub mod session;
pub mod transform;
pub mod validator;

pub use config::ActivityConfig;
pub use geometry::{Point, View, Viewport};
pub use migrations::normalize;
pub use session::{ActivitySession, ClickOutcome};
