//! Jewel Miner rule engine: match-3 over a grid of coloured tokens.
//!
//! The [`Engine`] owns a [`Grid`] and drives it through swaps, match scanning,
//! destruction, gravity and refill. It never renders or sleeps; a front-end
//! implements [`Listener`] to animate each change and calls [`Engine::step`]
//! whenever it is ready for the next one.
//!
//! ```
//! use minertui::{Engine, EngineConfig, Grid, Recorder};
//!
//! let grid = Grid::square(8).unwrap();
//! let mut engine = Engine::with_config(grid, Recorder::new(), EngineConfig::with_seed(42)).unwrap();
//! engine.settle();
//! assert!(engine.ready());
//! ```

pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod line;
pub mod listener;
pub mod token;

pub use engine::{DEFAULT_STREAK_MIN, Engine, EngineConfig, State};
pub use error::{Axis, ConfigError, GridError};
pub use event::{ChangeEvent, EventKind, Target};
pub use grid::Grid;
pub use line::Line;
pub use listener::{Listener, Notification, Recorder, Silent};
pub use token::{Color, Token};
