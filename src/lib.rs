// Library surface for the binary, headless tests and reuse.
// Terminal rendering and key dispatch stay in main.rs.
pub mod app_dirs;
pub mod chrome;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod time_series;
pub mod util;

pub use engine::Engine;
pub use error::{TypoError, TypoResult};
pub use session::{Phase, Session};
