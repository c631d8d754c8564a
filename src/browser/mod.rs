//! Browser management
//!
//! A [`Session`] owns one live page behind the [`PageDriver`] trait.
//! [`ChromePage`] drives Chrome/Chromium through `headless_chrome`.

pub mod chrome;
pub mod config;
pub mod driver;
pub mod session;

pub use chrome::ChromePage;
pub use config::{ConnectionOptions, LaunchOptions, SessionConfig};
pub use driver::{NavigationOutcome, PageDriver, Query, WaitPolicy};
pub use session::{LaunchReport, NavigationReport, Session, SessionState};
