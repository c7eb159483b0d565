//! MoodRx - facial-expression literary prescription kiosk
//!
//! A terminal kiosk that takes a visitor's name and a photo (uploaded from
//! disk or snapped from a camera), sends both to an emotion analysis
//! service, and prints the recommended book as a prescription slip.
//!
//! ## Layout
//!
//! - [`wizard`]: step sequencing, independent of step content
//! - [`flow`]: name, image, submission and result for one session
//! - [`capture`]: upload/camera panels and the selected image
//! - [`analysis`]: the multipart HTTP client
//! - [`tui`]: the ratatui front end
//!
//! ## Quick Start
//!
//! ```bash
//! # Kiosk mode
//! moodrx
//!
//! # One photo, no UI
//! moodrx analyze face.jpg --name 홍길동
//! ```

pub mod analysis;
pub mod camera;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod locale;
pub mod logging;
pub mod media;
pub mod slip;
pub mod tui;
pub mod utils;
pub mod wizard;

// Re-export commonly used types
pub use error::{ErrorCode, MoodRxError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
