// AquaRegistration - Core Library
// Exposes all modules for use in the CLI, the terminal UI, and tests

pub mod auth;
pub mod config;
pub mod export;
pub mod roster;
pub mod store;
pub mod swimmer;
pub mod validation;

// Only compile the terminal UI when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use auth::{AccountStatus, AuthError, AuthService, LoginCredentials, RegisterData, Role, User};
pub use config::AppConfig;
pub use export::{export_filename, export_roster, roster_summary, write_roster_csv};
pub use roster::Roster;
pub use store::{Event, Store, CURRENT_USER_KEY, SWIMMERS_KEY, USERS_KEY};
pub use swimmer::{Swimmer, SwimmerForm, EVENTS};
pub use validation::{is_valid_email, is_valid_entry_time, FieldError, FormErrors};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
