//! Core functionality for user creation
//!
//! Contains email validation, identity and password resolution, the user
//! directory abstraction, and the driver tying them together.

pub mod creator;
pub mod directory;
pub mod email;
pub mod identity;
pub mod password;

pub use creator::UserCreator;
pub use directory::{JsonDirectory, RealmSelector, UserDirectory};
pub use email::EmailValidator;
pub use identity::{Identity, resolve_identity};
pub use password::{InitialPasswordGenerator, PasswordResolver, Secret};
