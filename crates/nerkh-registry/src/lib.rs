//! # nerkh-registry
//!
//! Registered users of the nerkh price service.
//!
//! Every `/start` registers the caller once; the admin can list everyone who
//! has registered, newest first. Users are kept in SQLite so the list
//! survives restarts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nerkh_registry::{SqliteUserRegistry, UserRegistry, format_user_list};
//!
//! let registry = SqliteUserRegistry::open("nerkh.db")?;
//! registry.register(42, "Sara")?;
//! let text = format_user_list(&registry.list()?);
//! ```

mod error;
mod sqlite;
mod user;

pub use error::{RegistryError, Result};
pub use sqlite::SqliteUserRegistry;
pub use user::{
    ACCESS_DENIED, MemoryUserRegistry, NO_USERS, RegisteredUser, UserRegistry, format_user_list,
    is_admin,
};
