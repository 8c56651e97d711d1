//! Permission system for checking user roles.
//!
//! Roles are global, not per chat:
//!
//! - Owners (`OWNER_IDS`): manage uploaders and broadcast
//! - Sudo users (`SUDO_USERS`, plus owners): catalogue and spawn administration
//! - Uploaders: level 1..=3, capping the rarities they may upload
//!
//! ## Usage
//!
//! ```rust,ignore
//! if !state.permissions.is_sudo(user_id) {
//!     return Ok(());
//! }
//! let level = state.permissions.uploader_level(user_id).await?;
//! ```

mod checker;

pub use checker::{Permissions, Roles, MAX_UPLOADER_LEVEL};
