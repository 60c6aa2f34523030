//! Well-known role names used in time-entry grants.
//!
//! These must match the role names issued by the dashboard's authentication
//! layer.

pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_LOCAL_DEVELOPER: &str = "local_developer";
pub const ROLE_LOCAL_PROJECT_MANAGER: &str = "local_project_manager";
pub const ROLE_EXTERNAL_DEVELOPER: &str = "external_developer";
pub const ROLE_INTERNAL_DEVELOPER: &str = "internal_developer";
pub const ROLE_SECRETARY: &str = "secretary";
pub const ROLE_PROJECT_MANAGER: &str = "project_manager";
