//! Platform capabilities
//!
//! The microphone and storage permissions a recording needs differ per
//! platform. They are computed here as a single capability set and requested
//! in one batch through a [`PermissionAuthority`].

pub mod permissions;

pub use permissions::{
    request_capabilities, required_permissions, DesktopPermissions, Permission,
    PermissionAuthority, PermissionGrants, PermissionStatus, StaticPermissions,
};

use serde::Deserialize;

/// First Android API level with scoped media permissions
pub const ANDROID_SCOPED_MEDIA_API: u32 = 33;

/// Target platform, used only to pick the permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "os", rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Desktop,
    Ios,
    Android { api_level: u32 },
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Desktop => write!(f, "desktop"),
            Platform::Ios => write!(f, "ios"),
            Platform::Android { api_level } => write!(f, "android (API {})", api_level),
        }
    }
}
