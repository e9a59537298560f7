use super::{Platform, ANDROID_SCOPED_MEDIA_API};
use crate::{ChatError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// A capability the recorder or player may need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    RecordAudio,
    ReadExternalStorage,
    WriteExternalStorage,
    ReadMediaAudio,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::RecordAudio => write!(f, "record audio"),
            Permission::ReadExternalStorage => write!(f, "read storage"),
            Permission::WriteExternalStorage => write!(f, "write storage"),
            Permission::ReadMediaAudio => write!(f, "read media audio"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Denied and the authority will not ask again
    Blocked,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Result of a batch permission request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionGrants {
    statuses: HashMap<Permission, PermissionStatus>,
}

impl PermissionGrants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission, status: PermissionStatus) {
        self.statuses.insert(permission, status);
    }

    pub fn status(&self, permission: Permission) -> Option<PermissionStatus> {
        self.statuses.get(&permission).copied()
    }

    /// Whether every requested permission was granted. Missing entries count as denied.
    pub fn all_granted(&self, requested: &[Permission]) -> bool {
        requested
            .iter()
            .all(|p| self.status(*p).is_some_and(|s| s.is_granted()))
    }

    /// Requested permissions that were not granted, in request order
    pub fn denied(&self, requested: &[Permission]) -> Vec<Permission> {
        requested
            .iter()
            .copied()
            .filter(|p| !self.status(*p).is_some_and(|s| s.is_granted()))
            .collect()
    }
}

/// Something that can grant or deny capabilities in one batch
pub trait PermissionAuthority {
    fn request_multiple(&self, permissions: &[Permission]) -> Result<PermissionGrants>;
}

/// The capability set recording needs on `platform`
pub fn required_permissions(platform: Platform) -> Vec<Permission> {
    match platform {
        Platform::Android { api_level } if api_level < ANDROID_SCOPED_MEDIA_API => vec![
            Permission::ReadExternalStorage,
            Permission::WriteExternalStorage,
            Permission::RecordAudio,
        ],
        Platform::Android { .. } => vec![Permission::ReadMediaAudio, Permission::RecordAudio],
        Platform::Ios => vec![Permission::RecordAudio],
        Platform::Desktop => vec![Permission::WriteExternalStorage, Permission::RecordAudio],
    }
}

/// Request the platform's capability set in one batch
///
/// Denials are logged and returned as a [`ChatError::PermissionError`]; the
/// caller decides whether to surface it. Nothing here blocks recording.
pub fn request_capabilities(
    authority: &dyn PermissionAuthority,
    platform: Platform,
) -> Result<PermissionGrants> {
    let requested = required_permissions(platform);
    info!(
        "[PERMISSIONS] Requesting {} permission(s) for {}",
        requested.len(),
        platform
    );

    let grants = authority.request_multiple(&requested).map_err(|e| {
        error!("[PERMISSIONS] Failed to request permissions: {}", e);
        e
    })?;

    let denied = grants.denied(&requested);
    if denied.is_empty() {
        info!("[PERMISSIONS] All permissions granted");
        Ok(grants)
    } else {
        let names: Vec<String> = denied.iter().map(|p| p.to_string()).collect();
        error!("[PERMISSIONS] One or more permissions denied: {}", names.join(", "));
        Err(ChatError::PermissionError(names.join(", ")))
    }
}

/// Empty file written and removed to check the recording dir is writable
const WRITE_CHECK_FILE: &str = ".write-check";

/// Desktop "authority": there is no OS prompt, so capabilities are probed.
///
/// Audio recording is granted when an input device exists; storage when the
/// recording directory can be created and written to.
pub struct DesktopPermissions {
    recording_dir: PathBuf,
}

impl DesktopPermissions {
    pub fn new(recording_dir: impl Into<PathBuf>) -> Self {
        Self {
            recording_dir: recording_dir.into(),
        }
    }

    fn probe_storage(&self) -> PermissionStatus {
        if let Err(e) = fs::create_dir_all(&self.recording_dir) {
            warn!(
                "[PERMISSIONS] Cannot create {}: {}",
                self.recording_dir.display(),
                e
            );
            return PermissionStatus::Denied;
        }

        let marker = self.recording_dir.join(WRITE_CHECK_FILE);
        match fs::write(&marker, b"") {
            Ok(()) => {
                if let Err(e) = fs::remove_file(&marker) {
                    debug!(
                        "[PERMISSIONS] Could not remove {}: {}",
                        marker.display(),
                        e
                    );
                }
                PermissionStatus::Granted
            }
            Err(e) => {
                warn!(
                    "[PERMISSIONS] {} is not writable: {}",
                    self.recording_dir.display(),
                    e
                );
                PermissionStatus::Denied
            }
        }
    }

    fn probe_microphone(&self) -> PermissionStatus {
        #[cfg(feature = "audio-io")]
        {
            use cpal::traits::HostTrait;
            if cpal::default_host().default_input_device().is_some() {
                PermissionStatus::Granted
            } else {
                warn!("[PERMISSIONS] No input device available");
                PermissionStatus::Denied
            }
        }
        #[cfg(not(feature = "audio-io"))]
        {
            PermissionStatus::Denied
        }
    }
}

impl PermissionAuthority for DesktopPermissions {
    fn request_multiple(&self, permissions: &[Permission]) -> Result<PermissionGrants> {
        let mut grants = PermissionGrants::new();
        for permission in permissions {
            let status = match permission {
                Permission::RecordAudio => self.probe_microphone(),
                Permission::ReadExternalStorage
                | Permission::WriteExternalStorage
                | Permission::ReadMediaAudio => self.probe_storage(),
            };
            debug!("[PERMISSIONS] {} -> {:?}", permission, status);
            grants.insert(*permission, status);
        }
        Ok(grants)
    }
}

/// Fixed answers, for tests and headless runs
#[derive(Debug, Clone)]
pub struct StaticPermissions {
    default: PermissionStatus,
    overrides: HashMap<Permission, PermissionStatus>,
}

impl StaticPermissions {
    pub fn granting_all() -> Self {
        Self {
            default: PermissionStatus::Granted,
            overrides: HashMap::new(),
        }
    }

    pub fn denying_all() -> Self {
        Self {
            default: PermissionStatus::Denied,
            overrides: HashMap::new(),
        }
    }

    pub fn with(mut self, permission: Permission, status: PermissionStatus) -> Self {
        self.overrides.insert(permission, status);
        self
    }
}

impl PermissionAuthority for StaticPermissions {
    fn request_multiple(&self, permissions: &[Permission]) -> Result<PermissionGrants> {
        let mut grants = PermissionGrants::new();
        for permission in permissions {
            let status = self
                .overrides
                .get(permission)
                .copied()
                .unwrap_or(self.default);
            grants.insert(*permission, status);
        }
        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_android_legacy_storage_set() {
        let perms = required_permissions(Platform::Android { api_level: 30 });
        assert_eq!(
            perms,
            vec![
                Permission::ReadExternalStorage,
                Permission::WriteExternalStorage,
                Permission::RecordAudio
            ]
        );
    }

    #[test]
    fn test_android_scoped_media_set() {
        let perms = required_permissions(Platform::Android { api_level: 33 });
        assert_eq!(perms, vec![Permission::ReadMediaAudio, Permission::RecordAudio]);
    }

    #[test]
    fn test_ios_needs_microphone_only() {
        assert_eq!(required_permissions(Platform::Ios), vec![Permission::RecordAudio]);
    }

    #[test]
    fn test_all_granted() {
        let authority = StaticPermissions::granting_all();
        let grants = request_capabilities(&authority, Platform::Android { api_level: 34 }).unwrap();
        assert!(grants.all_granted(&[Permission::ReadMediaAudio, Permission::RecordAudio]));
    }

    #[test]
    fn test_single_denial_is_reported() {
        let authority = StaticPermissions::granting_all()
            .with(Permission::RecordAudio, PermissionStatus::Blocked);
        let result = request_capabilities(&authority, Platform::Ios);
        match result {
            Err(ChatError::PermissionError(msg)) => assert!(msg.contains("record audio")),
            other => panic!("expected permission error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_entry_counts_as_denied() {
        let grants = PermissionGrants::new();
        assert!(!grants.all_granted(&[Permission::RecordAudio]));
        assert_eq!(grants.denied(&[Permission::RecordAudio]), vec![Permission::RecordAudio]);
    }

    #[test]
    fn test_desktop_storage_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        let authority = DesktopPermissions::new(dir.path().join("recordings"));
        let grants = authority
            .request_multiple(&[Permission::WriteExternalStorage])
            .unwrap();
        assert_eq!(
            grants.status(Permission::WriteExternalStorage),
            Some(PermissionStatus::Granted)
        );
        assert!(dir.path().join("recordings").is_dir());
    }

    #[test]
    fn test_storage_check_leaves_recording_dir_clean() {
        let dir = tempfile::tempdir().unwrap();
        let recordings = dir.path().join("recordings");
        let authority = DesktopPermissions::new(recordings.clone());

        for _ in 0..2 {
            let grants = authority
                .request_multiple(&[Permission::WriteExternalStorage])
                .unwrap();
            assert!(grants.all_granted(&[Permission::WriteExternalStorage]));
        }

        assert!(!recordings.join(WRITE_CHECK_FILE).exists());
        assert_eq!(std::fs::read_dir(&recordings).unwrap().count(), 0);
    }
}
