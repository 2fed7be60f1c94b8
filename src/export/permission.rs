//! Storage write authorization

use std::future::Future;
use std::path::{Path, PathBuf};

/// Answer from a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Decides whether the pipeline may write to storage
pub trait PermissionAuthority {
    fn request_write_access(&self) -> impl Future<Output = Access> + Send;
}

/// Fixed answer, e.g. when the user already chose in a settings page
#[derive(Debug, Clone, Copy)]
pub struct Preapproved(pub Access);

impl PermissionAuthority for Preapproved {
    async fn request_write_access(&self) -> Access {
        self.0
    }
}

/// Grants access when the destination folder exists (or can be created)
/// and is not read-only
#[derive(Debug, Clone)]
pub struct DirectoryAuthority {
    dir: PathBuf,
}

impl DirectoryAuthority {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn check(dir: &Path) -> Access {
        if let Err(err) = std::fs::create_dir_all(dir) {
            log::warn!("Cannot create {}: {}", dir.display(), err);
            return Access::Denied;
        }
        match std::fs::metadata(dir) {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => Access::Granted,
            Ok(_) => {
                log::warn!("{} is not a writable folder", dir.display());
                Access::Denied
            }
            Err(err) => {
                log::warn!("Cannot inspect {}: {}", dir.display(), err);
                Access::Denied
            }
        }
    }
}

impl PermissionAuthority for DirectoryAuthority {
    async fn request_write_access(&self) -> Access {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || Self::check(&dir))
            .await
            .unwrap_or_else(|err| {
                log::error!("Write access check failed: {}", err);
                Access::Denied
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preapproved() {
        assert_eq!(Preapproved(Access::Granted).request_write_access().await, Access::Granted);
        assert_eq!(Preapproved(Access::Denied).request_write_access().await, Access::Denied);
    }

    #[tokio::test]
    async fn test_directory_created_and_granted() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let authority = DirectoryAuthority::new(&dir);
        assert_eq!(authority.request_write_access().await, Access::Granted);
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_read_only_folder_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("locked");
        std::fs::create_dir(&dir).unwrap();
        let mut perms = std::fs::metadata(&dir).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&dir, perms.clone()).unwrap();

        let access = DirectoryAuthority::new(&dir).request_write_access().await;

        perms.set_readonly(false);
        std::fs::set_permissions(&dir, perms).unwrap();
        assert_eq!(access, Access::Denied);
    }

    #[tokio::test]
    async fn test_file_in_the_way_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let authority = DirectoryAuthority::new(&file);
        assert_eq!(authority.request_write_access().await, Access::Denied);
    }
}
