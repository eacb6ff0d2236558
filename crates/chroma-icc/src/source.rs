//! Named profile resources.
//!
//! Transforms open their two profiles by name through a [`ProfileSource`].
//! A missing resource is an ordinary error
//! ([`IccError::ProfileMissing`]), never a panic.
//!
//! - [`ProfileDirectory`] - `<root>/<name>.icc` (or `.icm`) files on disk
//! - [`ProfileSet`] - In-memory name to bytes map, with built-in sRGB and Lab

use crate::{IccError, IccResult, Profile};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Resource name of the device RGB profile.
pub const DEVICE_RGB: &str = "sRGB Profile";

/// Resource name of the Lab reference profile.
pub const LAB_REFERENCE: &str = "Generic Lab Profile";

/// Supplies raw ICC bytes by resource name.
pub trait ProfileSource: Send + Sync {
    /// Returns the bytes of profile `name`.
    ///
    /// # Errors
    ///
    /// [`IccError::ProfileMissing`] when no such resource exists.
    fn load(&self, name: &str) -> IccResult<Vec<u8>>;
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn load(&self, name: &str) -> IccResult<Vec<u8>> {
        (**self).load(name)
    }
}

impl<T: ProfileSource + ?Sized> ProfileSource for Arc<T> {
    fn load(&self, name: &str) -> IccResult<Vec<u8>> {
        (**self).load(name)
    }
}

impl<T: ProfileSource + ?Sized> ProfileSource for Box<T> {
    fn load(&self, name: &str) -> IccResult<Vec<u8>> {
        (**self).load(name)
    }
}

/// Profiles stored as files in one directory.
#[derive(Debug, Clone)]
pub struct ProfileDirectory {
    root: PathBuf,
}

impl ProfileDirectory {
    /// Extensions tried after the bare name.
    const EXTENSIONS: [&'static str; 2] = ["icc", "icm"];

    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProfileSource for ProfileDirectory {
    fn load(&self, name: &str) -> IccResult<Vec<u8>> {
        for ext in Self::EXTENSIONS {
            let path = self.root.join(format!("{name}.{ext}"));
            match std::fs::read(&path) {
                Ok(bytes) => {
                    trace!(path = %path.display(), len = bytes.len(), "loaded profile");
                    return Ok(bytes);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(IccError::ProfileMissing {
            name: name.to_owned(),
        })
    }
}

/// In-memory profile resources.
///
/// # Example
///
/// ```rust
/// use chroma_icc::{ProfileSet, ProfileSource, DEVICE_RGB};
///
/// let set = ProfileSet::builtin().unwrap();
/// assert!(set.load(DEVICE_RGB).is_ok());
/// assert!(set.load("Missing").unwrap_err().is_missing_profile());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: HashMap<String, Vec<u8>>,
}

impl ProfileSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding lcms2's sRGB profile under [`DEVICE_RGB`] and
    /// a D50 Lab v4 profile under [`LAB_REFERENCE`].
    pub fn builtin() -> IccResult<Self> {
        Ok(Self::new()
            .with(DEVICE_RGB, Profile::srgb().to_icc()?)
            .with(LAB_REFERENCE, Profile::lab()?.to_icc()?))
    }

    /// Adds or replaces a resource, builder style.
    pub fn with(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.profiles.insert(name.into(), bytes);
    }

    /// Removes a resource, returning its bytes.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.profiles.remove(name)
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }
}

impl ProfileSource for ProfileSet {
    fn load(&self, name: &str) -> IccResult<Vec<u8>> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| IccError::ProfileMissing {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set() {
        let set = ProfileSet::builtin().unwrap();
        assert!(Profile::load(&set, DEVICE_RGB).unwrap().is_rgb());
        assert!(Profile::load(&set, LAB_REFERENCE).unwrap().is_lab());
    }

    #[test]
    fn test_missing_in_set() {
        let mut set = ProfileSet::builtin().unwrap();
        assert!(set.remove(LAB_REFERENCE).is_some());
        assert!(!set.contains(LAB_REFERENCE));
        let err = set.load(LAB_REFERENCE).unwrap_err();
        assert!(err.is_missing_profile());
    }

    #[test]
    fn test_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(format!("{DEVICE_RGB}.icc")),
            Profile::srgb().to_icc().unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(format!("{LAB_REFERENCE}.icm")),
            Profile::lab().unwrap().to_icc().unwrap(),
        )
        .unwrap();

        let source = ProfileDirectory::new(dir.path());
        assert_eq!(source.root(), dir.path());
        assert!(Profile::load(&source, DEVICE_RGB).unwrap().is_rgb());
        assert!(Profile::load(&source, LAB_REFERENCE).unwrap().is_lab());
        assert!(source.load("Nope").unwrap_err().is_missing_profile());
    }

    #[test]
    fn test_missing_directory() {
        let source = ProfileDirectory::new("/nonexistent/chroma/profiles");
        assert!(source.load(DEVICE_RGB).unwrap_err().is_missing_profile());
    }

    #[test]
    fn test_shared_source() {
        let set: Arc<dyn ProfileSource> = Arc::new(ProfileSet::builtin().unwrap());
        assert!(set.load(DEVICE_RGB).is_ok());
    }
}
