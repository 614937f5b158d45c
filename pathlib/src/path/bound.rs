//! Paths bound to a filesystem collaborator.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::SystemTime;

use glob::Pattern;

use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::fs::{
    require_lstat, require_read_link, require_symlink, FileHandle, FileSystem, Metadata,
    OpenOptions, OsFs,
};
use crate::path::PurePath;
use crate::resolve::{self, ResolveError};

/// Default permission bits for created files.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Default permission bits for created directories.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default cap on symlinks followed by a single resolution.
pub const DEFAULT_MAX_SYMLINK_HOPS: usize = 40;

/// Creation permissions and resolution limits carried by a [`BoundPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathDefaults {
    /// Mode for files created without an explicit mode.
    pub file_mode: u32,
    /// Mode for directories created without an explicit mode.
    pub dir_mode: u32,
    /// Maximum symlinks followed by [`BoundPath::resolve_all`]; `None` means
    /// unbounded.
    pub max_symlink_hops: Option<usize>,
}

impl Default for PathDefaults {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            max_symlink_hops: Some(DEFAULT_MAX_SYMLINK_HOPS),
        }
    }
}

/// A [`PurePath`] plus a shared handle to the filesystem it addresses.
///
/// Lexical operations delegate to the embedded pure path and rebind the
/// result to the same filesystem. I/O operations pass the rendered path
/// string to the collaborator.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pathlib::{BoundPath, MemFs};
///
/// let root = BoundPath::new(Arc::new(MemFs::new()), ["/data"]);
/// root.mkdir_all(None).unwrap();
/// let report = root.join(["report.csv"]);
/// report.write_file(b"a,b\n").unwrap();
/// assert_eq!(report.size().unwrap(), 4);
/// assert_eq!(root.read_dir().unwrap(), vec![report]);
/// ```
#[derive(Clone)]
pub struct BoundPath {
    pure: PurePath,
    fs: Arc<dyn FileSystem>,
    defaults: PathDefaults,
}

impl BoundPath {
    /// Binds a native-flavor path built from `inputs` to `fs`.
    pub fn new<I, S>(fs: Arc<dyn FileSystem>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_pure(fs, PurePath::new(inputs))
    }

    /// Binds a path of an explicit flavor to `fs`.
    pub fn with_flavor<I, S>(fs: Arc<dyn FileSystem>, flavor: Flavor, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_pure(fs, PurePath::with_flavor(flavor, inputs))
    }

    /// Binds an existing pure path to `fs`.
    #[must_use]
    pub fn from_pure(fs: Arc<dyn FileSystem>, pure: PurePath) -> Self {
        Self {
            pure,
            fs,
            defaults: PathDefaults::default(),
        }
    }

    /// Binds a native-flavor path to the host filesystem.
    pub fn os<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Arc::new(OsFs::new()), inputs)
    }

    /// Replaces the creation defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: PathDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// The embedded pure path.
    #[must_use]
    pub fn pure(&self) -> &PurePath {
        &self.pure
    }

    /// The filesystem collaborator.
    #[must_use]
    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// The creation defaults.
    #[must_use]
    pub fn defaults(&self) -> &PathDefaults {
        &self.defaults
    }

    /// Binds `pure` to this path's filesystem and defaults.
    #[must_use]
    pub fn rebind(&self, pure: PurePath) -> Self {
        Self {
            pure,
            fs: Arc::clone(&self.fs),
            defaults: self.defaults,
        }
    }

    fn rebind_with<I, S>(&self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rebind(PurePath::with_flavor(self.flavor(), inputs))
    }

    fn path_str(&self) -> String {
        self.pure.to_string()
    }

    // ---------------------------------------------------------------------
    // Lexical operations
    // ---------------------------------------------------------------------

    /// See [`PurePath::flavor`].
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.pure.flavor()
    }

    /// See [`PurePath::drive`].
    #[must_use]
    pub fn drive(&self) -> &str {
        self.pure.drive()
    }

    /// See [`PurePath::root`].
    #[must_use]
    pub fn root(&self) -> &str {
        self.pure.root()
    }

    /// See [`PurePath::anchor`].
    #[must_use]
    pub fn anchor(&self) -> String {
        self.pure.anchor()
    }

    /// See [`PurePath::parts`].
    #[must_use]
    pub fn parts(&self) -> &[String] {
        self.pure.parts()
    }

    /// See [`PurePath::name`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.pure.name()
    }

    /// See [`PurePath::suffix`].
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.pure.suffix()
    }

    /// See [`PurePath::suffixes`].
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        self.pure.suffixes()
    }

    /// See [`PurePath::stem`].
    #[must_use]
    pub fn stem(&self) -> &str {
        self.pure.stem()
    }

    /// See [`PurePath::is_absolute`].
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.pure.is_absolute()
    }

    /// See [`PurePath::as_posix`].
    #[must_use]
    pub fn as_posix(&self) -> String {
        self.pure.as_posix()
    }

    /// See [`PurePath::with_name`].
    ///
    /// # Errors
    ///
    /// Fails like [`PurePath::with_name`].
    pub fn with_name(&self, name: &str) -> Result<Self> {
        Ok(self.rebind(self.pure.with_name(name)?))
    }

    /// See [`PurePath::with_stem`].
    ///
    /// # Errors
    ///
    /// Fails like [`PurePath::with_stem`].
    pub fn with_stem(&self, stem: &str) -> Result<Self> {
        Ok(self.rebind(self.pure.with_stem(stem)?))
    }

    /// See [`PurePath::with_suffix`].
    ///
    /// # Errors
    ///
    /// Fails like [`PurePath::with_suffix`].
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        Ok(self.rebind(self.pure.with_suffix(suffix)?))
    }

    /// See [`PurePath::join`].
    #[must_use]
    pub fn join<I, S>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rebind(self.pure.join(others))
    }

    /// Joins other paths, bound or pure.
    #[must_use]
    pub fn join_path<'a, I, P>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a P>,
        P: AsRef<PurePath> + 'a + ?Sized,
    {
        self.rebind(
            self.pure
                .join_path(others.into_iter().map(|p: &'a P| -> &'a PurePath { p.as_ref() })),
        )
    }

    /// See [`PurePath::parent`].
    #[must_use]
    pub fn parent(&self) -> Self {
        self.rebind(self.pure.parent())
    }

    /// See [`PurePath::parents`].
    #[must_use]
    pub fn parents(&self) -> Vec<Self> {
        self.pure
            .parents()
            .into_iter()
            .map(|p| self.rebind(p))
            .collect()
    }

    /// See [`PurePath::relative_to`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRelative`] if `other` is not a prefix.
    pub fn relative_to(&self, other: impl AsRef<PurePath>) -> Result<Self> {
        Ok(self.rebind(self.pure.relative_to(other.as_ref())?))
    }

    /// See [`PurePath::relative_to_str`].
    ///
    /// # Errors
    ///
    /// Fails like [`PurePath::relative_to_str`].
    pub fn relative_to_str<I, S>(&self, others: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.rebind(self.pure.relative_to_str(others)?))
    }

    /// See [`PurePath::is_relative_to`].
    #[must_use]
    pub fn is_relative_to(&self, other: impl AsRef<PurePath>) -> bool {
        self.pure.is_relative_to(other.as_ref())
    }

    /// See [`PurePath::matches`].
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        self.pure.matches(pattern)
    }

    /// Whether both paths render identically, without touching the filesystem.
    #[must_use]
    pub fn equals(&self, other: impl AsRef<PurePath>) -> bool {
        self.pure.equals(other.as_ref())
    }

    /// See [`PurePath::clean`].
    #[must_use]
    pub fn clean(&self) -> Self {
        self.rebind(self.pure.clean())
    }

    // ---------------------------------------------------------------------
    // Filesystem operations
    // ---------------------------------------------------------------------

    /// Creates or truncates the file for reading and writing.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn create(&self) -> Result<Box<dyn FileHandle>> {
        let options = OpenOptions::write_truncate().read(true);
        self.open_file(&options, None)
    }

    /// Opens the file read-only.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn open(&self) -> Result<Box<dyn FileHandle>> {
        self.open_file(&OpenOptions::read_only(), None)
    }

    /// Opens the file with explicit options; `mode` defaults to the file mode.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn open_file(&self, options: &OpenOptions, mode: Option<u32>) -> Result<Box<dyn FileHandle>> {
        let mode = mode.unwrap_or(self.defaults.file_mode);
        Ok(self.fs.open(&self.path_str(), options, mode)?)
    }

    /// Creates this directory; `mode` defaults to the directory mode.
    ///
    /// # Errors
    ///
    /// Fails if the parent is missing or the path exists.
    pub fn mkdir(&self, mode: Option<u32>) -> Result<()> {
        let mode = mode.unwrap_or(self.defaults.dir_mode);
        Ok(self.fs.mkdir(&self.path_str(), mode)?)
    }

    /// Creates this directory and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Fails if an ancestor is not a directory.
    pub fn mkdir_all(&self, mode: Option<u32>) -> Result<()> {
        let mode = mode.unwrap_or(self.defaults.dir_mode);
        Ok(self.fs.mkdir_all(&self.path_str(), mode)?)
    }

    /// Removes a file or empty directory.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn remove(&self) -> Result<()> {
        Ok(self.fs.remove(&self.path_str())?)
    }

    /// Removes this path and everything below it.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn remove_all(&self) -> Result<()> {
        Ok(self.fs.remove_all(&self.path_str())?)
    }

    /// Moves this entry to `target` and returns the new location.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn rename(&self, target: impl AsRef<PurePath>) -> Result<Self> {
        let target = target.as_ref();
        self.fs.rename(&self.path_str(), &target.to_string())?;
        Ok(self.rebind(target.clone()))
    }

    /// Moves this entry to the path spelled by `target`.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn rename_str(&self, target: &str) -> Result<Self> {
        self.rename(self.rebind_with([target]))
    }

    /// Metadata, following symlinks.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn stat(&self) -> Result<Metadata> {
        Ok(self.fs.stat(&self.path_str())?)
    }

    /// Metadata of the entry itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnsupported`] without lstat support.
    pub fn lstat(&self) -> Result<Metadata> {
        Ok(require_lstat(self.fs.as_ref())?.lstat(&self.path_str())?)
    }

    /// Sets permission bits.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn chmod(&self, mode: u32) -> Result<()> {
        Ok(self.fs.chmod(&self.path_str(), mode)?)
    }

    /// Sets access and modification times.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn chtimes(&self, accessed: SystemTime, modified: SystemTime) -> Result<()> {
        Ok(self.fs.chtimes(&self.path_str(), accessed, modified)?)
    }

    /// Whether anything exists at this path.
    ///
    /// # Errors
    ///
    /// Propagates errors other than not-found.
    pub fn exists(&self) -> Result<bool> {
        match self.stat() {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether a directory exists at this path.
    ///
    /// # Errors
    ///
    /// Propagates errors other than not-found.
    pub fn dir_exists(&self) -> Result<bool> {
        match self.stat() {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether this path is a directory.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist.
    pub fn is_dir(&self) -> Result<bool> {
        Ok(self.stat()?.is_dir())
    }

    /// Whether this path is a regular file.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist.
    pub fn is_file(&self) -> Result<bool> {
        Ok(self.stat()?.is_file())
    }

    /// Whether this path is itself a symlink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnsupported`] without lstat support.
    pub fn is_symlink(&self) -> Result<bool> {
        Ok(self.lstat()?.is_symlink())
    }

    /// Whether this is an empty file or a directory without entries.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist.
    pub fn is_empty(&self) -> Result<bool> {
        let meta = self.stat()?;
        if meta.is_dir() {
            return Ok(self.fs.read_dir_names(&self.path_str())?.is_empty());
        }
        Ok(meta.size() == 0)
    }

    /// The directory's entries joined onto this path, without stats.
    ///
    /// # Errors
    ///
    /// Fails if this is not a readable directory.
    pub fn read_dir(&self) -> Result<Vec<Self>> {
        Ok(self
            .fs
            .read_dir_names(&self.path_str())?
            .into_iter()
            .map(|name| self.join([name]))
            .collect())
    }

    /// The whole file's contents.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn read_file(&self) -> Result<Vec<u8>> {
        let mut handle = self.open()?;
        let mut buf = Vec::new();
        handle.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Replaces the file's contents with `data`.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem's error.
    pub fn write_file(&self, data: &[u8]) -> Result<()> {
        let mut handle = self.open_file(&OpenOptions::write_truncate(), None)?;
        handle.write_all(data)?;
        handle.flush()?;
        Ok(())
    }

    /// Replaces the file's contents with everything read from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read and write errors.
    pub fn write_reader(&self, mut reader: impl Read) -> Result<u64> {
        let mut handle = self.open_file(&OpenOptions::write_truncate(), None)?;
        let copied = io::copy(&mut reader, &mut handle)?;
        handle.flush()?;
        Ok(copied)
    }

    /// Like [`BoundPath::write_reader`] but refuses to replace an existing
    /// file.
    ///
    /// # Errors
    ///
    /// Fails with an already-exists I/O error if the path exists.
    pub fn safe_write_reader(&self, mut reader: impl Read) -> Result<u64> {
        let options = OpenOptions::new().write(true).create_new(true);
        let mut handle = self.open_file(&options, None)?;
        let copied = io::copy(&mut reader, &mut handle)?;
        handle.flush()?;
        Ok(copied)
    }

    /// Whether the file contains `needle`.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    pub fn file_contains_bytes(&self, needle: &[u8]) -> Result<bool> {
        self.file_contains_any_bytes(&[needle])
    }

    /// Whether the file contains any of `needles`.
    ///
    /// # Errors
    ///
    /// Propagates read errors.
    pub fn file_contains_any_bytes(&self, needles: &[&[u8]]) -> Result<bool> {
        let contents = self.read_file()?;
        Ok(needles.iter().any(|needle| contains(&contents, needle)))
    }

    /// The target of this symlink, in this path's flavor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnsupported`] without readlink support.
    pub fn readlink(&self) -> Result<Self> {
        let target = require_read_link(self.fs.as_ref())?.read_link(&self.path_str())?;
        Ok(self.rebind_with([target]))
    }

    /// Creates a symlink at this path pointing at `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnsupported`] without symlink support.
    pub fn symlink(&self, target: impl AsRef<PurePath>) -> Result<()> {
        let linker = require_symlink(self.fs.as_ref())?;
        Ok(linker.symlink(&target.as_ref().to_string(), &self.path_str())?)
    }

    /// [`BoundPath::symlink`] with the target spelled as a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnsupported`] without symlink support.
    pub fn symlink_str(&self, target: &str) -> Result<()> {
        self.symlink(self.rebind_with([target]))
    }

    /// Replaces every symlink component with its target.
    ///
    /// # Errors
    ///
    /// The error carries the unresolved path alongside the cause.
    pub fn resolve_all(&self) -> std::result::Result<Self, ResolveError> {
        resolve::resolve_all(self, self.defaults.max_symlink_hops)
    }

    /// Whether both paths resolve to the same cleaned location.
    ///
    /// # Errors
    ///
    /// Fails if either path cannot be resolved.
    pub fn deep_equals(&self, other: &BoundPath) -> Result<bool> {
        let ours = self.resolve_all()?.clean();
        let theirs = other.resolve_all()?.clean();
        Ok(ours.equals(&theirs))
    }

    /// The entry of this directory with the most recent modification time.
    ///
    /// Entries that disappear between listing and stat are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] when no entry remains.
    pub fn get_latest(&self) -> Result<Self> {
        let mut latest: Option<(SystemTime, Self)> = None;
        for entry in self.read_dir()? {
            let modified = match entry.mtime() {
                Ok(modified) => modified,
                Err(e) if e.is_not_found() => {
                    log::debug!("{entry} vanished while looking for the latest entry");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if latest.as_ref().map_or(true, |(seen, _)| modified > *seen) {
                latest = Some((modified, entry));
            }
        }
        latest
            .map(|(_, entry)| entry)
            .ok_or_else(|| Error::EmptyCollection {
                path: self.path_str(),
            })
    }

    /// Entries below this path matching `pattern`, one glob per segment.
    ///
    /// An anchored pattern is matched from its own anchor instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] for a malformed pattern. Unreadable
    /// directories are skipped.
    pub fn glob(&self, pattern: &str) -> Result<Vec<Self>> {
        let pattern = PurePath::with_flavor(self.flavor(), [pattern]);
        let (mut frontier, segments) = if pattern.is_anchored() {
            let anchor = self.rebind_with([pattern.anchor()]);
            (vec![anchor], &pattern.parts()[1..])
        } else {
            (vec![self.clone()], pattern.parts())
        };

        for segment in segments {
            if !has_magic(segment) {
                frontier = frontier.iter().map(|p| p.join([segment])).collect();
                continue;
            }
            let compiled = Pattern::new(segment)
                .map_err(|e| Error::invalid_operand("glob", format!("{segment:?}: {e}")))?;
            let mut next = Vec::new();
            for dir in &frontier {
                let Ok(names) = self.fs.read_dir_names(&dir.path_str()) else {
                    continue;
                };
                next.extend(
                    names
                        .into_iter()
                        .filter(|name| compiled.matches(name))
                        .map(|name| dir.join([name])),
                );
            }
            frontier = next;
        }

        Ok(frontier
            .into_iter()
            .filter(|p| p.exists().unwrap_or(false))
            .collect())
    }

    /// Modification time.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist.
    pub fn mtime(&self) -> Result<SystemTime> {
        Ok(self.stat()?.modified())
    }

    /// Size in bytes.
    ///
    /// # Errors
    ///
    /// Fails if the path does not exist.
    pub fn size(&self) -> Result<u64> {
        Ok(self.stat()?.size())
    }
}

fn has_magic(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

impl AsRef<PurePath> for BoundPath {
    fn as_ref(&self) -> &PurePath {
        &self.pure
    }
}

impl AsRef<PurePath> for PurePath {
    fn as_ref(&self) -> &PurePath {
        self
    }
}

// The filesystem handle is not part of a path's identity.
impl PartialEq for BoundPath {
    fn eq(&self, other: &Self) -> bool {
        self.pure == other.pure
    }
}

impl Eq for BoundPath {}

impl fmt::Debug for BoundPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundPath")
            .field("path", &self.pure.to_string())
            .field("flavor", &self.pure.flavor())
            .field("fs", &self.fs.name())
            .finish()
    }
}

impl fmt::Display for BoundPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.pure, f)
    }
}
