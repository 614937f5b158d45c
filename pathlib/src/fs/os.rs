//! The host filesystem, backed by `std::fs`.

use std::fs::{self, DirBuilder, FileTimes};
use std::io;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};

use super::{FileHandle, FileKind, FileSystem, Lstat, Metadata, OpenOptions, ReadLink, Symlink};

/// The host operating system's filesystem.
///
/// Supports every optional capability. Directory listings are sorted by name
/// so that traversals are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    /// Creates a handle to the host filesystem.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn convert(meta: &fs::Metadata) -> io::Result<Metadata> {
    let file_type = meta.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Dir
    } else if file_type.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };
    Ok(Metadata::new(kind, meta.len(), mode_of(meta), meta.modified()?))
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> u32 {
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

fn utf8_name(name: std::ffi::OsString) -> io::Result<String> {
    name.into_string().map_err(|raw| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("non UTF-8 entry name: {raw:?}"),
        )
    })
}

impl FileSystem for OsFs {
    fn name(&self) -> &str {
        "osfs"
    }

    fn stat(&self, path: &str) -> io::Result<Metadata> {
        convert(&fs::metadata(path)?)
    }

    fn open(&self, path: &str, options: &OpenOptions, mode: u32) -> io::Result<Box<dyn FileHandle>> {
        let mut std_options = fs::OpenOptions::new();
        std_options
            .read(options.is_read())
            .write(options.is_write())
            .append(options.is_append())
            .truncate(options.is_truncate())
            .create(options.is_create())
            .create_new(options.is_create_new());
        #[cfg(unix)]
        std_options.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;
        Ok(Box::new(std_options.open(path)?))
    }

    fn read_dir_names(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(path)?
            .map(|entry| entry.and_then(|e| utf8_name(e.file_name())))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn remove_all(&self, path: &str) -> io::Result<()> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(from, to)
    }

    #[cfg(unix)]
    fn chmod(&self, path: &str, mode: u32) -> io::Result<()> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn chmod(&self, path: &str, mode: u32) -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(mode & 0o200 == 0);
        fs::set_permissions(path, perms)
    }

    fn chtimes(&self, path: &str, accessed: SystemTime, modified: SystemTime) -> io::Result<()> {
        let times = FileTimes::new()
            .set_accessed(accessed)
            .set_modified(modified);
        fs::File::open(path)?.set_times(times)
    }

    fn mkdir(&self, path: &str, mode: u32) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn mkdir_all(&self, path: &str, mode: u32) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn as_lstat(&self) -> Option<&dyn Lstat> {
        Some(self)
    }

    fn as_read_link(&self) -> Option<&dyn ReadLink> {
        Some(self)
    }

    fn as_symlink(&self) -> Option<&dyn Symlink> {
        Some(self)
    }
}

impl Lstat for OsFs {
    fn lstat(&self, path: &str) -> io::Result<Metadata> {
        convert(&fs::symlink_metadata(path)?)
    }
}

impl ReadLink for OsFs {
    fn read_link(&self, path: &str) -> io::Result<String> {
        utf8_name(fs::read_link(path)?.into_os_string())
    }
}

impl Symlink for OsFs {
    #[cfg(unix)]
    fn symlink(&self, target: &str, link: &str) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn symlink(&self, target: &str, link: &str) -> io::Result<()> {
        let link_path = std::path::Path::new(link);
        let resolved = link_path
            .parent()
            .map_or_else(|| target.into(), |dir| dir.join(target));
        if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn symlink(&self, _target: &str, _link: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn join(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_dir_names_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["c", "a", "b"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let names = OsFs.read_dir_names(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_open_create_write_read() {
        let dir = TempDir::new().unwrap();
        let path = join(&dir, "f.txt");
        let mut handle = OsFs
            .open(&path, &OpenOptions::write_truncate(), 0o644)
            .unwrap();
        handle.write_all(b"hello").unwrap();
        drop(handle);

        let mut handle = OsFs.open(&path, &OpenOptions::read_only(), 0).unwrap();
        let mut buf = String::new();
        handle.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
        assert_eq!(OsFs.stat(&path).unwrap().size(), 5);
    }

    #[test]
    fn test_remove_all_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(OsFs.remove_all(&join(&dir, "missing")).is_ok());
    }

    #[test]
    fn test_remove_refuses_non_empty_dir() {
        let dir = TempDir::new().unwrap();
        let sub = join(&dir, "sub");
        OsFs.mkdir(&sub, 0o755).unwrap();
        fs::write(dir.path().join("sub").join("f"), b"x").unwrap();
        assert!(OsFs.remove(&sub).is_err());
        OsFs.remove_all(&sub).unwrap();
        assert!(OsFs.stat(&sub).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_and_lstat() {
        let dir = TempDir::new().unwrap();
        let target = join(&dir, "target");
        let link = join(&dir, "link");
        fs::write(&target, b"x").unwrap();
        OsFs.symlink(&target, &link).unwrap();

        assert_eq!(OsFs.lstat(&link).unwrap().kind(), FileKind::Symlink);
        assert_eq!(OsFs.stat(&link).unwrap().kind(), FileKind::File);
        assert_eq!(OsFs.read_link(&link).unwrap(), target);
    }

    #[cfg(unix)]
    #[test]
    fn test_chmod_and_mkdir_mode() {
        let dir = TempDir::new().unwrap();
        let sub = join(&dir, "sub");
        OsFs.mkdir(&sub, 0o700).unwrap();
        OsFs.chmod(&sub, 0o750).unwrap();
        assert_eq!(OsFs.stat(&sub).unwrap().mode(), 0o750);
    }

    #[test]
    fn test_chtimes_sets_modified() {
        let dir = TempDir::new().unwrap();
        let path = join(&dir, "f");
        fs::write(&path, b"x").unwrap();
        let when = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        OsFs.chtimes(&path, when, when).unwrap();
        assert_eq!(OsFs.stat(&path).unwrap().modified(), when);
    }
}
