//! An in-memory filesystem.
//!
//! Entries live in a sorted map keyed by their cleaned POSIX path, so `a/b`,
//! `/a/b` and `/a/./b/` all address the same entry. Relative paths are taken
//! relative to `/`. There is no link support: the optional capabilities all
//! report unsupported.

use std::collections::BTreeMap;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

use super::{FileHandle, FileKind, FileSystem, Metadata, OpenOptions};
use crate::path::PurePath;

const ROOT: &str = "/";

type Contents = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Clone)]
enum Node {
    Dir {
        mode: u32,
        modified: SystemTime,
    },
    File {
        data: Contents,
        mode: u32,
        modified: SystemTime,
    },
}

impl Node {
    fn metadata(&self) -> io::Result<Metadata> {
        Ok(match self {
            Self::Dir { mode, modified } => Metadata::new(FileKind::Dir, 0, *mode, *modified),
            Self::File {
                data,
                mode,
                modified,
            } => {
                let len = data.lock().map_err(poisoned)?.len() as u64;
                Metadata::new(FileKind::File, len, *mode, *modified)
            }
        })
    }

    fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }
}

/// An in-memory filesystem with the required primitives only.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pathlib::{BoundPath, MemFs};
///
/// let fs = Arc::new(MemFs::new());
/// let file = BoundPath::new(fs, ["/notes.txt"]);
/// file.write_file(b"hi").unwrap();
/// assert_eq!(file.read_file().unwrap(), b"hi");
/// ```
#[derive(Debug)]
pub struct MemFs {
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    /// Creates a filesystem containing only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ROOT.to_string(),
            Node::Dir {
                mode: 0o755,
                modified: SystemTime::now(),
            },
        );
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    fn read(&self) -> io::Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Node>>> {
        self.nodes.read().map_err(poisoned)
    }

    fn write(&self) -> io::Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Node>>> {
        self.nodes.write().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, "memfs lock poisoned")
}

fn key(path: &str) -> String {
    PurePath::posix([ROOT, path]).clean().to_string()
}

fn parent_key(key: &str) -> Option<String> {
    if key == ROOT {
        return None;
    }
    match key.rfind('/') {
        Some(0) => Some(ROOT.to_string()),
        Some(i) => Some(key[..i].to_string()),
        None => None,
    }
}

fn is_below(candidate: &str, dir: &str) -> bool {
    if dir == ROOT {
        return candidate != ROOT;
    }
    candidate
        .strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path}: no such file or directory"))
}

fn not_a_dir(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{path}: not a directory"))
}

fn require_dir(nodes: &BTreeMap<String, Node>, key: &str) -> io::Result<()> {
    match nodes.get(key) {
        Some(node) if node.is_dir() => Ok(()),
        Some(_) => Err(not_a_dir(key)),
        None => Err(not_found(key)),
    }
}

fn require_parent(nodes: &BTreeMap<String, Node>, key: &str) -> io::Result<()> {
    match parent_key(key) {
        Some(parent) => require_dir(nodes, &parent),
        None => Ok(()),
    }
}

impl FileSystem for MemFs {
    fn name(&self) -> &str {
        "memfs"
    }

    fn stat(&self, path: &str) -> io::Result<Metadata> {
        let key = key(path);
        self.read()?
            .get(&key)
            .ok_or_else(|| not_found(path))?
            .metadata()
    }

    fn open(&self, path: &str, options: &OpenOptions, mode: u32) -> io::Result<Box<dyn FileHandle>> {
        let key = key(path);
        let mut nodes = self.write()?;

        let data = match nodes.get(&key) {
            Some(_) if options.is_create_new() => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{path}: file exists"),
                ));
            }
            Some(Node::Dir { .. }) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{path}: is a directory"),
                ));
            }
            Some(Node::File { data, .. }) => {
                let data = Arc::clone(data);
                if options.is_truncate() && options.is_write() {
                    data.lock().map_err(poisoned)?.clear();
                }
                data
            }
            None if options.is_create() || options.is_create_new() => {
                require_parent(&nodes, &key)?;
                let data = Contents::default();
                nodes.insert(
                    key,
                    Node::File {
                        data: Arc::clone(&data),
                        mode,
                        modified: SystemTime::now(),
                    },
                );
                data
            }
            None => return Err(not_found(path)),
        };

        Ok(Box::new(MemFile {
            data,
            position: 0,
            readable: options.is_read(),
            writable: options.is_write(),
            append: options.is_append(),
        }))
    }

    fn read_dir_names(&self, path: &str) -> io::Result<Vec<String>> {
        let dir = key(path);
        let nodes = self.read()?;
        require_dir(&nodes, &dir)?;
        Ok(nodes
            .keys()
            .filter(|k| parent_key(k).as_deref() == Some(dir.as_str()))
            .filter_map(|k| k.rsplit('/').next().map(str::to_string))
            .collect())
    }

    fn remove(&self, path: &str) -> io::Result<()> {
        let key = key(path);
        if key == ROOT {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot remove the root directory",
            ));
        }
        let mut nodes = self.write()?;
        if !nodes.contains_key(&key) {
            return Err(not_found(path));
        }
        if nodes.keys().any(|k| is_below(k, &key)) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{path}: directory not empty"),
            ));
        }
        nodes.remove(&key);
        Ok(())
    }

    fn remove_all(&self, path: &str) -> io::Result<()> {
        let key = key(path);
        let mut nodes = self.write()?;
        nodes.retain(|k, _| !is_below(k, &key) && (k != &key || k == ROOT));
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        let from_key = key(from);
        let to_key = key(to);
        if from_key == to_key {
            return Ok(());
        }
        if from_key == ROOT || is_below(&to_key, &from_key) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move {from} into itself"),
            ));
        }

        let mut nodes = self.write()?;
        let node = nodes.get(&from_key).cloned().ok_or_else(|| not_found(from))?;
        require_parent(&nodes, &to_key)?;
        match nodes.get(&to_key) {
            Some(existing) if existing.is_dir() != node.is_dir() => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{to}: cannot replace entry of a different kind"),
                ));
            }
            Some(_) if nodes.keys().any(|k| is_below(k, &to_key)) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{to}: directory not empty"),
                ));
            }
            _ => {}
        }

        let moved: Vec<String> = nodes
            .keys()
            .filter(|k| is_below(k, &from_key))
            .cloned()
            .collect();
        nodes.remove(&from_key);
        nodes.insert(to_key.clone(), node);
        for old in moved {
            if let Some(child) = nodes.remove(&old) {
                let new = format!("{to_key}{}", &old[from_key.len()..]);
                nodes.insert(new, child);
            }
        }
        Ok(())
    }

    fn chmod(&self, path: &str, new_mode: u32) -> io::Result<()> {
        let key = key(path);
        match self.write()?.get_mut(&key) {
            Some(Node::Dir { mode, .. } | Node::File { mode, .. }) => {
                *mode = new_mode;
                Ok(())
            }
            None => Err(not_found(path)),
        }
    }

    fn chtimes(&self, path: &str, _accessed: SystemTime, new_modified: SystemTime) -> io::Result<()> {
        let key = key(path);
        match self.write()?.get_mut(&key) {
            Some(Node::Dir { modified, .. } | Node::File { modified, .. }) => {
                *modified = new_modified;
                Ok(())
            }
            None => Err(not_found(path)),
        }
    }

    fn mkdir(&self, path: &str, mode: u32) -> io::Result<()> {
        let key = key(path);
        let mut nodes = self.write()?;
        if nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{path}: file exists"),
            ));
        }
        require_parent(&nodes, &key)?;
        nodes.insert(
            key,
            Node::Dir {
                mode,
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn mkdir_all(&self, path: &str, mode: u32) -> io::Result<()> {
        let key = key(path);
        let mut nodes = self.write()?;

        let mut missing = Vec::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            match nodes.get(&current) {
                Some(node) if node.is_dir() => break,
                Some(_) => return Err(not_a_dir(&current)),
                None => {
                    cursor = parent_key(&current);
                    missing.push(current);
                }
            }
        }
        for dir in missing.into_iter().rev() {
            nodes.insert(
                dir,
                Node::Dir {
                    mode,
                    modified: SystemTime::now(),
                },
            );
        }
        Ok(())
    }
}

#[derive(Debug)]
struct MemFile {
    data: Contents,
    position: u64,
    readable: bool,
    writable: bool,
    append: bool,
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.readable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file not opened for reading",
            ));
        }
        let data = self.data.lock().map_err(poisoned)?;
        let start = usize::try_from(self.position).unwrap_or(usize::MAX).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file not opened for writing",
            ));
        }
        let mut data = self.data.lock().map_err(poisoned)?;
        if self.append {
            self.position = data.len() as u64;
        }
        let start = usize::try_from(self.position)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "position out of range"))?;
        let end = start + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        self.position = end as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.lock().map_err(poisoned)?.len() as u64;
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative position",
            )),
        }
    }
}
