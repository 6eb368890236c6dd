use std::collections::{HashSet, VecDeque};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata of `path` without following symlinks; `None` when access is
/// denied.
fn metadata_or_skip(path: &Path) -> anyhow::Result<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(m) => Ok(Some(m)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "Permission denied");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn entries_or_skip(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %dir.display(), "Permission denied");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Ok(e) => out.push(e.path()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %dir.display(), "Permission denied");
            }
            Err(e) => return Err(e.into()),
        }
    }
    // Deterministic discovery order.
    out.sort();
    Ok(out)
}

/// Breadth-first walk calling `callback` for every regular file under
/// `path` (or `path` itself when it is a file). Symlinks are skipped.
pub fn visit<F, C>(path: &Path, excludes: &F, callback: &mut C) -> anyhow::Result<()>
where
    F: Fn(&Path) -> bool,
    C: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut pending: VecDeque<PathBuf> = VecDeque::from([path.to_path_buf()]);
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) || excludes(&current) {
            continue;
        }
        let Some(metadata) = metadata_or_skip(&current)? else {
            continue;
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
        } else if file_type.is_file() {
            callback(&current)?;
        } else if file_type.is_dir() {
            debug!(path = %current.display(), "Entering directory");
            pending.extend(entries_or_skip(&current)?);
        }
    }
    Ok(())
}

/// Collects files under `path` whose extension is one of `extensions`.
pub fn collect_files(path: &Path, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let hidden = |p: &Path| {
        p != path
            && p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
    };
    visit(path, &hidden, &mut |p| {
        let matches = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        if matches {
            files.push(p.to_path_buf());
        }
        Ok(())
    })?;
    Ok(files)
}
