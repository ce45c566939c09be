use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Walks up the directory tree looking for a file called `name`.
pub fn find_manifest_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Finds `name` below `root`, preferring the match closest to `start`.
pub fn find_manifest_below(root: &Path, start: &Path, name: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .max_depth(8)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
        .filter(|path| !path.components().any(|c| c.as_os_str() == "node_modules"))
        .collect();

    candidates.sort_by_key(|path| {
        let parent = path.parent().unwrap_or(Path::new(""));
        path_distance(start, parent)
    });
    candidates.into_iter().next()
}

/// Looks upwards from `start` first, then searches below it.
pub fn locate_file(start: &Path, name: &str) -> Result<PathBuf, String> {
    find_manifest_upwards(start, name)
        .or_else(|| find_manifest_below(start, start, name))
        .ok_or_else(|| format!("could not locate {} from {}", name, start.display()))
}

/// Number of components separating `a` and `b` once their shared prefix is removed.
pub fn path_distance(a: &Path, b: &Path) -> usize {
    let shared = a
        .components()
        .zip(b.components())
        .take_while(|(left, right)| left == right)
        .count();
    a.components().count() + b.components().count() - 2 * shared
}
