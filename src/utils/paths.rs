use std::path::Path;

/// Short name of a repository: the final component of its path.
///
/// Paths like `.` or `repo/..` have no usable final component, so they are
/// canonicalized first. Falls back to an empty string.
pub fn repo_name_from_path(path: &Path) -> String {
    let name_of = |p: &Path| {
        p.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| name != "." && name != "..")
    };

    name_of(path)
        .or_else(|| path.canonicalize().ok().as_deref().and_then(name_of))
        .unwrap_or_default()
}
