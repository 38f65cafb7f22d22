// paths.rs
use crate::error::SearchError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Returns the shortest lexically equivalent form of `path`
///
/// `.` segments and redundant separators are dropped and `..` removes the
/// preceding normal segment. A `..` directly under the filesystem root is
/// dropped; leading `..` of a relative path is kept. An empty result becomes
/// `.`. No filesystem access is performed.
pub fn clean(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for c in path.components() {
        match c {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir) => {}
                _ => parts.push(c),
            },
            _ => parts.push(c),
        }
    }
    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().map(|c| c.as_str()).collect()
}

/// Checks that `root` can be used as a search root
///
/// # Errors
///
/// Returns `SearchError::InvalidPath` if `root` is empty or contains a NUL
/// byte, neither of which any platform accepts in a path.
pub fn validate_root(root: &str) -> Result<(), SearchError> {
    if root.is_empty() || root.contains('\0') {
        return Err(SearchError::InvalidPath(root.to_string()));
    }
    Ok(())
}

/// Splits a platform path list (`:` on Unix, `;` on Windows) into roots
///
/// Empty elements are skipped and every remaining element is validated.
pub fn split_path_list(list: &str) -> Result<Vec<String>, SearchError> {
    let mut roots = Vec::new();
    for p in std::env::split_paths(list) {
        let p = Utf8PathBuf::from_path_buf(p)
            .map_err(|p| SearchError::InvalidPath(p.to_string_lossy().into_owned()))?;
        if p.as_str().is_empty() {
            continue;
        }
        validate_root(p.as_str())?;
        roots.push(p.into_string());
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_drops_dots_and_separators() {
        assert_eq!(clean(Utf8Path::new("a//b/./c/")), "a/b/c");
        assert_eq!(clean(Utf8Path::new("./a")), "a");
        assert_eq!(clean(Utf8Path::new(".")), ".");
        assert_eq!(clean(Utf8Path::new("")), ".");
    }

    #[test]
    fn clean_folds_parent_segments() {
        assert_eq!(clean(Utf8Path::new("a/b/../c")), "a/c");
        assert_eq!(clean(Utf8Path::new("a/..")), ".");
        assert_eq!(clean(Utf8Path::new("../a")), "../a");
        assert_eq!(clean(Utf8Path::new("../../a")), "../../a");
    }

    #[cfg(unix)]
    #[test]
    fn clean_keeps_absolute_roots() {
        assert_eq!(clean(Utf8Path::new("/../a")), "/a");
        assert_eq!(clean(Utf8Path::new("/")), "/");
        assert_eq!(clean(Utf8Path::new("/usr//bin/")), "/usr/bin");
    }

    #[test]
    fn rejects_empty_and_nul() {
        assert!(matches!(validate_root(""), Err(SearchError::InvalidPath(_))));
        assert!(matches!(
            validate_root("bad\0path"),
            Err(SearchError::InvalidPath(_))
        ));
        assert!(validate_root("usr/bin").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn splits_path_lists() {
        let roots = split_path_list("/usr/bin::/bin").unwrap();
        assert_eq!(roots, vec!["/usr/bin".to_string(), "/bin".to_string()]);
    }
}
