// chain.rs
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, io, path::PathBuf};
use thiserror::Error;

/// Separator placed between the links of a rendered chain
pub const CHAIN_SEPARATOR: &str = " -> ";

/// Why a symlink was not resolved. None of these are reported to callers:
/// the walker logs them and moves on.
#[derive(Error, Debug)]
pub(crate) enum ResolveError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("link target is not valid UTF-8: {0:?}")]
    NotUtf8(PathBuf),

    #[error("more than {0} indirections")]
    OverBudget(usize),
}

/// One entry of a dereference chain
#[derive(Debug, Clone)]
pub struct Link {
    path: Utf8PathBuf,
    metadata: fs::Metadata,
}

impl Link {
    /// Directory containing this entry, as it was reached
    pub fn parent(&self) -> &Utf8Path {
        self.path.parent().unwrap_or_else(|| Utf8Path::new("."))
    }

    /// Entry name within `parent`
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// `lstat` metadata of the entry
    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }
}

/// A symlink followed through its indirections to a non-symlink entry
///
/// The first link is the entry the walker visited; each following link is
/// the target of the one before it, resolved against that link's parent
/// directory.
#[derive(Debug, Clone)]
pub struct Chain {
    links: Vec<Link>,
}

impl Chain {
    /// Follows `start` until a non-symlink is reached
    ///
    /// `limit` bounds the number of indirections (None for unlimited).
    /// Broken links and link loops fail up front through `fs::metadata`,
    /// which lets the kernel apply its own loop limit.
    pub(crate) fn resolve(start: &Utf8Path, limit: Option<usize>) -> Result<Chain, ResolveError> {
        let metadata = fs::symlink_metadata(start)?;
        fs::metadata(start)?;

        let mut links = vec![Link {
            path: start.to_path_buf(),
            metadata,
        }];

        loop {
            let last = &links[links.len() - 1];
            if !last.metadata.file_type().is_symlink() {
                break;
            }
            if let Some(limit) = limit {
                if links.len() > limit {
                    return Err(ResolveError::OverBudget(limit));
                }
            }

            let target = fs::read_link(&last.path)?;
            let target = Utf8PathBuf::from_path_buf(target).map_err(ResolveError::NotUtf8)?;
            let next = last.parent().join(target);
            let metadata = fs::symlink_metadata(&next)?;
            links.push(Link {
                path: next,
                metadata,
            });
        }

        Ok(Chain { links })
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of indirections taken to reach the terminal entry
    pub fn hops(&self) -> usize {
        self.links.len() - 1
    }

    /// The resolved, non-symlink entry
    pub fn terminal(&self) -> &Link {
        &self.links[self.links.len() - 1]
    }

    /// Joins the display form of every link
    ///
    /// Each link keeps the path it was reached by: a relative target is
    /// joined onto its link's parent without resolving the parent. A display
    /// function that folds `..` lexically can therefore name a different
    /// file than the one resolved when a directory in that parent is itself
    /// a symlink. Resolution always uses the unfolded path.
    pub fn render(&self, display: impl Fn(&Utf8Path) -> String) -> String {
        self.links
            .iter()
            .map(|l| display(&l.path))
            .collect::<Vec<_>>()
            .join(CHAIN_SEPARATOR)
    }

    /// Renders every link but the terminal one, followed by `tail`
    ///
    /// Used for results found below a symlinked directory, where `tail`
    /// already names the terminal directory as its prefix.
    pub fn render_onto(&self, tail: &str, display: impl Fn(&Utf8Path) -> String) -> String {
        let mut out = String::new();
        for link in &self.links[..self.links.len() - 1] {
            out.push_str(&display(&link.path));
            out.push_str(CHAIN_SEPARATOR);
        }
        out.push_str(tail);
        out
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    fn utf8(p: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(p.to_path_buf()).unwrap()
    }

    #[test]
    fn resolves_relative_targets_against_the_link_parent() {
        let tmp = tempdir().unwrap();
        let root = utf8(tmp.path());
        fs::write(root.join("real.txt"), b"").unwrap();
        symlink("real.txt", root.join("one")).unwrap();
        symlink("one", root.join("two")).unwrap();

        let chain = Chain::resolve(&root.join("two"), None).unwrap();
        assert_eq!(chain.hops(), 2);
        assert_eq!(chain.terminal().name(), "real.txt");
        assert!(chain.terminal().metadata().is_file());

        let rendered = chain.render(|p| p.file_name().unwrap_or_default().to_string());
        assert_eq!(rendered, "two -> one -> real.txt");
    }

    #[test]
    fn stops_at_the_limit() {
        let tmp = tempdir().unwrap();
        let root = utf8(tmp.path());
        fs::write(root.join("real.txt"), b"").unwrap();
        symlink("real.txt", root.join("one")).unwrap();
        symlink("one", root.join("two")).unwrap();

        assert!(Chain::resolve(&root.join("two"), Some(2)).is_ok());
        assert!(matches!(
            Chain::resolve(&root.join("two"), Some(1)),
            Err(ResolveError::OverBudget(1))
        ));
    }

    #[test]
    fn broken_and_looping_links_fail() {
        let tmp = tempdir().unwrap();
        let root = utf8(tmp.path());
        symlink("missing", root.join("broken")).unwrap();
        symlink("b", root.join("a")).unwrap();
        symlink("a", root.join("b")).unwrap();

        assert!(Chain::resolve(&root.join("broken"), None).is_err());
        assert!(Chain::resolve(&root.join("a"), None).is_err());
    }

    #[test]
    fn render_onto_replaces_the_terminal() {
        let tmp = tempdir().unwrap();
        let root = utf8(tmp.path());
        fs::create_dir(root.join("target")).unwrap();
        symlink("target", root.join("link")).unwrap();

        let chain = Chain::resolve(&root.join("link"), Some(1)).unwrap();
        let name = |p: &Utf8Path| p.file_name().unwrap_or_default().to_string();
        assert_eq!(chain.render_onto("target/d.txt", name), "link -> target/d.txt");
    }
}
