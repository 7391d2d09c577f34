//! Sticker catalog bound to a directory on disk
//!
//! Every regular file with an extension under the root is one sticker. The
//! catalog is flat: a nested file `a/b.png` is named `a-b`. Names are kept
//! free of containment conflicts on every incremental mutation so that a
//! substring typed by a user can always be narrowed to a single sticker.
//!
//! The catalog does no locking itself. Share it through
//! [`super::StickerManager`] and hold the read or write guard for the whole
//! read-then-act sequence.

use std::io::Write;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use rand::seq::IndexedRandom;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::hint::{self, ConflictingNames};
use super::index::{Sticker, StickerIndex};
use super::source::{BodyTooLarge, ContentKind, Fetcher, DEFAULT_SIZE_LIMIT};
use crate::{Result, StickerError};

/// Replaces path separators when nested files are named
pub const NAME_JOINER: &str = "-";

/// Entries listed in a description before it is cut short
const MAX_DESCRIBED: usize = 10;

/// Catalog behaviour knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// When false, names and patterns are folded to lower case
    pub case_sensitive: bool,
    /// Largest accepted payload for a new sticker, in bytes
    pub size_limit: u64,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_size_limit(mut self, size_limit: u64) -> Self {
        self.size_limit = size_limit;
        self
    }
}

/// The in-memory view of every sticker under a root directory
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
    options: CatalogOptions,
    index: StickerIndex,
}

impl Catalog {
    /// Scan `root` and build the catalog.
    ///
    /// Fails when the root is not a directory, cannot be walked, or when two
    /// files map to the same name.
    pub fn load(root: impl AsRef<Path>, options: CatalogOptions) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let index = scan(&root, options.case_sensitive)?;
        info!("Loaded {} stickers from {:?}", index.len(), root);
        Ok(Self {
            root,
            options,
            index,
        })
    }

    /// Rescan the root. On failure the current entries are kept.
    pub fn reload(&mut self) -> Result<()> {
        let index = scan(&self.root, self.options.case_sensitive)?;
        info!(
            "Reloaded stickers from {:?}: {} -> {}",
            self.root,
            self.index.len(),
            index.len()
        );
        self.index = index;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// All stickers in name order
    pub fn entries(&self) -> &[Sticker] {
        self.index.snapshot()
    }

    pub fn get(&self, name: &str) -> Option<&Sticker> {
        self.index.get(&self.fold(name))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn fold(&self, s: &str) -> String {
        if self.options.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }

    /// Stickers matching any of the pattern groups.
    ///
    /// A sticker matches a group when every pattern of the group is a
    /// substring of its name. Empty groups are ignored; when no non-empty
    /// group remains every sticker is returned.
    pub fn matched<G, S>(&self, groups: &[G]) -> Vec<&Sticker>
    where
        G: AsRef<[S]>,
        S: AsRef<str>,
    {
        let groups: Vec<Vec<String>> = groups
            .iter()
            .filter_map(|g| {
                let g: &[S] = g.as_ref();
                (!g.is_empty()).then(|| g.iter().map(|p| self.fold(p.as_ref())).collect())
            })
            .collect();

        let entries = self.index.snapshot().iter();
        if groups.is_empty() {
            return entries.collect();
        }

        entries
            .filter(|s| {
                groups
                    .iter()
                    .any(|g| g.iter().all(|p| s.name().contains(p.as_str())))
            })
            .collect()
    }

    /// Stickers whose names are substrings of `name`
    pub fn contained_by(&self, name: &str) -> Vec<&Sticker> {
        let name = self.fold(name);
        self.index
            .snapshot()
            .iter()
            .filter(|s| name.contains(s.name()))
            .collect()
    }

    /// The one sticker matching all `patterns`.
    pub fn resolve<S: AsRef<str>>(&self, patterns: &[S]) -> Result<&Sticker> {
        match self.matched(&[patterns]).as_slice() {
            [] => Err(StickerError::NotFound),
            [only] => Ok(*only),
            many => Err(StickerError::Ambiguous(self.describe(many))),
        }
    }

    /// A uniformly random sticker among the matches
    pub fn random<G, S>(&self, groups: &[G]) -> Option<&Sticker>
    where
        G: AsRef<[S]>,
        S: AsRef<str>,
    {
        self.matched(groups).choose(&mut rand::rng()).copied()
    }

    /// Hint lengths aligned with [`Catalog::entries`]
    pub fn hint_lengths(&self) -> std::result::Result<Vec<usize>, ConflictingNames> {
        let names: Vec<&str> = self.index.snapshot().iter().map(Sticker::name).collect();
        hint::unique_prefix_lengths(&names)
    }

    /// Names rendered with their hints, e.g. `app[le]`.
    ///
    /// Plain names are returned while the catalog holds a prefix conflict,
    /// since no hint can separate those.
    pub fn hinted_names(&self, stickers: &[&Sticker]) -> Vec<String> {
        let hints = self.hint_lengths().ok();
        stickers
            .iter()
            .map(|s| match (&hints, self.index.find(s.name())) {
                (Some(hints), Ok(i)) => hint::with_hint(s.name(), hints[i]),
                _ => s.name().to_string(),
            })
            .collect()
    }

    /// Render stickers for a message: hinted names in back quotes, cut
    /// short after ten entries.
    pub fn describe(&self, stickers: &[&Sticker]) -> String {
        let shown = &stickers[..stickers.len().min(MAX_DESCRIBED)];
        let mut out = format!("`{}`", self.hinted_names(shown).join("`, `"));
        if stickers.len() > MAX_DESCRIBED {
            out.push_str("... and more");
        }
        out
    }

    /// Check `name` for a new or renamed sticker and return its folded form.
    ///
    /// `renaming` names the sticker being renamed, which never conflicts
    /// with itself.
    fn validate_new_name(&self, name: &str, renaming: Option<&str>) -> Result<String> {
        if name.is_empty() {
            return Err(StickerError::EmptyName);
        }
        if name.contains('/') || name.contains(MAIN_SEPARATOR) {
            return Err(StickerError::InvalidName(MAIN_SEPARATOR));
        }
        // The name must come back unchanged from a scan of its own file,
        // which rules out `.` and `..`. Any extension gives the same stem.
        let stored = self.root.join(format!("{}.{}", name, ContentKind::Text.extension()));
        if derive_name(&self.root, &stored, self.options.case_sensitive) != Some(self.fold(name)) {
            return Err(StickerError::ReservedName(name.to_string()));
        }

        let is_other = |s: &&Sticker| Some(s.name()) != renaming;

        let containing: Vec<&Sticker> = self
            .matched(&[[name]])
            .into_iter()
            .filter(is_other)
            .collect();
        if !containing.is_empty() {
            return Err(StickerError::ContainedBy(self.describe(&containing)));
        }

        let contained: Vec<&Sticker> = self
            .contained_by(name)
            .into_iter()
            .filter(is_other)
            .collect();
        if !contained.is_empty() {
            return Err(StickerError::Contains(self.describe(&contained)));
        }

        Ok(self.fold(name))
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.options.size_limit {
            return Err(StickerError::TooLarge {
                limit: self.options.size_limit,
                actual: size,
            });
        }
        Ok(())
    }

    /// Download the image at `url` and add it as sticker `name`.
    ///
    /// The source is probed first; wrong content types and oversized
    /// payloads are rejected before anything is written.
    pub async fn add_sticker(
        &mut self,
        name: &str,
        url: &str,
        fetcher: &dyn Fetcher,
    ) -> Result<Sticker> {
        let folded = self.validate_new_name(name, None)?;

        let probe = fetcher.probe(url).await.map_err(|e| {
            warn!("Failed to probe {:?}: {:#}", url, e);
            StickerError::FetchFailed
        })?;

        let kind = probe
            .content_type
            .as_deref()
            .and_then(ContentKind::from_mime)
            .filter(ContentKind::is_image)
            .ok_or_else(|| StickerError::UnsupportedContentType(probe.content_type.clone()))?;

        let size = probe
            .content_length
            .ok_or(StickerError::InvalidContentLength)?;
        self.check_size(size)?;

        let limit = self.options.size_limit;
        let bytes = fetcher.fetch(url, limit).await.map_err(|e| {
            if let Some(too_large) = e.downcast_ref::<BodyTooLarge>() {
                warn!("Download of {:?} outgrew its Content-Length: {}", url, too_large);
                return StickerError::TooLarge {
                    limit: too_large.limit,
                    actual: too_large.received,
                };
            }
            error!("Failed to download {:?}: {:#}", url, e);
            StickerError::Internal
        })?;
        self.check_size(bytes.len() as u64)?;

        let sticker = self.commit_file(name, folded, kind, &bytes)?;
        info!("Added sticker {:?} from {:?}", sticker.name(), url);
        Ok(sticker)
    }

    /// Add a plain-text sticker
    pub fn add_text(&mut self, name: &str, text: &str) -> Result<Sticker> {
        let folded = self.validate_new_name(name, None)?;
        if text.trim().is_empty() {
            return Err(StickerError::EmptyText);
        }
        self.check_size(text.len() as u64)?;

        let sticker = self.commit_file(name, folded, ContentKind::Text, text.as_bytes())?;
        info!("Added text sticker {:?}", sticker.name());
        Ok(sticker)
    }

    /// Write `bytes` to `<root>/<name>.<ext>` and index the new sticker.
    ///
    /// The file is staged in the root and moved into place without
    /// replacing anything already there; a failure at any step leaves no
    /// file behind.
    fn commit_file(
        &mut self,
        name: &str,
        folded: String,
        kind: ContentKind,
        bytes: &[u8],
    ) -> Result<Sticker> {
        let path = self.root.join(format!("{}.{}", name, kind.extension()));

        let mut staged =
            tempfile::NamedTempFile::new_in(&self.root).map_err(internal("Failed to create a new file"))?;
        staged
            .write_all(bytes)
            .map_err(internal("Failed to write the sticker"))?;
        staged.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                StickerError::Occupied
            } else {
                error!("Failed to move the sticker into place: {}", e.error);
                StickerError::Internal
            }
        })?;

        let sticker = Sticker::new(folded, path);
        if !self.index.insert(sticker.clone()) {
            error!(
                "Sticker {:?} appeared in the index after validation",
                sticker.name()
            );
            if let Err(e) = std::fs::remove_file(sticker.path()) {
                error!("Failed to remove {:?} while rolling back: {}", sticker.path(), e);
            }
            return Err(StickerError::Internal);
        }
        Ok(sticker)
    }

    /// Rename the one sticker matching `src` to `dst`.
    ///
    /// The backing file moves to `<root>/<dst>.<ext>`, so a sticker from a
    /// nested directory lands directly under the root.
    pub fn rename_sticker(&mut self, src: &str, dst: &str) -> Result<Sticker> {
        if src.is_empty() {
            return Err(StickerError::NotFound);
        }
        let source = self.resolve(&[src])?.clone();
        let folded = self.validate_new_name(dst, Some(source.name()))?;

        let dst_path = self.root.join(format!("{}.{}", dst, source.ext()));
        if dst_path != source.path() && dst_path.exists() {
            return Err(StickerError::Occupied);
        }

        std::fs::rename(source.path(), &dst_path).map_err(internal("Failed to move the sticker"))?;

        let renamed = Sticker::new(folded, dst_path);
        self.index.remove(source.name());
        if !self.index.insert(renamed.clone()) {
            error!(
                "Sticker {:?} appeared in the index after validation",
                renamed.name()
            );
            if let Err(e) = std::fs::rename(renamed.path(), source.path()) {
                error!("Failed to move the sticker back: {}", e);
            }
            self.index.insert(source);
            return Err(StickerError::Internal);
        }

        info!("Renamed sticker {:?} -> {:?}", source.name(), renamed.name());
        Ok(renamed)
    }
}

/// Log an IO failure and collapse it into [`StickerError::Internal`]
fn internal(context: &'static str) -> impl FnOnce(std::io::Error) -> StickerError {
    move |e| {
        error!("{}: {}", context, e);
        StickerError::Internal
    }
}

/// Catalog name for a file: the path relative to the root, extension
/// dropped, separators replaced by [`NAME_JOINER`].
fn derive_name(root: &Path, path: &Path, case_sensitive: bool) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }

    let name = parts.join(NAME_JOINER);
    Some(if case_sensitive {
        name
    } else {
        name.to_lowercase()
    })
}

fn scan(root: &Path, case_sensitive: bool) -> Result<StickerIndex> {
    if !root.is_dir() {
        return Err(StickerError::RootNotDirectory(root.to_path_buf()));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            debug!("Descending into directory {:?}", path);
            continue;
        }
        if !path.is_file() {
            debug!("Skipping non-regular file {:?}", path);
            continue;
        }
        if path.extension().map_or(true, |e| e.is_empty()) {
            warn!("Found a file without extension, skipped, path={:?}", path);
            continue;
        }

        match derive_name(root, path, case_sensitive) {
            Some(name) => found.push(Sticker::new(name, path)),
            None => warn!("Cannot derive a sticker name, skipped, path={:?}", path),
        }
    }

    found.sort_by(|a, b| a.name().cmp(b.name()));
    if let Some(pair) = found.windows(2).find(|w| w[0].name() == w[1].name()) {
        return Err(StickerError::DuplicateName {
            name: pair[0].name().to_string(),
            first: pair[0].path().to_path_buf(),
            second: pair[1].path().to_path_buf(),
        });
    }

    let names: Vec<&str> = found.iter().map(Sticker::name).collect();
    for (outer, inner) in hint::contained_pairs(&names) {
        warn!(
            "Found sticker {:?} contains {:?}",
            found[outer].path(),
            found[inner].path()
        );
    }

    Ok(StickerIndex::from_unsorted(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::source::{append_limited, Probe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct CannedFetcher {
        content_type: &'static str,
        body: Vec<u8>,
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn probe(&self, _url: &str) -> anyhow::Result<Probe> {
            Ok(Probe {
                content_type: Some(self.content_type.to_string()),
                content_length: Some(self.body.len() as u64),
            })
        }

        async fn fetch(&self, _url: &str, limit: u64) -> anyhow::Result<Vec<u8>> {
            let mut body = Vec::new();
            append_limited(&mut body, &self.body, limit)?;
            Ok(body)
        }
    }

    /// Claims a tiny body on HEAD, then streams chunks without end
    struct EndlessFetcher {
        chunks_sent: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for EndlessFetcher {
        async fn probe(&self, _url: &str) -> anyhow::Result<Probe> {
            Ok(Probe {
                content_type: Some("image/gif".to_string()),
                content_length: Some(10),
            })
        }

        async fn fetch(&self, _url: &str, limit: u64) -> anyhow::Result<Vec<u8>> {
            let mut body = Vec::new();
            loop {
                self.chunks_sent.fetch_add(1, Ordering::SeqCst);
                append_limited(&mut body, &[0; 1024], limit)?;
            }
        }
    }

    fn png() -> CannedFetcher {
        CannedFetcher {
            content_type: "image/png",
            body: b"\x89PNG fake".to_vec(),
        }
    }

    fn catalog_with(files: &[&str]) -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, b"data").unwrap();
        }
        let catalog = Catalog::load(dir.path(), CatalogOptions::default()).unwrap();
        (dir, catalog)
    }

    fn names(stickers: &[&Sticker]) -> Vec<String> {
        stickers.iter().map(|s| s.name().to_string()).collect()
    }

    fn listing(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_load_flattens_nested_names() {
        let (_dir, catalog) = catalog_with(&["cat.png", "Animals/Dog.gif", "a/b/c.jpeg", "README"]);
        let all: Vec<&str> = catalog.entries().iter().map(Sticker::name).collect();
        assert_eq!(all, vec!["a-b-c", "animals-dog", "cat"]);
    }

    #[test]
    fn test_load_keeps_case_when_sensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cat.png"), b"x").unwrap();
        let catalog =
            Catalog::load(dir.path(), CatalogOptions::new().with_case_sensitive(true)).unwrap();
        assert_eq!(catalog.entries()[0].name(), "Cat");
        assert!(catalog.matched(&[["cat"]]).is_empty());
        assert_eq!(catalog.matched(&[["Ca"]]).len(), 1);
    }

    #[test]
    fn test_load_rejects_colliding_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a-b.png"), b"x").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("b.gif"), b"x").unwrap();

        let err = Catalog::load(dir.path(), CatalogOptions::default()).unwrap_err();
        match err {
            StickerError::DuplicateName { name, .. } => assert_eq!(name, "a-b"),
            other => panic!("Expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn test_load_tolerates_containment() {
        let (_dir, catalog) = catalog_with(&["cat.png", "bobcat.png"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.png");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            Catalog::load(&file, CatalogOptions::default()),
            Err(StickerError::RootNotDirectory(_))
        ));
    }

    #[test]
    fn test_matched_pattern_groups() {
        let (_dir, catalog) = catalog_with(&["cat.png", "dog.png", "bird.png", "catdog.png"]);

        let none: [Vec<String>; 0] = [];
        assert_eq!(catalog.matched(&none).len(), 4);
        assert_eq!(catalog.matched(&[Vec::<String>::new()]).len(), 4);

        assert_eq!(names(&catalog.matched(&[["c"], ["b"]])), vec!["bird", "cat", "catdog"]);
        assert_eq!(names(&catalog.matched(&[["cat", "dog"]])), vec!["catdog"]);
        assert_eq!(names(&catalog.matched(&[["DOG"]])), vec!["catdog", "dog"]);
    }

    #[test]
    fn test_contained_by() {
        let (_dir, catalog) = catalog_with(&["cat.png", "dog.png", "bird.png"]);
        assert_eq!(names(&catalog.contained_by("hotdog-and-cat")), vec!["cat", "dog"]);
        assert!(catalog.contained_by("ca").is_empty());
    }

    #[test]
    fn test_resolve() {
        let (_dir, catalog) = catalog_with(&["cat.png", "car.png", "dog.png"]);
        assert_eq!(catalog.resolve(&["d"]).unwrap().name(), "dog");
        assert!(matches!(catalog.resolve(&["x"]), Err(StickerError::NotFound)));
        match catalog.resolve(&["ca"]) {
            Err(StickerError::Ambiguous(list)) => assert_eq!(list, "`car`, `cat`"),
            other => panic!("Expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_uses_hints_and_truncates() {
        let (_dir, catalog) = catalog_with(&["apple.png", "apricot.png", "banana.png"]);
        let all: Vec<&Sticker> = catalog.entries().iter().collect();
        assert_eq!(catalog.describe(&all), "`app[le]`, `apr[icot]`, `b[anana]`");

        let files: Vec<String> = (0..12).map(|i| format!("{}x.png", (b'a' + i) as char)).collect();
        let files: Vec<&str> = files.iter().map(String::as_str).collect();
        let (_dir, catalog) = catalog_with(&files);
        let all: Vec<&Sticker> = catalog.entries().iter().collect();
        assert!(catalog.describe(&all).ends_with("`... and more"));
    }

    #[test]
    fn test_random_picks_a_match() {
        let (_dir, catalog) = catalog_with(&["cat.png", "dog.png"]);
        assert_eq!(catalog.random(&[["do"]]).unwrap().name(), "dog");
        assert!(catalog.random(&[["zzz"]]).is_none());
    }

    #[tokio::test]
    async fn test_add_sticker_writes_and_indexes() {
        let (dir, mut catalog) = catalog_with(&["cat.png", "dog.png"]);
        let added = catalog.add_sticker("Fox", "https://example.test/fox", &png()).await.unwrap();

        assert_eq!(added.name(), "fox");
        assert_eq!(added.path(), dir.path().join("Fox.png"));
        assert_eq!(fs::read(added.path()).unwrap(), b"\x89PNG fake");
        assert_eq!(names(&catalog.matched(&[["fox"]])), vec!["fox"]);
    }

    #[tokio::test]
    async fn test_add_sticker_rejects_bad_names() {
        let (dir, mut catalog) = catalog_with(&["cat.png", "dog.png"]);

        assert!(matches!(
            catalog.add_sticker("a/b", "u", &png()).await,
            Err(StickerError::InvalidName(_))
        ));
        assert!(matches!(
            catalog.add_sticker("", "u", &png()).await,
            Err(StickerError::EmptyName)
        ));
        assert!(matches!(
            catalog.add_sticker("ca", "u", &png()).await,
            Err(StickerError::ContainedBy(_))
        ));
        assert!(matches!(
            catalog.add_sticker("hotdog", "u", &png()).await,
            Err(StickerError::Contains(_))
        ));
        assert_eq!(catalog.len(), 2);
        assert_eq!(listing(dir.path()), vec!["cat.png", "dog.png"]);
    }

    #[test]
    fn test_dot_names_are_rejected_and_survive_reload() {
        let (dir, mut catalog) = catalog_with(&["cat.png"]);

        for name in [".", ".."] {
            assert!(matches!(
                catalog.add_text(name, "hello"),
                Err(StickerError::ReservedName(_))
            ));
            assert!(matches!(
                catalog.rename_sticker("cat", name),
                Err(StickerError::ReservedName(_))
            ));
        }
        assert_eq!(listing(dir.path()), vec!["cat.png"]);

        // Dots elsewhere in a name are kept by a rescan
        catalog.add_text(".note", "hello").unwrap();
        catalog.add_text("v1.2", "hello").unwrap();
        let before: Vec<Sticker> = catalog.entries().to_vec();
        catalog.reload().unwrap();
        assert_eq!(catalog.entries(), before.as_slice());
    }

    #[tokio::test]
    async fn test_add_sticker_rejects_bad_sources() {
        let (dir, mut catalog) = catalog_with(&[]);

        let webp = CannedFetcher {
            content_type: "image/webp",
            body: vec![0; 4],
        };
        assert!(matches!(
            catalog.add_sticker("x", "u", &webp).await,
            Err(StickerError::UnsupportedContentType(Some(_)))
        ));

        let text = CannedFetcher {
            content_type: "text/plain",
            body: vec![0; 4],
        };
        assert!(matches!(
            catalog.add_sticker("x", "u", &text).await,
            Err(StickerError::UnsupportedContentType(_))
        ));

        catalog.options.size_limit = 3;
        assert!(matches!(
            catalog.add_sticker("x", "u", &png()).await,
            Err(StickerError::TooLarge { limit: 3, .. })
        ));

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_add_sticker_stops_oversized_download() {
        let (dir, mut catalog) = catalog_with(&["cat.png"]);
        catalog.options.size_limit = 4096;

        let endless = EndlessFetcher {
            chunks_sent: AtomicUsize::new(0),
        };
        let err = catalog
            .add_sticker("loop", "https://example.test/loop.gif", &endless)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StickerError::TooLarge {
                limit: 4096,
                actual: 5120
            }
        ));
        assert_eq!(endless.chunks_sent.load(Ordering::SeqCst), 5);
        assert_eq!(listing(dir.path()), vec!["cat.png"]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_text() {
        let (dir, mut catalog) = catalog_with(&["cat.png"]);
        let added = catalog.add_text("motto", "be kind").unwrap();
        assert!(added.is_text());
        assert_eq!(fs::read_to_string(dir.path().join("motto.txt")).unwrap(), "be kind");
        assert!(matches!(
            catalog.add_text("empty", "   "),
            Err(StickerError::EmptyText)
        ));
    }

    #[test]
    fn test_rename_moves_file_and_reindexes() {
        let (dir, mut catalog) = catalog_with(&["cat.png", "zebra/dog.gif"]);
        let renamed = catalog.rename_sticker("dog", "puppy").unwrap();

        assert_eq!(renamed.name(), "puppy");
        assert_eq!(renamed.path(), dir.path().join("puppy.gif"));
        assert!(!dir.path().join("zebra").join("dog.gif").exists());
        assert!(renamed.path().exists());

        let all: Vec<&str> = catalog.entries().iter().map(Sticker::name).collect();
        assert_eq!(all, vec!["cat", "puppy"]);
    }

    #[test]
    fn test_rename_allows_overlap_with_itself() {
        let (dir, mut catalog) = catalog_with(&["cat.png", "dog.png"]);
        let renamed = catalog.rename_sticker("cat", "cats").unwrap();
        assert_eq!(renamed.name(), "cats");
        assert!(dir.path().join("cats.png").exists());
    }

    #[test]
    fn test_rename_rejects_conflicts() {
        let (dir, mut catalog) = catalog_with(&["cat.png", "dog.png", "car.png"]);

        assert!(matches!(
            catalog.rename_sticker("x", "y"),
            Err(StickerError::NotFound)
        ));
        assert!(matches!(
            catalog.rename_sticker("ca", "y"),
            Err(StickerError::Ambiguous(_))
        ));
        assert!(matches!(
            catalog.rename_sticker("dog", "cat"),
            Err(StickerError::ContainedBy(_))
        ));
        assert!(matches!(
            catalog.rename_sticker("dog", "dogcar"),
            Err(StickerError::Contains(_))
        ));
        assert!(matches!(
            catalog.rename_sticker("dog", "a/b"),
            Err(StickerError::InvalidName(_))
        ));
        assert!(dir.path().join("dog.png").exists());
    }

    #[test]
    fn test_rename_refuses_to_overwrite_untracked_file() {
        let (dir, mut catalog) = catalog_with(&["cat.png"]);
        fs::write(dir.path().join("kitty.png"), b"other").unwrap();
        // kitty.png is not indexed until the next reload
        assert!(matches!(
            catalog.rename_sticker("cat", "kitty"),
            Err(StickerError::Occupied)
        ));
        assert_eq!(fs::read(dir.path().join("kitty.png")).unwrap(), b"other");
    }

    #[test]
    fn test_reload_keeps_old_entries_on_failure() {
        let (dir, mut catalog) = catalog_with(&["cat.png"]);
        fs::write(dir.path().join("x-y.png"), b"x").unwrap();
        fs::create_dir(dir.path().join("x")).unwrap();
        fs::write(dir.path().join("x").join("y.png"), b"x").unwrap();

        assert!(catalog.reload().is_err());
        assert_eq!(catalog.len(), 1);

        fs::remove_file(dir.path().join("x-y.png")).unwrap();
        catalog.reload().unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
