use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Structural format of a dictionary file. Decides which pattern shapes
/// the compiler emits and which parser variant a matched line goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Edict,
    Kanjidict,
    Examples,
    Radicals,
    Unknown,
}

impl EngineKind {
    /// Infer the engine kind from a dictionary file name
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.starts_with("edict") {
            EngineKind::Edict
        } else if lower.starts_with("kanjidic") {
            EngineKind::Kanjidict
        } else if lower.starts_with("radicals") {
            EngineKind::Radicals
        } else if lower.starts_with("examples") {
            EngineKind::Examples
        } else {
            EngineKind::Unknown
        }
    }

    /// Kanji and radical dictionaries share the kanji pattern shapes,
    /// structured query atoms and uncapped result queues
    pub fn is_kanji(&self) -> bool {
        matches!(self, EngineKind::Kanjidict | EngineKind::Radicals)
    }
}

/// One on-disk dictionary file. The kind is fixed at creation and the
/// search engine only ever reads the file.
#[derive(Debug)]
pub struct Dictionary {
    name: String,
    kind: EngineKind,
    path: PathBuf,
    total_lines: usize,
    load_position: usize,
}

impl Dictionary {
    pub fn new(name: &str, kind: EngineKind, path: &Path, load_position: usize) -> io::Result<Self> {
        let total_lines = count_lines(path)?;
        Ok(Self {
            name: name.to_string(),
            kind,
            path: path.to_path_buf(),
            total_lines,
            load_position,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached line count, used only for progress reporting
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn load_position(&self) -> usize {
        self.load_position
    }
}

/// Total line count of a dictionary file. Byte-level scan so malformed
/// UTF-8 in externally sourced files cannot fail the count.
fn count_lines(path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut count = 0;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        count += buf.iter().filter(|&&b| b == b'\n').count();
        let len = buf.len();
        reader.consume(len);
    }
    Ok(count)
}

/// The installed dictionary list, ordered by load position. Owned by the
/// application context and shared read-only with search sessions.
#[derive(Debug, Default)]
pub struct DictionaryRegistry {
    dictionaries: Vec<Arc<Dictionary>>,
}

impl DictionaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every regular file in a directory. The file
    /// name decides the engine kind.
    pub fn from_directory(dir: &Path) -> io::Result<Self> {
        let mut registry = Self::new();
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let kind = EngineKind::from_name(&name);
            match registry.add(&name, kind, &path) {
                Ok(()) => {}
                Err(e) => tracing::warn!("Skipping dictionary {}: {}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} dictionaries", registry.len());
        Ok(registry)
    }

    pub fn add(&mut self, name: &str, kind: EngineKind, path: &Path) -> io::Result<()> {
        let position = self.dictionaries.len();
        let dictionary = Dictionary::new(name, kind, path, position)?;
        tracing::debug!(
            "Registered dictionary {} ({:?}, {} lines)",
            name,
            kind,
            dictionary.total_lines()
        );
        self.dictionaries.push(Arc::new(dictionary));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Dictionary>> {
        self.dictionaries
            .iter()
            .find(|d| d.name() == name)
            .cloned()
    }

    pub fn first(&self) -> Option<Arc<Dictionary>> {
        self.dictionaries.first().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dictionary>> {
        self.dictionaries.iter()
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}
