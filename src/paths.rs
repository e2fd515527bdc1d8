use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// `*.json.gz`, `*.ion.gz` and their `.zst` counterparts, as written by the table export.
fn export_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[^.].*\.(json|ion)\.(gz|zst)$").expect("static regex"))
}

pub fn is_export_file(name: &str) -> bool {
    export_file_re().is_match(name)
}

/// List export files directly under `dir`, sorted by name. A missing directory yields no files.
pub fn discover_export_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name().into_iter().flatten() {
        if !ent.file_type().is_file() {
            continue;
        }
        if let Some(name) = ent.file_name().to_str() {
            if is_export_file(name) {
                files.push(ent.path().to_path_buf());
            }
        }
    }
    files
}
