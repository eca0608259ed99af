use std::path::Path;

use sl_core::StateStore;
use sl_core::import::{ContentKind, import_document};

pub fn run(store: &StateStore, kind: &str, source: &Path, title: Option<&str>) -> Result<(), String> {
    let kind = ContentKind::parse(kind)
        .ok_or_else(|| format!("unknown kind '{kind}' (expected rules or scenario)"))?;

    let doc = import_document(store, source, kind, title).map_err(|e| e.to_string())?;

    println!("Imported '{}' as {kind}", doc.title);
    println!("  cached at {}", doc.cached_text.display());
    println!("  {} summary lines", doc.summary_lines);
    Ok(())
}
