//! Static file loading module
//!
//! Resolves request paths against the document root, refusing anything that
//! escapes it, and reads file contents with a MIME type from the extension.

use crate::config::StaticConfig;
use crate::http::mime;
use crate::logger;
use percent_encoding::percent_decode_str;
use std::path::Path;
use tokio::fs;

/// Resolve a request path against the document root and read the file.
///
/// Returns `None` for anything that is not a regular file inside the root:
/// missing files, bare directories without an index file, undecodable
/// paths, and traversal attempts all collapse to a 404 upstream.
pub async fn load(static_cfg: &StaticConfig, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let relative_path = decoded.trim_start_matches('/');

    let root = Path::new(&static_cfg.root);
    let mut file_path = root.join(relative_path);

    // The root must exist and canonicalize for the containment check below
    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                static_cfg.root
            ));
            return None;
        }
    };

    // Directories resolve to their first available index file
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        for index_file in &static_cfg.index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };

    // Never serve anything that resolved outside the root
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path_canonical.display()
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
