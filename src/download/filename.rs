//! Artifact naming: index-based stems and content-type extensions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::constants::FALLBACK_EXTENSION;

/// Returns the extensionless path for the badge at `index`.
///
/// Each badge gets its own stem so concurrent fetches never write the same
/// file.
#[must_use]
pub fn artifact_stem(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("badge-{index}"))
}

/// Appends `.extension` to `stem`.
///
/// Unlike [`Path::with_extension`], a dot already present in the stem is kept.
#[must_use]
pub fn path_with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Guess file extension from Content-Type header.
///
/// Parameters (`; charset=...`) are ignored and matching is case-insensitive.
pub(crate) fn extension_from_content_type(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    match mime.as_str() {
        "image/svg+xml" => "svg",
        "image/png" => "png",
        "image/jpeg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/bmp" => "bmp",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        "image/tiff" => "tiff",
        "text/html" => "html",
        "text/plain" => "txt",
        "application/json" => "json",
        "application/xml" | "text/xml" => "xml",
        "application/pdf" => "pdf",
        _ => FALLBACK_EXTENSION,
    }
}
