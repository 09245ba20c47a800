//! Loading a selected file from disk.
//!
//! The declared media type comes from the file extension, the way a file
//! picker reports it; content is not sniffed.

use std::path::Path;

use narrate_core::{MediaType, NarrateError, SelectedFile};
use tracing::debug;

/// Media type declared by a file's extension.
pub fn detect_media_type(path: &Path) -> MediaType {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let declared = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "svg"          => "image/svg+xml",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "ico"          => "image/x-icon",
        "tiff" | "tif" => "image/tiff",
        "heic"         => "image/heic",
        "heif"         => "image/heif",
        _              => MediaType::OCTET_STREAM,
    };
    MediaType::new(declared)
}

/// Name shown in the UI for a path: its final component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the whole file into memory as a [`SelectedFile`].
///
/// Any IO failure is a [`NarrateError::FileRead`].
pub async fn read_selected_file(path: &Path) -> Result<SelectedFile, NarrateError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| NarrateError::FileRead(format!("{}: {e}", path.display())))?;

    let media_type = detect_media_type(path);
    debug!(path = %path.display(), bytes = bytes.len(), media_type = %media_type, "Read selected file");
    Ok(SelectedFile::new(display_name(path), media_type, bytes))
}
