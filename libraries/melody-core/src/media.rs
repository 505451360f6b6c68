//! Media resource description and MIME resolution

use crate::types::SongId;
use std::path::Path;

/// MIME type served when the extension is unknown
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// Extensions accepted for upload, lowercase and without the dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];

/// A stored media file as seen by the streaming endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    pub id: SongId,
    pub total_length: u64,
    pub mime_type: &'static str,
    pub locator: String,
}

/// MIME type for a file extension (case-insensitive, leading dot optional)
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// MIME type for a path or locator, based on its extension
pub fn mime_type_for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(DEFAULT_MIME_TYPE, mime_type_for_extension)
}

/// Lowercased extension of an uploaded file name, if it is one we accept
pub fn supported_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    SUPPORTED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_fixed_types() {
        assert_eq!(mime_type_for_path("a.mp3"), "audio/mpeg");
        assert_eq!(mime_type_for_path("a.WAV"), "audio/wav");
        assert_eq!(mime_type_for_path("dir/a.M4a"), "audio/mp4");
        assert_eq!(mime_type_for_extension(".wav"), "audio/wav");
    }

    #[test]
    fn unknown_or_missing_extension_defaults_to_mpeg() {
        assert_eq!(mime_type_for_path("a.flac"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for_path("noext"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn upload_extensions_are_whitelisted() {
        assert_eq!(supported_extension("Song.MP3").as_deref(), Some("mp3"));
        assert_eq!(supported_extension("take.m4a").as_deref(), Some("m4a"));
        assert_eq!(supported_extension("cover.png"), None);
        assert_eq!(supported_extension("README"), None);
    }
}
