//! Content types for served files.
//!
//! Only a handful of extensions are recognised. Anything else gets no
//! `Content-Type` header at all rather than a generic binary type.

use std::path::Path;

pub const TEXT_HTML: &str = "text/html";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";

/// Looks up the content type for `path` by its extension (case-sensitive).
pub fn content_type(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str())? {
        "jpg" | "jpeg" => Some(IMAGE_JPEG),
        "png" => Some(IMAGE_PNG),
        "html" | "htm" => Some(TEXT_HTML),
        _ => None,
    }
}

/// Whether the file is served as text rather than raw bytes.
pub fn is_text(path: &Path) -> bool {
    content_type(path) == Some(TEXT_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type(Path::new("/r/a.jpg")), Some("image/jpeg"));
        assert_eq!(content_type(Path::new("/r/a.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type(Path::new("/r/a.png")), Some("image/png"));
        assert_eq!(content_type(Path::new("/r/a.htm")), Some("text/html"));
    }

    #[test]
    fn unknown_extension_has_no_type() {
        assert_eq!(content_type(Path::new("/r/a.css")), None);
        assert_eq!(content_type(Path::new("/r/Makefile")), None);
        assert_eq!(content_type(Path::new("/r/a.PNG")), None);
    }
}
