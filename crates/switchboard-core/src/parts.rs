//! Attachment inspection.
//!
//! Decides whether a request part is an image and converts image parts into
//! the [`ImageRef`]s the completion backend understands. A part counts as
//! an image if its declared mime type has an `image/` prefix, its filename
//! carries an image extension, or it carries inline bytes with neither.

use switchboard_types::llm::ImageRef;
use switchboard_types::task::{PartKind, RequestPart};

/// Filename extensions recognized as images when no mime type is declared.
const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp"];

/// Mime type assumed for inline bytes with no other signal.
const FALLBACK_IMAGE_MIME: &str = "image/png";

/// Whether a single part should be treated as an image.
pub fn is_image_part(part: &RequestPart) -> bool {
    if !matches!(part.kind, Some(PartKind::File) | Some(PartKind::Image)) {
        return false;
    }
    if let Some(mime) = &part.mime_type {
        if mime.starts_with("image/") {
            return true;
        }
    }
    if let Some(name) = &part.filename {
        let lower = name.to_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return true;
        }
    }
    // Inline bytes with no mime/extension still count as an image part
    part.mime_type.is_none() && part.filename.is_none() && part.bytes.is_some()
}

/// Whether any attached part is an image.
pub fn has_image_part(parts: &[RequestPart]) -> bool {
    parts.iter().any(is_image_part)
}

/// Guess a mime type from a filename extension.
fn mime_for_filename(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    if lower.ends_with(".png") {
        Some("image/png")
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if lower.ends_with(".gif") {
        Some("image/gif")
    } else if lower.ends_with(".webp") {
        Some("image/webp")
    } else if lower.ends_with(".bmp") {
        Some("image/bmp")
    } else {
        None
    }
}

/// Convert the image parts of a request into backend [`ImageRef`]s.
///
/// URI-bearing parts become `ImageRef::Uri`; inline parts become
/// `ImageRef::Inline` with the declared mime, the filename-guessed mime, or
/// `image/png` as a last resort. Parts with neither payload are skipped.
pub fn collect_image_refs(parts: &[RequestPart]) -> Vec<ImageRef> {
    let mut images = Vec::new();
    for part in parts {
        if !is_image_part(part) {
            continue;
        }
        if let Some(uri) = &part.uri {
            images.push(ImageRef::Uri { uri: uri.clone() });
            continue;
        }
        if let Some(data) = &part.bytes {
            let mime = part
                .mime_type
                .clone()
                .or_else(|| part.filename.as_deref().and_then(mime_for_filename).map(String::from))
                .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());
            images.push(ImageRef::Inline {
                mime_type: mime,
                data: data.clone(),
            });
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_part() -> RequestPart {
        RequestPart {
            kind: Some(PartKind::File),
            ..Default::default()
        }
    }

    #[test]
    fn test_mime_prefix_wins() {
        let mut part = file_part();
        part.mime_type = Some("image/png".to_string());
        assert!(is_image_part(&part));

        part.mime_type = Some("application/pdf".to_string());
        assert!(!is_image_part(&part));
    }

    #[test]
    fn test_filename_extension() {
        let mut part = file_part();
        part.filename = Some("Photo.JPEG".to_string());
        assert!(is_image_part(&part));

        part.filename = Some("report.txt".to_string());
        assert!(!is_image_part(&part));
    }

    #[test]
    fn test_bare_bytes_count_as_image() {
        let mut part = file_part();
        part.bytes = Some("aGVsbG8=".to_string());
        assert!(is_image_part(&part));
    }

    #[test]
    fn test_non_file_kind_is_not_image() {
        let part = RequestPart {
            kind: None,
            bytes: Some("aGVsbG8=".to_string()),
            ..Default::default()
        };
        assert!(!is_image_part(&part));
    }

    #[test]
    fn test_collect_prefers_uri() {
        let mut part = file_part();
        part.mime_type = Some("image/png".to_string());
        part.uri = Some("https://example.com/cat.png".to_string());
        part.bytes = Some("aGVsbG8=".to_string());

        let refs = collect_image_refs(&[part]);
        assert_eq!(refs, vec![ImageRef::Uri { uri: "https://example.com/cat.png".to_string() }]);
    }

    #[test]
    fn test_collect_inline_guesses_mime_from_filename() {
        let mut part = file_part();
        part.filename = Some("cat.webp".to_string());
        part.bytes = Some("aGVsbG8=".to_string());

        let refs = collect_image_refs(&[part]);
        assert_eq!(
            refs,
            vec![ImageRef::Inline {
                mime_type: "image/webp".to_string(),
                data: "aGVsbG8=".to_string()
            }]
        );
    }

    #[test]
    fn test_collect_inline_falls_back_to_png() {
        let mut part = file_part();
        part.bytes = Some("aGVsbG8=".to_string());

        let refs = collect_image_refs(&[part]);
        match &refs[0] {
            ImageRef::Inline { mime_type, .. } => assert_eq!(mime_type, "image/png"),
            other => panic!("expected inline ref, got {other:?}"),
        }
    }
}
