//! MIME type helpers for the asset types the storefront accepts.

/// Guess a MIME type from a file name's extension.
pub fn mime_from_path(path: &str) -> Option<&'static str> {
    mime_guess::from_path(path).first_raw()
}

/// Preferred file extension for a MIME type.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = essence(mime);
    let preferred = match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => {
            return mime_guess::get_mime_extensions_str(&essence)
                .and_then(|exts| exts.first().copied());
        }
    };
    Some(preferred)
}

/// Whether files with extension `ext` are typed as `mime`.
pub fn extension_matches_mime(ext: &str, mime: &str) -> bool {
    let essence = essence(mime);
    mime_guess::from_ext(ext)
        .iter()
        .any(|guess| guess.essence_str() == essence)
}

/// Lower-cased MIME type without parameters (`"Image/PNG; q=1"` -> `"image/png"`).
pub fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
