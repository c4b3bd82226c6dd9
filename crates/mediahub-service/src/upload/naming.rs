//! Collision-free object names for uploads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_storage::mime::{extension_for_mime, extension_matches_mime};

const MAX_EXTENSION_LEN: usize = 10;

/// Build `{unix_millis}-{8 hex chars}.{ext}`.
///
/// The extension comes from the original file name (lower-cased) when it
/// agrees with the declared MIME type, otherwise from the MIME type.
pub fn generate_object_name(
    file_name: &str,
    mime_type: &str,
    now: DateTime<Utc>,
) -> AppResult<String> {
    let ext = match extension_from_name(file_name) {
        Some(ext) if extension_matches_mime(&ext, mime_type) => Some(ext),
        from_name => extension_for_mime(mime_type).map(str::to_string).or(from_name),
    }
    .ok_or_else(|| {
        AppError::validation(format!(
            "Cannot determine a file extension for '{file_name}' ({mime_type})"
        ))
    })?;
    let id = Uuid::new_v4().simple().to_string();
    Ok(format!("{}-{}.{}", now.timestamp_millis(), &id[..8], ext))
}

fn extension_from_name(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
