//! Photo file naming: `<id><ext>` with the extension taken from the upload.

use crate::core::types::ContactId;

/// Extension used when the upload name carries no usable one.
pub const DEFAULT_EXTENSION: &str = ".png";

/// URL path prefix under which stored photos are served.
pub const IMAGE_ROUTE: &str = "/contacts/image";

/// Derive the stored extension (leading dot included) from an upload name.
///
/// Takes the text after the last `.`. Falls back to [`DEFAULT_EXTENSION`]
/// when there is no name, no dot, nothing after the dot, or the suffix holds
/// anything but ASCII alphanumerics (which also keeps path separators out).
pub fn file_extension(original_name: Option<&str>) -> String {
    let Some(name) = original_name else {
        return DEFAULT_EXTENSION.to_string();
    };
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{ext}")
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Stored file name for a contact photo.
pub fn photo_file_name(id: ContactId, original_name: Option<&str>) -> String {
    format!("{id}{}", file_extension(original_name))
}

/// Public URL for a stored photo. `base_url` has no trailing slash; empty
/// yields a host-relative path.
pub fn photo_url(base_url: &str, file_name: &str) -> String {
    format!("{base_url}{IMAGE_ROUTE}/{file_name}")
}

/// Stored file name referenced by a photo URL (its last path segment).
pub fn file_name_of_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Whether `file_name` is a photo stored for `id` (any extension).
pub fn is_photo_of(id: ContactId, file_name: &str) -> bool {
    match file_name.split_once('.') {
        Some((stem, _)) => stem == id.to_string(),
        None => false,
    }
}
