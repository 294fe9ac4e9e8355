use crate::error::BucketError;
use std::path::Path;

/// Bucket for a file: its first character, lowercased.
///
/// Characters without a lowercase form are returned unchanged. Some
/// characters lowercase to more than one scalar (`İ` becomes `i̇`), so the
/// result is a `String`.
pub fn bucket_name(path: &Path) -> Result<String, BucketError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| BucketError::EmptyName(path.to_path_buf()))?;
    let file_name = file_name
        .to_str()
        .ok_or_else(|| BucketError::NonUnicode(path.to_path_buf()))?;
    let first = file_name
        .chars()
        .next()
        .ok_or_else(|| BucketError::EmptyName(path.to_path_buf()))?;
    Ok(first.to_lowercase().collect())
}
