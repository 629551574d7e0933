use crate::error::Result;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Decode raw bytes as UTF-8, falling back to Windows-1252 for exports that
/// carry Latin-1 station and comuna names.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text;
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}

/// Read a whole text file, tolerating UTF-8 (with or without BOM) and Windows-1252
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    let text = decode_text(bytes);

    if matches!(text, Cow::Owned(_)) {
        debug!("Decoded {} as Windows-1252", path.display());
    }

    Ok(text.into_owned())
}
