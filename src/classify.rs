//! Binary/text classification and magic-byte MIME sniffing.
//!
//! Both checks look only at leading bytes; file extensions are never consulted.

/// Bytes inspected when deciding whether content is binary.
pub const BINARY_SAMPLE_BYTES: usize = 8192;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Ordered prefix table; first match wins.
const MAGIC: &[(&[u8], &str)] = &[
    (b"\x89PNG", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"PK", "application/zip"),
    (b"%PDF", "application/pdf"),
    (b"\x7FELF", "application/x-elf"),
    (b"MZ", "application/x-msdownload"),
];

/// A NUL byte anywhere in the first [`BINARY_SAMPLE_BYTES`] marks the content binary.
pub fn is_binary(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(BINARY_SAMPLE_BYTES)];
    sample.contains(&0)
}

pub fn detect_mime(content: &[u8]) -> &'static str {
    if content.len() < 4 {
        return OCTET_STREAM;
    }

    MAGIC
        .iter()
        .find(|(prefix, _)| content.starts_with(prefix))
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
