//! Extension-based classification for inline previews. Goes by file
//! name only; contents are never inspected.

/// Extensions rendered as inline images.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp", ".gif", ".svg"];

/// Extensions whose contents are shown as inline text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".jsx", ".tsx", ".py", ".c", ".cpp", ".java", ".json", ".html", ".css", ".txt",
    ".md", ".sql", ".sh",
];

/// Largest text file read for a preview, in bytes.
pub const TEXT_PREVIEW_CEILING: u64 = 2_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Text,
    Other,
}

/// Classify a file name by its extension alone. Anything unrecognized
/// gets no inline preview, only its link.
pub fn classify(name: &str) -> FileKind {
    let ext = extension_of(name);
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Image
    } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Text
    } else {
        FileKind::Other
    }
}

fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(index) => name[index..].to_lowercase(),
        None => String::new(),
    }
}
