//! Named extension classes expanded inside extension filters.

// ---------------------------------------------------------------------------
// Extension class constants
// ---------------------------------------------------------------------------

pub const OFFICE_EXTENSIONS: &[&str] = &[
    "txt", "md", "rst", "doc", "docx", "rtf", "odt", "pdf", "pages", "xls", "xlsx", "csv",
    "numbers", "ods", "ppt", "pptx", "key", "odp",
];

pub const PICTURE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "ico", "svg", "heic", "heif", "raw",
    "arw", "cr2", "orf", "raf", "psd",
];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "avi", "mkv", "wmv", "webm", "flv", "mpg", "mpeg", "3gp", "mts", "m2ts",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "oga", "opus", "wma", "m4a", "aiff",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "zst", "cab", "iso", "dmg",
];

pub const CODE_EXTENSIONS: &[&str] = &[
    "rs", "ts", "tsx", "js", "jsx", "c", "cc", "cpp", "cxx", "h", "hpp", "java", "cs", "py", "go",
    "rb", "swift", "kt", "php", "html", "css", "json", "yaml", "yml", "toml", "ini", "sh", "sql",
    "lua", "pl", "r", "m",
];

pub const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bat", "cmd", "com", "app", "apk", "jar", "bin", "run", "pkg",
];

// ---------------------------------------------------------------------------
// Class lookup
// ---------------------------------------------------------------------------

/// Class names are group words, never bare extensions, so a literal token
/// like `zip` or `pdf` is not widened into a whole class.
pub fn lookup_extension_class(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "office" | "documents" | "docs" => Some(OFFICE_EXTENSIONS),
        "pictures" | "images" | "photos" => Some(PICTURE_EXTENSIONS),
        "videos" | "movies" => Some(VIDEO_EXTENSIONS),
        "audio" | "music" => Some(AUDIO_EXTENSIONS),
        "archives" | "compressed" => Some(ARCHIVE_EXTENSIONS),
        "code" | "source" => Some(CODE_EXTENSIONS),
        "executables" | "programs" => Some(EXECUTABLE_EXTENSIONS),
        _ => None,
    }
}

/// Expands class names in place; unknown tokens pass through unchanged.
pub fn expand_extension_classes(tokens: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for token in tokens {
        match lookup_extension_class(token.as_str()) {
            Some(class) => expanded.extend(class.iter().map(|ext| (*ext).to_string())),
            None => expanded.push(token),
        }
    }
    expanded.sort();
    expanded.dedup();
    expanded
}
