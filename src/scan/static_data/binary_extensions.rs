/// Image and binary formats excluded by extension (without the dot)
pub const BINARY_EXTENSIONS: &[&str] = &[
    "bmp", "dcm", "gif", "iff", "jpg", "jpeg", "pbm", "pict", "pic", "pct", "pcx", "png", "psb",
    "psd", "pxr", "raw", "tga", "tiff", "svg",
];

/// The extension catalog as `*.ext` glob lines
pub fn binary_extension_globs() -> Vec<String> {
    BINARY_EXTENSIONS
        .iter()
        .map(|ext| format!("*.{ext}"))
        .collect()
}
