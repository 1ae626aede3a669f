//! Media layout constants and helpers for upload file names.
//!
//! Every file the application writes lives under a single media root, in one
//! of two fixed subdirectories. Records store references relative to that
//! root, and the web server exposes the root under [`MEDIA_URL_PREFIX`].

/// Subdirectory (relative to the media root) holding uploaded originals.
pub const ORIGINALS_DIR: &str = "uploads/originals";

/// Subdirectory (relative to the media root) holding stylized derivatives.
pub const STYLIZED_DIR: &str = "uploads/stylized";

/// URL prefix under which the media root is served.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Reduce a client-supplied file name to a safe base name.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// other than ASCII alphanumerics, `-`, `_` and `.` is removed. Returns
/// `None` when nothing usable is left.
///
/// # Examples
///
/// ```
/// use mintari_common::paths::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("my photo.png").as_deref(), Some("my_photo.png"));
/// assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(sanitize_file_name("..").as_deref(), None);
/// ```
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned)
    }
}

/// Insert `suffix` between a file name's stem and its extension.
///
/// # Examples
///
/// ```
/// use mintari_common::paths::with_stem_suffix;
///
/// assert_eq!(with_stem_suffix("A.png", "x7Kq2"), "A_x7Kq2.png");
/// assert_eq!(with_stem_suffix("README", "ab"), "README_ab");
/// ```
pub fn with_stem_suffix(file_name: &str, suffix: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => {
            format!("{}_{}{}", &file_name[..idx], suffix, &file_name[idx..])
        }
        _ => format!("{}_{}", file_name, suffix),
    }
}

/// Public URL for a media-root-relative reference.
///
/// # Examples
///
/// ```
/// use mintari_common::paths::media_url;
///
/// assert_eq!(
///     media_url("uploads/stylized/ghibli_A.png"),
///     "/media/uploads/stylized/ghibli_A.png"
/// );
/// ```
pub fn media_url(reference: &str) -> String {
    format!("{}/{}", MEDIA_URL_PREFIX, reference.trim_start_matches('/'))
}
