//! Filename sanitization for client-supplied upload names.

/// Linux NAME_MAX
const NAME_MAX: usize = 255;

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduces a client-supplied filename to a safe basename.
///
/// - Keeps only the last `/` or `\` separated component
/// - Turns runs of whitespace into a single `_`
/// - Drops everything except ASCII letters, digits, `.`, `_` and `-`
/// - Trims leading/trailing `.` and `_`
/// - Prefixes Windows device names with `_`
/// - Limits length to 255 bytes
///
/// The result may be empty; see [`sanitize_or_generate`].
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");

    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let mut out = kept.trim_matches(|c| c == '.' || c == '_').to_string();

    let stem = out.split('.').next().unwrap_or("");
    if WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
    {
        out.insert(0, '_');
    }

    if out.len() > NAME_MAX {
        out = truncate_keeping_extension(&out);
    }
    out
}

/// Shortens the stem so the extension survives, then re-trims the cut end.
/// Input is ASCII, so any byte index is a char boundary.
fn truncate_keeping_extension(name: &str) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if name.len() - dot < NAME_MAX / 2 => name.split_at(dot),
        _ => (name, ""),
    };

    let stem = &stem[..NAME_MAX - ext.len()];
    let stem = stem.trim_end_matches(|c| c == '.' || c == '_');
    format!("{stem}{ext}")
}

/// Like [`sanitize_filename`], but never returns an empty name.
pub fn sanitize_or_generate(name: &str) -> String {
    let sanitized = sanitize_filename(name);
    if sanitized.is_empty() {
        format!("upload-{}", uuid::Uuid::new_v4().simple())
    } else {
        sanitized
    }
}
