// webpbatch/src/utils/mod.rs
use std::path::Path;

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as i32).min(UNITS.len() as i32 - 1);
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}

/// Like [`format_file_size`], keeping the sign of a possibly negative delta.
pub fn format_signed_size(bytes: i64) -> String {
    let formatted = format_file_size(bytes.unsigned_abs());
    if bytes < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Final path component of a client-supplied name. Both separators count so
/// Windows-style upload names are flattened too.
pub fn flat_file_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_string()
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// True for a bare file name: a single component that is neither `.` nor `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\', ':', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_signed_size(-2048), "-2.00 KB");
    }

    #[test]
    fn flattens_names() {
        assert_eq!(flat_file_name("a/b/c.png"), "c.png");
        assert_eq!(flat_file_name("C:\\photos\\d.jpg"), "d.jpg");
        assert_eq!(flat_file_name("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn plain_names() {
        assert!(is_plain_file_name("photo.webp"));
        assert!(!is_plain_file_name("../secret.webp"));
        assert!(!is_plain_file_name("dir/photo.webp"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("..\\secret.webp"));
    }

    #[test]
    fn double_dots_inside_a_name_are_fine() {
        assert!(is_plain_file_name("my..photo.webp"));
        assert!(is_plain_file_name("..hidden.webp"));
    }
}
