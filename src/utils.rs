use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(progress_style) = ProgressStyle::with_template(
        "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Check if a string is a valid hex color (with optional alpha)
pub fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex_part) = color.strip_prefix('#') else {
        return false;
    };

    // Accept #RGB, #RRGGBB, #RRGGBBAA formats
    match hex_part.len() {
        3 | 6 | 8 => hex_part.chars().all(|c| c.is_ascii_hexdigit()),
        _ => false,
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[&str]) -> bool {
    match get_file_extension(path) {
        Some(ext) => extensions.contains(&ext.as_str()),
        None => false,
    }
}

/// File name for display, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bytes to kilobytes (1 KB = 1024 bytes)
pub fn bytes_to_kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Percentage saved going from `before` to `after` bytes; 0 when `before` is 0
pub fn reduction_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) / before as f64 * 100.0
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("#000"));
        assert!(is_valid_hex_color("#0f0f1a"));
        assert!(is_valid_hex_color("#FF00FF80"));

        assert!(!is_valid_hex_color("0f0f1a"));
        assert!(!is_valid_hex_color("#GG0000"));
        assert!(!is_valid_hex_color("#00"));
        assert!(!is_valid_hex_color("navy"));
    }

    #[test]
    fn test_has_valid_extension_ignores_case() {
        let exts = ["jpg", "png"];
        assert!(has_valid_extension(&PathBuf::from("a/photo.JPG"), &exts));
        assert!(has_valid_extension(&PathBuf::from("photo.png"), &exts));
        assert!(!has_valid_extension(&PathBuf::from("anim.gif"), &exts));
        assert!(!has_valid_extension(&PathBuf::from("README"), &exts));
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(0, 512), 0.0);
        assert_eq!(reduction_percent(1000, 250), 75.0);
        // Growth shows up as a negative saving
        assert_eq!(reduction_percent(100, 150), -50.0);
    }

    #[test]
    fn test_bytes_to_kb() {
        assert_eq!(bytes_to_kb(2048), 2.0);
        assert_eq!(bytes_to_kb(0), 0.0);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&PathBuf::from("/tmp/images/cat.jpg")), "cat.jpg");
    }
}
