//! Display helpers shared by the UI and tests.

use jiff::{Timestamp, tz::TimeZone};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable file size using 1024-based units, e.g. `1.5 MB`.
///
/// At most two decimals are shown and trailing zeros are dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[exponent])
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// Handles both the quoted and bare `filename=` forms.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Name to save a download under: the server's Content-Disposition name
/// when it sent one, otherwise the document's display name as a `.pdf`.
pub fn download_filename(server_name: Option<&str>, display_name: &str) -> String {
    match server_name {
        Some(name) => name.to_string(),
        None => format!("{display_name}.pdf"),
    }
}

/// Short date like `Mar 04, 2025` in the given timezone.
pub fn format_date(timestamp: Timestamp, tz: TimeZone) -> String {
    timestamp.to_zoned(tz).strftime("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn download_name_without_header_uses_display_name() {
        assert_eq!(download_filename(None, "Lease agreement"), "Lease agreement.pdf");
        assert_eq!(
            download_filename(Some("3f1c.pdf"), "Lease agreement"),
            "3f1c.pdf"
        );
    }

    #[test]
    fn content_disposition_filenames() {
        assert_eq!(
            filename_from_content_disposition(
                r#"attachment; filename="annual report.pdf""#
            ),
            Some("annual report.pdf".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=a.pdf"),
            Some("a.pdf".to_string())
        );
        assert_eq!(filename_from_content_disposition("inline"), None);
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="""#),
            None
        );
    }

    #[test]
    fn dates_are_short_month_day_year() {
        let ts: Timestamp = "2025-03-04T10:00:00Z".parse().unwrap();
        assert_eq!(format_date(ts, TimeZone::UTC), "Mar 04, 2025");
    }
}
