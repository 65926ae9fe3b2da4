/// Placeholder printed for values the extraction did not produce.
pub const PLACEHOLDER: &str = "-";

/// Text shown for an optional listing value in reports.
///
/// Missing values and the literal strings `""`, `"null"`, `"undefined"` and
/// `"N/A"` become [`PLACEHOLDER`]; anything else is returned unchanged.
#[must_use]
pub fn render_value(value: Option<&str>) -> String {
    match value {
        None | Some("" | "null" | "undefined" | "N/A") => PLACEHOLDER.to_string(),
        Some(v) => v.to_string(),
    }
}
