use crate::error::RemovalError;
use std::path::Path;

const PNG_SUFFIX: &str = ".png";

/// Whether a file name ends in `.png`, ignoring ASCII case
pub fn has_png_suffix(name: &str) -> bool {
    name.len() >= PNG_SUFFIX.len()
        && name.as_bytes()[name.len() - PNG_SUFFIX.len()..]
            .eq_ignore_ascii_case(PNG_SUFFIX.as_bytes())
}

/// Insert `separator` in front of the trailing run of ASCII digits.
///
/// `"img1"` becomes `"img_1"`, `"77"` becomes `"_77"`, and a name without
/// trailing digits just gets the separator appended.
pub fn insert_separator(base: &str, separator: &str) -> String {
    let split = base.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (head, digits) = base.split_at(split);

    let mut name = String::with_capacity(base.len() + separator.len());
    name.push_str(head);
    name.push_str(separator);
    name.push_str(digits);
    name
}

/// Output file name for an input PNG path, keeping the extension's case
pub fn output_file_name(input: &Path, separator: &str) -> Result<String, RemovalError> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RemovalError::InvalidFileName(input.display().to_string()))?;

    // Keep the extension exactly as written so `a1.png` and `a1.PNG` stay apart
    let (base, extension) = if has_png_suffix(file_name) {
        file_name.split_at(file_name.len() - PNG_SUFFIX.len())
    } else {
        (file_name, PNG_SUFFIX)
    };

    Ok(format!("{}{}", insert_separator(base, separator), extension))
}
