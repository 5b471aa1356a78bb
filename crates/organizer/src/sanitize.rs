const ILLEGAL_CHARS: &[char] = &['/', '?', '\\', ':', '*', '"', '<', '>', '|'];

/// Strip characters that are illegal in file names, then trim whitespace.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Capitalize the first letter of every word and lower-case the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// `"o'neil"` becomes `"O'Neil"`. Non-letters pass through unchanged.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// Sanitize, then title-case. This is what every path component goes through.
pub fn normalize_component(text: &str) -> String {
    title_case(&sanitize(text))
}
