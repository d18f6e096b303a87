const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn user input into a folder name that is valid on every common filesystem.
///
/// Control characters and reserved characters become `_`; surrounding
/// whitespace and trailing dots are dropped. May return an empty string.
pub fn sanitize_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if (c as u32) < 32 || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    cleaned
        .trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}
