//! Field-name title casing.

/// Converts a camelCase or snake_case identifier to Title Case.
///
/// `firstName` → `First Name`, `user_name` → `User Name`, `email` → `Email`.
/// Words split at `_`, `-` and at lowercase/digit → uppercase boundaries.
/// A run of capitals stays one word and is lowercased after its first
/// letter, so acronyms read `URL` → `Url` and `userID` → `User Id` rather
/// than being split letter by letter.
pub fn to_title_case(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        let boundary = matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit());
        if c.is_uppercase() && boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.push(c);
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
