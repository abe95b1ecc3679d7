//! Identifier casing for generated code.
//!
//! Words are split on anything that is not alphanumeric and on case
//! switches: `welcome_message`, `welcome-message` and `welcomeMessage` all
//! split into `welcome` + `message`. An upper-case run followed by a lower
//! case letter ends before its last capital (`HTMLParser` → `HTML` + `Parser`).

const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "rethrows", "static", "struct", "subscript", "typealias", "var", "break", "case", "continue",
    "default", "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat",
    "return", "switch", "where", "while", "as", "Any", "catch", "false", "is", "nil", "super",
    "self", "Self", "throw", "throws", "true", "try",
];

pub fn components(input: &str) -> Vec<String> {
    let mut result = Vec::new();
    for word in input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        split_case_switches(word, &mut result);
    }
    result
}

fn split_case_switches(word: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = word.chars().collect();
    let mut start = 0;
    for i in 1..chars.len() {
        let (prev, cur) = (chars[i - 1], chars[i]);
        if cur.is_uppercase() && !prev.is_uppercase() {
            out.push(chars[start..i].iter().collect());
            start = i;
        } else if prev.is_uppercase() && cur.is_lowercase() && i - 1 > start {
            out.push(chars[start..i - 1].iter().collect());
            start = i - 1;
        }
    }
    if start < chars.len() {
        out.push(chars[start..].iter().collect());
    }
}

/// `hello` → `Hello`
pub fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `welcome_message` → `WelcomeMessage`
pub fn camel_cased(input: &str) -> String {
    components(input).iter().map(|c| capitalized(c)).collect()
}

/// `welcome_message` → `welcomeMessage`
pub fn llama_cased(input: &str) -> String {
    components(input)
        .iter()
        .enumerate()
        .map(|(idx, c)| if idx == 0 { c.to_lowercase() } else { capitalized(c) })
        .collect()
}

/// `welcomeMessage` → `welcome_message`
pub fn snake_cased(input: &str) -> String {
    components(input)
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// A lower camel case name that is a valid Swift identifier.
pub fn swift_identifier(input: &str) -> String {
    let name = llama_cased(input);
    if name.is_empty() {
        return "_".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", name);
    }
    if SWIFT_KEYWORDS.contains(&name.as_str()) {
        return format!("`{}`", name);
    }
    name
}
