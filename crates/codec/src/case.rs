//! Member-name case conversion.
//!
//! Property names are PascalCase in the model and camelCase on the wire.
//! Dotted names convert each segment independently; the `__` metadata prefix
//! is preserved untouched on both sides.

/// Converts a model name to its wire form: each dot-separated segment has
/// its first alphabetic character lowercased.
pub fn to_wire(name: &str) -> String {
    convert(name, char::to_lowercase)
}

/// Converts a wire name back to its model form: each dot-separated segment
/// has its first alphabetic character uppercased.
pub fn to_model(name: &str) -> String {
    convert(name, char::to_uppercase)
}

fn convert<I>(name: &str, case: impl Fn(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    name.split('.')
        .map(|segment| {
            let (prefix, body) = split_meta(segment);
            let mut out = String::with_capacity(segment.len());
            out.push_str(prefix);
            let mut chars = body.chars();
            if let Some(first) = chars.next() {
                out.extend(case(first));
                out.push_str(chars.as_str());
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn split_meta(segment: &str) -> (&str, &str) {
    match segment.strip_prefix("__") {
        Some(rest) => ("__", rest),
        None => ("", segment),
    }
}
