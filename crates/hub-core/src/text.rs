use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAGS: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<\s*(/?)\s*([a-zA-Z0-9]+)\b[^>]*>").unwrap();
    static ref RT_SPAN: Regex = Regex::new(r"(?is)<rt\b[^>]*>.*?</rt\s*>").unwrap();
    static ref RUBY_TAGS: Regex = Regex::new(r"(?i)</?\s*(ruby|rb|rp)\b[^>]*>").unwrap();
}

const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Tags surviving `sanitize_ruby_html`
const RUBY_ALLOWED: [&str; 4] = ["ruby", "rb", "rt", "rp"];

fn strip_zero_width(text: &str) -> String {
    text.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect()
}

/// Unescape entities, drop markup and zero-width characters, collapse whitespace
pub fn clean_text(value: &str) -> String {
    let text = html_escape::decode_html_entities(value);
    let text = TAGS.replace_all(&text, "");
    let text = strip_zero_width(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Base text of a ruby-annotated sentence, readings removed
pub fn clean_ruby_text(value: &str) -> String {
    let text = html_escape::decode_html_entities(value);
    let text = RT_SPAN.replace_all(&text, "");
    let text = RUBY_TAGS.replace_all(&text, "");
    clean_text(&text)
}

/// Keep only bare ruby tags and `<br>`, drop every other tag
pub fn sanitize_ruby_html(value: &str) -> String {
    let text = html_escape::decode_html_entities(value);
    let text = text.replace('\u{200B}', "");

    let sanitized = HTML_TAG.replace_all(&text, |caps: &Captures| {
        let slash = if caps[1].is_empty() { "" } else { "/" };
        let tag = caps[2].to_lowercase();
        if tag == "br" {
            "<br>".to_string()
        } else if RUBY_ALLOWED.contains(&tag.as_str()) {
            format!("<{slash}{tag}>")
        } else {
            String::new()
        }
    });

    sanitized.trim().to_string()
}

pub fn has_reading_annotation(markup: &str) -> bool {
    markup.to_lowercase().contains("<rt>")
}

/// `clean_text` applied until the output stops changing
pub fn clean_text_stable(value: &str) -> String {
    stable(value, clean_text)
}

/// `sanitize_ruby_html` applied until the output stops changing
pub fn sanitize_ruby_html_stable(value: &str) -> String {
    stable(value, sanitize_ruby_html)
}

/// Passes never lengthen their input, so this reaches a fixpoint
fn stable(value: &str, pass: fn(&str) -> String) -> String {
    let mut current = pass(value);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
