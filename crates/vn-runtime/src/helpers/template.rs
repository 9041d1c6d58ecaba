use std::sync::OnceLock;

use regex::Regex;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"<(.+?)>").expect("placeholder regex must compile"))
}

/// Replaces every `<key>` with `lookup(key)`. Keys the lookup does not know
/// are written back verbatim, brackets included.
pub(crate) fn render_placeholders<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut output = String::with_capacity(template.len());
    let mut last_index = 0usize;
    for captures in placeholder_regex().captures_iter(template) {
        let full = captures
            .get(0)
            .expect("capture group 0 must exist for each regex capture");
        let key = captures
            .get(1)
            .expect("capture group 1 must exist for each regex capture");
        output.push_str(&template[last_index..full.start()]);
        match lookup(key.as_str()) {
            Some(value) => output.push_str(&value),
            None => output.push_str(full.as_str()),
        }
        last_index = full.end();
    }
    output.push_str(&template[last_index..]);
    output
}

pub(crate) fn has_placeholder(text: &str) -> bool {
    placeholder_regex().is_match(text)
}
