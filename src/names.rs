use once_cell::sync::Lazy;
use regex::Regex;

static FORMATTING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"§.").expect("formatting code pattern is valid"));
static RANK_TAG_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[.*?\]").expect("rank tag pattern is valid"));

/// Turn an upstream tagged name like `§b[MVP§c+§b] Steve` into `Steve`.
///
/// Codes are stripped before the tag; a leading code hides the tag from the
/// prefix match.
pub fn clean_display_name(tagged: &str) -> String {
    let plain = strip_formatting_codes(tagged);
    strip_rank_tag(&plain).trim().to_string()
}

/// Drop every `§` + one-character colour/format code.
pub fn strip_formatting_codes(raw: &str) -> String {
    FORMATTING_CODE.replace_all(raw, "").into_owned()
}

/// Drop a leading `[TAG]` (shortest bracket match). Names without one come back as-is.
pub fn strip_rank_tag(raw: &str) -> String {
    RANK_TAG_PREFIX.replace(raw, "").into_owned()
}
