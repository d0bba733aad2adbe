use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for catalog language tags
///
/// Catalog tags are either a bare ISO 639 code (`zh`, `fra`) or a code
/// followed by an ISO 15924 script subtag (`eng_Latn`, `hin_Deva`).
/// These helpers split such tags and map the language part onto
/// ISO 639-1 / ISO 639-2/T codes and English display names.

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split a tag into its language part and optional script part
pub fn split_tag(tag: &str) -> (&str, Option<&str>) {
    let tag = tag.trim();
    match tag.split_once(['_', '-']) {
        Some((language, script)) if !script.is_empty() => (language, Some(script)),
        Some((language, _)) => (language, None),
        None => (tag, None),
    }
}

/// Language part of a tag, lowercased (`eng_Latn` -> `eng`)
pub fn base_code(tag: &str) -> String {
    split_tag(tag).0.to_lowercase()
}

/// Script part of a tag if one is present (`hin_Deva` -> `Deva`)
pub fn script_of(tag: &str) -> Option<&str> {
    split_tag(tag).1
}

fn lookup(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == code)
                .map(|(_, t)| *t)
                .unwrap_or(code);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate that the language part of a tag is a known ISO 639 code
pub fn validate_language_tag(tag: &str) -> Result<()> {
    let code = base_code(tag);
    if lookup(&code).is_some() {
        Ok(())
    } else {
        Err(anyhow!("Invalid language tag: {}", tag))
    }
}

/// Normalize the language part of a tag to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(tag: &str) -> Result<String> {
    let code = base_code(tag);
    let lang = lookup(&code).ok_or_else(|| anyhow!("Cannot normalize invalid language tag: {}", tag))?;
    Ok(lang.to_639_3().to_string())
}

/// Normalize the language part of a tag to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(tag: &str) -> Result<String> {
    let code = base_code(tag);
    let lang = lookup(&code).ok_or_else(|| anyhow!("Cannot normalize invalid language tag: {}", tag))?;

    match lang.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Ok(lang.to_639_3().to_string()),
    }
}

/// Check if two tags name the same language, ignoring scripts
pub fn language_codes_match(tag1: &str, tag2: &str) -> bool {
    match (normalize_to_part2t(tag1), normalize_to_part2t(tag2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let code = base_code(tag);
    let lang = lookup(&code).ok_or_else(|| anyhow!("Failed to get language from tag: {}", tag))?;
    Ok(lang.to_name().to_string())
}
