/*!
 * Tests for language tag utilities
 */

use lingbridge::language_utils::{
    base_code, get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
    script_of, validate_language_tag,
};

#[test]
fn test_baseCode_shouldLowercaseLanguagePart() {
    assert_eq!(base_code("ENG_Latn"), "eng");
    assert_eq!(base_code(" zh "), "zh");
}

#[test]
fn test_scriptOf_shouldReturnScriptSubtag() {
    assert_eq!(script_of("hin_Deva"), Some("Deva"));
    assert_eq!(script_of("urd-Arab"), Some("Arab"));
    assert_eq!(script_of("zh"), None);
}

#[test]
fn test_validateLanguageTag_withCatalogTags_shouldSucceed() {
    for tag in ["eng_Latn", "hin_Deva", "urd_Arab", "zh", "fre"] {
        assert!(validate_language_tag(tag).is_ok(), "{} should be valid", tag);
    }
    assert!(validate_language_tag("xx_Latn").is_err());
    assert!(validate_language_tag("").is_err());
}

#[test]
fn test_normalize_shouldMapBetweenIsoParts() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part1_or_part2t("urd_Arab").unwrap(), "ur");
}

#[test]
fn test_languageCodesMatch_shouldIgnoreScriptAndCodeLength() {
    assert!(language_codes_match("eng_Latn", "en"));
    assert!(language_codes_match("zh", "zho"));
    assert!(!language_codes_match("hin_Deva", "urd_Arab"));
    assert!(!language_codes_match("invalid", "en"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("hin_Deva").unwrap(), "Hindi");
    assert_eq!(get_language_name("eng_Latn").unwrap(), "English");
    assert!(get_language_name("qq").is_err());
}
