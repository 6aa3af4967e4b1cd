/*!
 * Tests for language utility functions
 */

use srtsmith::language_utils::{validate_language_code, normalize_to_part1_or_part2t};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    // ISO 639-1
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("fr").is_ok());

    // ISO 639-2/T
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("deu").is_ok());

    // ISO 639-2/B
    assert!(validate_language_code("fre").is_ok());
    assert!(validate_language_code("ger").is_ok());

    // Whitespace and case
    assert!(validate_language_code(" EN ").is_ok());
    assert!(validate_language_code("ENG").is_ok());
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test normalization to the short form the tokenizer keys on
#[test]
fn test_normalize_to_part1_or_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part1_or_part2t("en").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("fre").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t(" SPA ").unwrap(), "es");
}

#[test]
fn test_normalize_to_part1_or_part2t_withInvalidCode_shouldFail() {
    assert!(normalize_to_part1_or_part2t("zz").is_err());
}
