use super::*;

#[test]
fn test_wildcards() {
    let pattern = WildcardPatternCompiler.compile("ab?d*", false).unwrap();
    assert!(pattern.matches("abcd"));
    assert!(pattern.matches("abxdyyy/zz"));
    assert!(!pattern.matches("abd"));
    assert!(!pattern.matches("ABCD"));
    assert_eq!(pattern.source(), "ab?d*");
    assert!(!pattern.is_case_insensitive());
}

#[test]
fn test_case_insensitive() {
    let pattern = WildcardPatternCompiler.compile("hello*", true).unwrap();
    assert!(pattern.matches("HeLLo world"));
    assert!(pattern.is_case_insensitive());
}

#[test]
fn test_escaped_wildcard_is_literal() {
    let pattern = WildcardPatternCompiler.compile("a\\*b", false).unwrap();
    assert!(pattern.matches("a*b"));
    assert!(!pattern.matches("axb"));
}

#[test]
fn test_invalid_pattern_reports_its_text() {
    let err = WildcardPatternCompiler.compile("[a-", false).unwrap_err();
    assert_eq!(err.pattern, "[a-");
    assert!(err.to_string().starts_with("invalid pattern \"[a-\""));
}
