use super::*;

#[test]
fn test_source_is_strictly_increasing() {
    let mut source = TimestampSource::new();
    assert_eq!(source.current(), None);
    let first = source.next();
    let second = source.next();
    assert!(first.is_less(second));
    assert!(!second.is_less(first));
    assert!(!first.is_less(first));
    assert_eq!(source.current(), Some(second));
}

#[test]
fn test_stamp_checks_once_per_pass() {
    let mut source = TimestampSource::new();
    let ctx = AnalysisContext::new(source.next());
    let stamp = CheckStamp::new();

    assert!(stamp.needs_check(&ctx));
    assert!(stamp.begin(&ctx));
    assert!(!stamp.needs_check(&ctx));
    assert!(!stamp.begin(&ctx));
    assert_eq!(stamp.last_checked(), Some(ctx.current_pass));
}

#[test]
fn test_new_pass_invalidates_stamp() {
    let mut source = TimestampSource::new();
    let first = AnalysisContext::new(source.next());
    let stamp = CheckStamp::new();
    assert!(stamp.begin(&first));
    stamp.set_erroneous(true);

    let second = AnalysisContext::new(source.next());
    assert!(stamp.needs_check(&second));
    assert!(stamp.begin(&second));
    assert!(!stamp.is_erroneous());
}

#[test]
fn test_older_pass_is_a_no_op() {
    let stamp = CheckStamp::new();
    let newer = AnalysisContext::new(CompilationTimestamp::new(5));
    let older = AnalysisContext::new(CompilationTimestamp::new(3));
    assert!(stamp.begin(&newer));
    stamp.set_erroneous(true);
    assert!(!stamp.begin(&older));
    assert!(stamp.is_erroneous());
}

#[test]
fn test_timestamp_display() {
    assert_eq!(CompilationTimestamp::new(7).to_string(), "#7");
}
