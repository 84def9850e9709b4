use super::*;

#[test]
fn approx_metrics_scale_with_text_and_size() {
    let mut m = ApproxMetrics::default();
    assert_eq!(m.measure("abc", 10.0), (18.0, 10.0));
    assert_eq!(m.measure("abc", 20.0), (36.0, 20.0));
    assert_eq!(m.measure("", 10.0), (0.0, 10.0));
}

#[test]
fn parley_metrics_reject_empty_font_bytes() {
    assert!(ParleyMetrics::new(Vec::new()).is_err());
}
