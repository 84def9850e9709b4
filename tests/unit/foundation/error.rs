use super::*;

#[test]
fn constructors_carry_messages() {
    let e = PlotError::validation("bad input");
    assert_eq!(e.to_string(), "validation error: bad input");

    let e = PlotError::format("nope");
    assert_eq!(e.to_string(), "label format error: nope");

    let e = PlotError::text("no font");
    assert_eq!(e.to_string(), "text error: no font");

    let e = PlotError::canvas("io");
    assert_eq!(e.to_string(), "canvas error: io");
}

#[test]
fn anyhow_errors_wrap_transparently() {
    let e: PlotError = anyhow::anyhow!("lower level").into();
    assert_eq!(e.to_string(), "lower level");
}
