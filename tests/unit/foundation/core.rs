use super::*;

#[test]
fn parses_and_displays_wxh() {
    let r: Resolution = "640x360".parse().unwrap();
    assert_eq!(r, Resolution::new(640, 360).unwrap());
    assert_eq!(r.to_string(), "640x360");
}

#[test]
fn rejects_malformed_strings() {
    for bad in ["", "640", "640x", "x360", "640*360", "-2x4", "axb"] {
        assert!(bad.parse::<Resolution>().is_err(), "accepted '{bad}'");
    }
}

#[test]
fn rejects_zero_and_odd_dimensions() {
    assert!(Resolution::new(0, 360).is_err());
    assert!(Resolution::new(640, 0).is_err());
    let err = Resolution::new(641, 360).unwrap_err();
    assert!(err.to_string().contains("even"));
}
