use super::*;
use serde_json::json;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!("#f00".parse::<Rgba8>().unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!("#0F08".parse::<Rgba8>().unwrap(), Rgba8::new(0, 255, 0, 136));
    assert_eq!("00ff00".parse::<Rgba8>().unwrap(), Rgba8::rgb(0, 255, 0));
    assert_eq!(
        "#0000ff80".parse::<Rgba8>().unwrap(),
        Rgba8::new(0, 0, 255, 128)
    );
}

#[test]
fn rejects_malformed_hex() {
    assert!(matches!(
        "#ff000".parse::<Rgba8>(),
        Err(FimError::Validation(_))
    ));
    assert!(matches!("#gg0000".parse::<Rgba8>(), Err(FimError::Validation(_))));
    assert!(matches!("#é00".parse::<Rgba8>(), Err(FimError::Validation(_))));
}

#[test]
fn deserializes_hex_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!("#00f")).unwrap();
    assert_eq!(c, Rgba8::rgb(0, 0, 255));

    let c: Rgba8 = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Rgba8::rgb(1, 2, 3));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgba8::new(1, 2, 3, 4));

    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn float_conversion_roundtrips_exact_bytes() {
    for v in [0u8, 1, 127, 128, 254, 255] {
        let c = Rgba8::new(v, 255 - v, v / 2, 255);
        assert_eq!(Rgba8::from_f32(c.to_f32()), c);
    }
    assert_eq!(Rgba8::from_f32([2.0, -1.0, 0.5, 1.0]), Rgba8::new(255, 0, 128, 255));
}

#[test]
fn display_is_long_hex() {
    assert_eq!(Rgba8::rgb(255, 0, 16).to_string(), "#ff0010ff");
}

#[test]
fn size_rejects_zero_and_oversized() {
    assert!(Size::new(1, 1).is_ok());
    assert!(matches!(Size::new(0, 10), Err(FimError::Validation(_))));
    assert!(matches!(Size::new(10, 0), Err(FimError::Validation(_))));
    assert!(matches!(
        Size::new(MAX_CANVAS_DIMENSION + 1, 1),
        Err(FimError::Validation(_))
    ));
    let s = Size::new(3, 2).unwrap();
    assert_eq!(s.rgba_len(), 24);
    assert!(s.contains(2, 1));
    assert!(!s.contains(3, 0));
}
