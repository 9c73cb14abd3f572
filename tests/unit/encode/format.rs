use super::*;
use serde_json::json;

#[test]
fn mime_strings_roundtrip() {
    for m in [ImageMime::Png, ImageMime::Jpeg] {
        assert_eq!(m.as_str().parse::<ImageMime>().unwrap(), m);
    }
}

#[test]
fn unknown_mime_is_unsupported_format() {
    assert!(matches!(
        "image/webp".parse::<ImageMime>(),
        Err(FimError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        EncodeOptions::from_mime("image/gif", None),
        Err(FimError::UnsupportedFormat(_))
    ));
}

#[test]
fn options_default_to_png() {
    assert_eq!(EncodeOptions::default().format, ImageMime::Png);
    let opts: EncodeOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(opts, EncodeOptions::png());
}

#[test]
fn options_deserialize_type_and_format_alias() {
    let opts: EncodeOptions =
        serde_json::from_value(json!({"type": "image/jpeg", "quality": 0.5})).unwrap();
    assert_eq!(opts, EncodeOptions::jpeg(0.5));

    let opts: EncodeOptions = serde_json::from_value(json!({"format": "image/png"})).unwrap();
    assert_eq!(opts.format, ImageMime::Png);

    assert!(serde_json::from_value::<EncodeOptions>(json!({"type": "image/bmp"})).is_err());
}

#[test]
fn blob_reports_mime_and_len() {
    let b = Blob::new(ImageMime::Jpeg, vec![1, 2, 3]);
    assert_eq!(b.mime_type(), "image/jpeg");
    assert_eq!(b.len(), 3);
    assert!(!b.is_empty());
    assert_eq!(b.into_bytes(), vec![1, 2, 3]);
}
