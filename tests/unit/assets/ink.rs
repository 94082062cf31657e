use super::*;

#[test]
fn palette_order_matches_enum_order() {
    for (idx, id) in InkId::ALL.iter().enumerate() {
        assert_eq!(palette()[idx].id, *id);
        assert_eq!(id.ink().id, *id);
    }
}

#[test]
fn keys_roundtrip_through_parse_and_serde() {
    for id in InkId::ALL {
        assert_eq!(InkId::from_key(id.key()), Some(id));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.key()));
        let back: InkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

#[test]
fn known_ink_values() {
    assert_eq!(InkId::FluorescentPink.rgb(), Rgb8::new(255, 72, 176));
    assert_eq!(InkId::BrightRed.name(), "Bright Red");
    assert_eq!(InkId::Black.rgb(), Rgb8::new(0, 0, 0));
}

#[test]
fn unknown_ink_is_a_validation_error() {
    assert!(InkId::from_key("magenta").is_none());
    let err = "magenta".parse::<InkId>().unwrap_err();
    assert!(matches!(err, RisoError::Validation(_)));
    assert_eq!(" Teal ".parse::<InkId>().unwrap(), InkId::Teal);
}
