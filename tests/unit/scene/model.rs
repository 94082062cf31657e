use super::*;

fn tiny_image() -> LayerImage {
    LayerImage::from_rgba(image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]))).unwrap()
}

#[test]
fn defaults_match_first_load_state() {
    let s = SceneState::default();
    assert_eq!(s.blend_mode, BlendMode::Multiply);
    assert!((s.grain_intensity - 0.15).abs() < 1e-12);
    assert!(s.paper_texture);
    assert!(!s.separation_mode);
    assert!(!s.any_loaded());
    s.validate().unwrap();
}

#[test]
fn slots_index_their_own_layer() {
    let mut layers = Layers::new(1, 2);
    assert_eq!(layers[Slot::First], 1);
    assert_eq!(layers[Slot::Second], 2);
    layers[Slot::Second] = 5;
    let collected: Vec<_> = layers.iter().map(|(s, v)| (s.number(), *v)).collect();
    assert_eq!(collected, vec![(1, 1), (2, 5)]);
    assert_eq!(Slot::from_number(2), Some(Slot::Second));
    assert_eq!(Slot::from_number(3), None);
    assert_eq!(Slot::First.other(), Slot::Second);
}

#[test]
fn blend_mode_parses_css_names() {
    for mode in BlendMode::ALL {
        assert_eq!(mode.css_name().parse::<BlendMode>().unwrap(), mode);
    }
    assert_eq!("source-over".parse::<BlendMode>().unwrap(), BlendMode::Normal);
    assert_eq!(" Color-Dodge ".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
    assert!("plus-lighter".parse::<BlendMode>().is_err());
}

#[test]
fn blend_mode_serde_uses_kebab_case() {
    let s = serde_json::to_string(&BlendMode::SoftLight).unwrap();
    assert_eq!(s, "\"soft-light\"");
    let m: BlendMode = serde_json::from_str("\"source-over\"").unwrap();
    assert_eq!(m, BlendMode::Normal);
}

#[test]
fn opacity_is_clamped() {
    let mut s = SceneState::default();
    s.set_opacity(Slot::First, 1.7).unwrap();
    assert_eq!(s.layer(Slot::First).params.opacity, 1.0);
    s.set_opacity(Slot::First, -0.2).unwrap();
    assert_eq!(s.layer(Slot::First).params.opacity, 0.0);
    assert!(s.set_opacity(Slot::First, f64::NAN).is_err());
}

#[test]
fn scale_and_grain_are_validated() {
    let mut s = SceneState::default();
    assert!(s.set_scale(Slot::Second, 0.0).is_err());
    assert!(s.set_scale(Slot::Second, -1.0).is_err());
    s.set_scale(Slot::Second, 2.5).unwrap();
    assert_eq!(s.layer(Slot::Second).params.transform.scale, 2.5);

    assert!(s.set_grain(-0.1).is_err());
    s.set_grain(0.0).unwrap();
    assert_eq!(s.grain_intensity, 0.0);
}

#[test]
fn validate_rejects_out_of_range_fields() {
    let mut s = SceneState::default();
    s.layer_mut(Slot::First).params.opacity = 2.0;
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("layer 1"));

    let mut s = SceneState::default();
    s.layer_mut(Slot::Second).params.transform.scale = 0.0;
    assert!(s.validate().is_err());
}

#[test]
fn reload_resets_geometry_but_keeps_pass_settings() {
    let mut layer = ImageLayer::default();
    layer.params.tint = Some(InkId::Teal);
    layer.params.opacity = 0.4;
    layer.params.hue = 90.0;
    layer.params.transform.rotation = 1.0;
    layer.params.transform.offset_x = 7;
    layer.replace_image(tiny_image(), vec![Rgb8::new(1, 2, 3)]);

    assert!(layer.is_loaded());
    assert_eq!(layer.sampled_colors(), &[Rgb8::new(1, 2, 3)]);
    assert_eq!(layer.params.transform, LayerTransform::default());
    assert_eq!(layer.params.hue, 0.0);
    assert_eq!(layer.params.tint, Some(InkId::Teal));
    assert_eq!(layer.params.opacity, 0.4);

    layer.reset();
    assert!(!layer.is_loaded());
    assert!(layer.sampled_colors().is_empty());
    assert_eq!(layer.params, LayerParams::default());
}

#[test]
fn palette_unions_both_layers() {
    let mut s = SceneState::default();
    s.layer_mut(Slot::First)
        .replace_image(tiny_image(), vec![Rgb8::new(1, 1, 1)]);
    s.layer_mut(Slot::Second)
        .replace_image(tiny_image(), vec![Rgb8::new(2, 2, 2), Rgb8::new(3, 3, 3)]);
    assert!(s.both_loaded());
    assert_eq!(
        s.combined_palette(),
        vec![Rgb8::new(1, 1, 1), Rgb8::new(2, 2, 2), Rgb8::new(3, 3, 3)]
    );
}

#[test]
fn params_deserialize_with_defaults() {
    let p: LayerParams = serde_json::from_str(r#"{"tint":"fluorescent-pink","opacity":0.5}"#).unwrap();
    assert_eq!(p.tint, Some(InkId::FluorescentPink));
    assert_eq!(p.opacity, 0.5);
    assert_eq!(p.transform.scale, 1.0);
}
