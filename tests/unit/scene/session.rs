use super::*;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> LayerImage {
    LayerImage::from_rgba(image::RgbaImage::from_pixel(
        w,
        h,
        image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
    ))
    .unwrap()
}

fn session() -> Session {
    Session::new(SessionOpts {
        canvas: Canvas::new(100, 100).unwrap(),
        seed: Some(12),
        render: RenderSettings::default().without_labels(),
    })
    .unwrap()
}

#[test]
fn stale_load_is_discarded() {
    let mut s = session();
    let a = s.begin_load(Slot::First);
    let b = s.begin_load(Slot::First);
    assert_eq!(s.finish_load(b, solid(4, 4, [0, 0, 255])), LoadOutcome::Committed);
    assert_eq!(s.finish_load(a, solid(8, 8, [255, 0, 0])), LoadOutcome::Stale);

    let layer = s.scene().layer(Slot::First);
    assert_eq!(layer.image().unwrap().width(), 4);
    assert!(layer.sampled_colors().iter().all(|c| c.b == 255));
}

#[test]
fn loads_into_different_slots_do_not_interfere() {
    let mut s = session();
    let a = s.begin_load(Slot::First);
    let b = s.begin_load(Slot::Second);
    assert_eq!(s.finish_load(a, solid(4, 4, [1, 2, 3])), LoadOutcome::Committed);
    assert_eq!(s.finish_load(b, solid(4, 4, [4, 5, 6])), LoadOutcome::Committed);
    assert!(s.scene().both_loaded());
}

#[test]
fn clear_invalidates_pending_loads() {
    let mut s = session();
    let t = s.begin_load(Slot::Second);
    s.apply(Command::ClearAll { confirmed: true }).unwrap();
    assert_eq!(s.finish_load(t, solid(4, 4, [1, 2, 3])), LoadOutcome::Stale);
    assert!(!s.scene().any_loaded());
}

#[test]
fn non_image_upload_is_ignored() {
    let mut s = session();
    let upload = Upload::new("text/plain", b"hello".to_vec());
    assert_eq!(s.load_upload(Slot::First, &upload).unwrap(), LoadOutcome::Ignored);
    assert!(!s.scene().any_loaded());
}

#[test]
fn keys_rotate_by_five_degrees() {
    let mut s = session();
    s.load_image(Slot::First, solid(4, 4, [1, 1, 1]));
    s.load_image(Slot::Second, solid(4, 4, [2, 2, 2]));
    assert!(s.apply(Command::Key('e')).unwrap().changed());
    s.apply(Command::Key('E')).unwrap();
    s.apply(Command::Key('a')).unwrap();
    assert_eq!(s.apply(Command::Key('z')).unwrap(), Outcome::Unchanged);
    let r1 = s.scene().layer(Slot::First).params.transform.rotation;
    let r2 = s.scene().layer(Slot::Second).params.transform.rotation;
    assert!((r1 - 2.0 * ROTATION_STEP).abs() < 1e-12);
    assert!((r2 + ROTATION_STEP).abs() < 1e-12);
    assert!((ROTATION_STEP.to_degrees() - 5.0).abs() < 1e-9);
}

#[test]
fn rotation_needs_an_image() {
    let mut s = session();
    assert_eq!(s.apply(Command::Key('q')).unwrap(), Outcome::Unchanged);
    assert_eq!(
        s.apply(Command::Rotate { slot: Slot::Second, dir: RotateDir::Cw }).unwrap(),
        Outcome::Unchanged
    );
    assert_eq!(s.scene().layer(Slot::First).params.transform.rotation, 0.0);
}

#[test]
fn setters_update_scene() {
    let mut s = session();
    s.apply(Command::SetOpacity { slot: Slot::Second, value: 0.25 }).unwrap();
    s.apply(Command::SetOffset { slot: Slot::First, x: 3, y: -4 }).unwrap();
    s.apply(Command::SetTint { slot: Slot::First, ink: Some(InkId::Yellow) }).unwrap();
    s.apply(Command::SetHue { slot: Slot::Second, degrees: 90.0 }).unwrap();
    s.apply(Command::SetScale { slot: Slot::Second, value: 1.5 }).unwrap();
    s.apply(Command::SetBlendMode(BlendMode::Screen)).unwrap();
    s.apply(Command::SetGrain(0.4)).unwrap();
    s.apply(Command::SetPaperTexture(false)).unwrap();
    s.apply(Command::ToggleSeparation).unwrap();

    let scene = s.scene();
    assert_eq!(scene.layer(Slot::Second).params.opacity, 0.25);
    let t = scene.layer(Slot::First).params.transform;
    assert_eq!((t.offset_x, t.offset_y), (3, -4));
    assert_eq!(scene.layer(Slot::First).params.tint, Some(InkId::Yellow));
    assert_eq!(scene.layer(Slot::Second).params.hue, 90.0);
    assert_eq!(scene.layer(Slot::Second).params.transform.scale, 1.5);
    assert_eq!(scene.blend_mode, BlendMode::Screen);
    assert_eq!(scene.grain_intensity, 0.4);
    assert!(!scene.paper_texture);
    assert!(scene.separation_mode);
}

#[test]
fn invalid_scale_is_rejected_without_change() {
    let mut s = session();
    assert!(s.apply(Command::SetScale { slot: Slot::First, value: 0.0 }).is_err());
    assert_eq!(s.scene().layer(Slot::First).params.transform.scale, 1.0);
}

#[test]
fn presets_need_both_images() {
    let mut s = session();
    s.load_image(Slot::First, solid(4, 4, [9, 9, 9]));
    let err = s
        .apply(Command::Misregistration(MisregistrationPreset::Extreme))
        .unwrap_err();
    assert_eq!(Session::user_message(&err).as_deref(), Some("Please load both images first!"));
    assert!(s.apply(Command::SurpriseMe).is_err());
}

#[test]
fn unconfirmed_clear_is_ignored() {
    let mut s = session();
    s.load_image(Slot::First, solid(4, 4, [9, 9, 9]));
    assert_eq!(s.apply(Command::ClearAll { confirmed: false }).unwrap(), Outcome::Unchanged);
    assert!(s.scene().any_loaded());
}

#[test]
fn clear_resets_layers_but_keeps_sheet_settings() {
    let mut s = session();
    s.load_image(Slot::First, solid(4, 4, [9, 9, 9]));
    s.load_image(Slot::Second, solid(4, 4, [9, 9, 9]));
    s.apply(Command::SetTint { slot: Slot::First, ink: Some(InkId::Teal) }).unwrap();
    s.apply(Command::SetGrain(0.6)).unwrap();
    s.apply(Command::SetPaperTexture(false)).unwrap();
    s.apply(Command::ToggleSeparation).unwrap();
    s.apply(Command::Misregistration(MisregistrationPreset::Extreme)).unwrap();

    s.apply(Command::ClearAll { confirmed: true }).unwrap();
    let scene = s.scene();
    assert!(!scene.any_loaded());
    for slot in Slot::BOTH {
        assert_eq!(scene.layer(slot).params, LayerParams::default());
        assert!(scene.layer(slot).sampled_colors().is_empty());
    }
    assert_eq!(scene.blend_mode, BlendMode::Normal);
    assert_eq!(scene.grain_intensity, 0.6);
    assert!(!scene.paper_texture);
    assert!(scene.separation_mode);
}

#[test]
fn drag_moves_layer_and_updates_cursor() {
    let mut s = session();
    s.load_image(Slot::First, solid(10, 10, [9, 9, 9]));
    assert_eq!(s.cursor_hint(Point::new(50.0, 50.0)), CursorHint::Grab);
    s.apply(Command::PointerDown(Point::new(50.0, 50.0))).unwrap();
    assert_eq!(s.cursor_hint(Point::new(0.0, 0.0)), CursorHint::Grabbing);
    assert!(s.apply(Command::PointerMove(Point::new(60.0, 30.0))).unwrap().changed());
    s.apply(Command::PointerLeave).unwrap();
    assert_eq!(s.drag_state(), DragState::Idle);
    assert_eq!(
        s.scene().layer(Slot::First).params.transform.translate,
        crate::foundation::core::Vec2::new(10.0, -20.0)
    );
    assert!(!s.apply(Command::PointerMove(Point::new(0.0, 0.0))).unwrap().changed());
}

#[test]
fn effects_need_sampled_colors() {
    let mut s = session();
    let err = s.draw_effect(GenerativeEffect::Dots).unwrap_err();
    assert!(err.is_user_warning());
    s.load_image(Slot::First, solid(4, 4, [200, 10, 10]));
    let frame = s.draw_effect(GenerativeEffect::Dots).unwrap();
    assert_eq!(frame.size(), (100, 100));
}

#[test]
fn export_render_ignores_separation() {
    let mut s = session();
    s.load_image(Slot::First, solid(10, 10, [200, 10, 10]));
    s.apply(Command::ToggleSeparation).unwrap();
    let shown = s.render().unwrap();
    let export = s.render_for_export().unwrap();
    assert_ne!(shown, export);
    s.apply(Command::ToggleSeparation).unwrap();
    assert_eq!(s.render().unwrap(), export);
}

#[test]
fn explicit_seed_wins_over_env() {
    assert_eq!(resolve_seed(Some(5)), Some(5));
}
