use super::*;

#[test]
fn empty_record_has_no_effects() {
    let rec = TrackRecord::from_reader(r#"{ "title": "title", "music": "a.mp3" }"#.as_bytes())
        .unwrap();
    assert!(rec.effects().is_empty());

    let track = rec.into_track().unwrap();
    assert_eq!(track.title, "title");
    assert_eq!(track.artist, "");
    assert_eq!(track.image, None);
    assert_eq!(track.background_color, 0);
}

#[test]
fn stored_attributes_map_to_groups() {
    let json = r#"{
        "title": "title",
        "artist": "artist",
        "music": "a.mp3",
        "video_image": "cover.jpg",
        "video_blur_movement_band_bottom": 50,
        "video_blur_movement_band_top": 300,
        "video_blur_movement_threshold": 165,
        "video_blur_blink_band_bottom": 2000,
        "video_blur_blink_band_top": 15000,
        "video_blur_blink_threshold": 165,
        "video_particle_limit_band_bottom": 300,
        "video_particle_limit_band_top": 2000,
        "video_particle_limit_threshold": 165,
        "video_particle_alpha": 1,
        "video_particle_color": 16711680,
        "video_spectrum_mode": 0,
        "video_spectrum_color": 16711680
    }"#;
    let track = TrackRecord::from_reader(json.as_bytes())
        .unwrap()
        .into_track()
        .unwrap();

    assert_eq!(track.image, Some(AssetRef::new("cover.jpg")));

    let blur = track.effects.blur.unwrap();
    assert_eq!(blur.movement.band, Band { top: 300, bottom: 50 });
    assert_eq!(blur.blink.band, Band { top: 15000, bottom: 2000 });
    assert_eq!(blur.blink.threshold, 165);

    let particle = track.effects.particle.unwrap();
    assert_eq!(particle.limit.band, Band { top: 2000, bottom: 300 });
    assert_eq!(particle.color, 0xff0000);

    // Spectrum has a color but no alpha, so it stays off.
    assert_eq!(track.effects.spectrum, None);
    assert_eq!(track.effects.banner, None);
    assert_eq!(track.effects.text, None);
    assert_eq!(track.effects.lightleaks, None);
}

#[test]
fn single_blur_band_does_not_enable_blur() {
    let rec = TrackRecord {
        music: "a.mp3".into(),
        video_blur_blink_band_top: 15000,
        ..TrackRecord::default()
    };
    assert_eq!(rec.effects().blur, None);
}

#[test]
fn missing_music_is_rejected() {
    let err = TrackRecord::default().into_track().unwrap_err();
    assert!(err.to_string().contains("no music asset"));
}

#[test]
fn blank_image_key_means_no_image() {
    let rec = TrackRecord {
        music: "a.mp3".into(),
        video_image: Some("  ".into()),
        ..TrackRecord::default()
    };
    assert_eq!(rec.into_track().unwrap().image, None);
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = TrackRecord::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("parse track record JSON"));
}
