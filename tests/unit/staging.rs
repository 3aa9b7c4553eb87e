use super::*;
use crate::foundation::error::ErrorKind;
use crate::track::model::EffectConfig;
use std::sync::Mutex;

fn track(image: Option<&str>) -> Track {
    Track {
        title: "title".into(),
        artist: "artist".into(),
        music: AssetRef::new("music.mp3"),
        image: image.map(AssetRef::new),
        background_color: 0,
        effects: EffectConfig::default(),
    }
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

struct RecordingSource {
    inner: LocalAssetSource,
    fetched: Mutex<Vec<String>>,
}

impl AssetSource for RecordingSource {
    fn fetch_to(&self, asset: &AssetRef, dest: &Path) -> anyhow::Result<()> {
        self.fetched.lock().unwrap().push(asset.to_string());
        self.inner.fetch_to(asset, dest)
    }
}

#[test]
fn stages_audio_and_image_and_releases_everything() {
    let assets = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("music.mp3"), b"ID3").unwrap();
    std::fs::write(assets.path().join("cover.jpg"), b"JFIF").unwrap();

    let source = LocalAssetSource::new(assets.path());
    let staged = StagedInputs::stage(&source, &track(Some("cover.jpg")), Some(staging.path()))
        .unwrap();

    assert_eq!(std::fs::read(staged.audio()).unwrap(), b"ID3");
    assert_eq!(std::fs::read(staged.image().unwrap()).unwrap(), b"JFIF");
    let out_name = staged.output().file_name().unwrap().to_string_lossy().into_owned();
    assert!(out_name.starts_with("music-") && out_name.ends_with(".mp4"));
    assert_eq!(entries(staging.path()), 3);

    staged.release();
    assert_eq!(entries(staging.path()), 0);
}

#[test]
fn track_without_image_never_requests_image() {
    let assets = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("music.mp3"), b"ID3").unwrap();

    let source = RecordingSource {
        inner: LocalAssetSource::new(assets.path()),
        fetched: Mutex::new(Vec::new()),
    };
    let staged = StagedInputs::stage(&source, &track(None), Some(staging.path())).unwrap();
    assert!(staged.image().is_none());
    assert_eq!(*source.fetched.lock().unwrap(), vec!["music.mp3".to_string()]);
    assert_eq!(entries(staging.path()), 2);

    drop(staged);
    assert_eq!(entries(staging.path()), 0);
}

#[test]
fn missing_image_is_input_unavailable_and_leaves_nothing_behind() {
    let assets = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("music.mp3"), b"ID3").unwrap();

    let source = LocalAssetSource::new(assets.path());
    let err = StagedInputs::stage(&source, &track(Some("gone.jpg")), Some(staging.path()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputUnavailable);
    assert!(err.to_string().contains("image asset 'gone.jpg'"));
    assert_eq!(entries(staging.path()), 0);
}

#[test]
fn into_output_keeps_only_the_video() {
    let assets = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("music.mp3"), b"ID3").unwrap();

    let source = LocalAssetSource::new(assets.path());
    let staged = StagedInputs::stage(&source, &track(None), Some(staging.path())).unwrap();
    std::fs::write(staged.output(), b"mp4").unwrap();

    let video = staged.into_output().unwrap();
    assert_eq!(entries(staging.path()), 1);
    assert_eq!(std::fs::read(video.path()).unwrap(), b"mp4");

    let dest = staging.path().join("final").join("video.mp4");
    let kept = video.persist(&dest).unwrap();
    assert_eq!(kept, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), b"mp4");
    assert_eq!(entries(staging.path()), 1);
}

#[test]
fn kept_video_survives_drop_and_inputs_do_not() {
    let assets = tempfile::tempdir().unwrap();
    let staging = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("music.mp3"), b"ID3").unwrap();
    std::fs::write(assets.path().join("cover.jpg"), b"JFIF").unwrap();

    let source = LocalAssetSource::new(assets.path());
    let staged = StagedInputs::stage(&source, &track(Some("cover.jpg")), Some(staging.path()))
        .unwrap();
    let audio = staged.audio().to_path_buf();
    let image = staged.image().unwrap().to_path_buf();

    let video = staged.into_output().unwrap();
    let path = video.path().to_path_buf();
    drop(video);

    assert!(path.exists());
    assert!(!audio.exists());
    assert!(!image.exists());
    assert_eq!(entries(staging.path()), 1);
}
