use super::*;

fn lossy(args: Vec<OsString>) -> Vec<String> {
    args.into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn argument_layout_matches_raw_frame_contract() {
    let extra = vec!["-c:v".to_string(), "libx264".to_string()];
    let req = TranscodeRequest {
        audio: Path::new("/tmp/music"),
        resolution: Resolution::new(640, 360).unwrap(),
        output: Path::new("/tmp/music-1.mp4"),
        title: "title",
        artist: "artist",
        extra_options: &extra,
    };
    assert_eq!(
        lossy(transcode_args(&req)),
        vec![
            "-y",
            "-i",
            "/tmp/music",
            "-f",
            "rawvideo",
            "-framerate",
            "30",
            "-pixel_format",
            "bgr32",
            "-video_size",
            "640x360",
            "-i",
            "pipe:",
            "-vf",
            "format=yuv420p,vflip",
            "-metadata",
            "title=title",
            "-metadata",
            "artist=artist",
            "-c:v",
            "libx264",
            "/tmp/music-1.mp4",
        ]
    );
}

#[test]
fn metadata_values_are_not_escaped() {
    let req = TranscodeRequest {
        audio: Path::new("a"),
        resolution: Resolution::new(2, 2).unwrap(),
        output: Path::new("b.mp4"),
        title: "a = b; \"c\"",
        artist: "",
        extra_options: &[],
    };
    let args = lossy(transcode_args(&req));
    assert!(args.contains(&"title=a = b; \"c\"".to_string()));
    assert!(args.contains(&"artist=".to_string()));
    assert_eq!(args.last().unwrap(), "b.mp4");
}

#[test]
fn missing_binary_is_a_launch_failure() {
    let Ok(mut feeder) = std::process::Command::new("sh")
        .args(["-c", "true"])
        .stdout(Stdio::piped())
        .spawn()
    else {
        return;
    };
    let frames = feeder.stdout.take().unwrap();
    let req = TranscodeRequest {
        audio: Path::new("a"),
        resolution: Resolution::new(2, 2).unwrap(),
        output: Path::new("b.mp4"),
        title: "",
        artist: "",
        extra_options: &[],
    };
    let err = transcode(&EngineCommand::new("/nonexistent/mvsynth-ffmpeg"), &req, frames)
        .unwrap_err();
    assert!(matches!(err, MvError::ProcessLaunch(_)));
    feeder.wait().unwrap();
}
