use super::*;
use crate::foundation::core::Resolution;
use crate::foundation::error::ErrorKind;
use std::io::Read as _;

fn invocation(args: &[&str]) -> RenderInvocation {
    RenderInvocation {
        args: args.iter().map(Into::into).collect(),
        resolution: Resolution::new(2, 2).unwrap(),
        background_color: 0,
    }
}

#[test]
fn missing_binary_is_a_launch_failure() {
    let engine = EngineCommand::new("/nonexistent/mvsynth-renderer");
    let err = start_renderer(&engine, &invocation(&[])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessLaunch);
    assert!(err.to_string().contains("/nonexistent/mvsynth-renderer"));
}

#[cfg(unix)]
#[test]
fn streams_stdout_and_joins() {
    let engine = EngineCommand::new("sh").arg("-c").arg("printf frames; printf \"$0\" >&2");
    let mut stream = start_renderer(&engine, &invocation(&["note"])).unwrap();

    let mut out = String::new();
    stream.take_stdout().unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "frames");
    assert!(stream.take_stdout().is_err());
    stream.wait().unwrap();
}

#[cfg(unix)]
#[test]
fn non_zero_exit_is_a_render_stream_failure() {
    let engine = EngineCommand::new("sh").arg("-c").arg("echo broken >&2; exit 4");
    let err = start_renderer(&engine, &invocation(&[]))
        .unwrap()
        .wait()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderStream);
    assert!(err.to_string().contains("broken"));
}

#[cfg(unix)]
#[test]
fn terminate_reports_a_renderer_that_failed_on_its_own() {
    let engine = EngineCommand::new("sh").arg("-c").arg("echo 'decoder crashed' >&2; exit 3");
    let mut stream = start_renderer(&engine, &invocation(&[])).unwrap();
    let mut out = Vec::new();
    stream.take_stdout().unwrap().read_to_end(&mut out).unwrap();

    let end = stream.terminate();
    let err = end.failure().unwrap();
    assert_eq!(err.kind(), ErrorKind::RenderStream);
    assert!(err.to_string().contains("decoder crashed"), "{err}");
}

#[cfg(unix)]
#[test]
fn terminate_kills_a_running_renderer_without_blaming_it() {
    let engine = EngineCommand::new("sh").arg("-c").arg("exec sleep 30");
    let stream = start_renderer(&engine, &invocation(&[])).unwrap();

    let end = stream.terminate();
    assert!(end.failure().is_none());
    assert!(end.to_string().starts_with("killed"), "{end}");
}

#[cfg(unix)]
#[test]
fn broken_pipe_death_is_not_a_render_failure() {
    let engine = EngineCommand::new("sh").arg("-c").arg("kill -PIPE $$");
    let mut stream = start_renderer(&engine, &invocation(&[])).unwrap();
    let mut out = Vec::new();
    stream.take_stdout().unwrap().read_to_end(&mut out).unwrap();

    assert!(stream.terminate().failure().is_none());
}
