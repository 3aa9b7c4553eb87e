//! mvsynth turns a music track into a video.
//!
//! An external rendering engine draws audio-reactive visuals as raw frames on its stdout; those
//! frames are piped straight into the system `ffmpeg`, which muxes them with the original audio.
//!
//! # Pipeline overview
//!
//! 1. **Stage**: fetch the track's audio (and artwork, when present) to local temp files and
//!    reserve the output file ([`StagedInputs`])
//! 2. **Translate**: `Track + EffectConfig -> RenderInvocation` ([`translate`])
//! 3. **Render**: launch the renderer with its stdout piped ([`start_renderer`])
//! 4. **Transcode**: launch `ffmpeg` reading that pipe plus the audio file and wait for it
//!    ([`transcode`])
//! 5. **Join**: check the renderer's own exit status, keep the output or clean everything up
//!
//! [`MusicVideoConverter`] runs all five steps.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No shell**: every argument is passed to the engines as a discrete vector.
//! - **No leftovers**: staged files and child processes are owned by guards, so every exit path,
//!   including cancellation and timeouts, releases them.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod pipeline;
mod process;
mod staging;
mod track;
mod translate;

pub use foundation::core::{RAW_FRAME_RATE, RAW_PIXEL_FORMAT, Resolution};
pub use foundation::error::{ErrorKind, MvError, MvResult};
pub use pipeline::config::ConverterConfig;
pub use pipeline::convert::MusicVideoConverter;
pub use process::EngineCommand;
pub use process::render::{RenderStream, start_renderer};
pub use process::transcode::{TranscodeExit, TranscodeRequest, transcode, transcode_args};
pub use process::watch::CancelFlag;
pub use staging::{
    AssetSource, ConvertedVideo, LocalAssetSource, StagedInputs, ensure_parent_dir,
};
pub use track::model::{
    AssetRef, Band, BandThreshold, BannerEffect, BlurEffect, EffectConfig, LightleaksEffect,
    ParticleEffect, SpectrumEffect, TextEffect, Track,
};
pub use track::record::TrackRecord;
pub use translate::{RenderInvocation, TranslateInputs, translate};
