//! Effect parameter translation.
//!
//! Turns a [`Track`] into the renderer's argument vector. Groups are emitted in a fixed order
//! (banner, text, blur, particle, lightleaks, spectrum); the renderer reads flags by name, but
//! the flags of one group stay adjacent and in their documented order.

use std::ffi::{OsStr, OsString};
use std::fmt::Display;
use std::path::Path;

use crate::foundation::core::Resolution;
use crate::track::model::{EffectConfig, Track};

/// Local paths the translator needs besides the track itself.
#[derive(Clone, Copy, Debug)]
pub struct TranslateInputs<'a> {
    /// Materialized audio file.
    pub music: &'a Path,
    /// Materialized artwork, if the track has one.
    pub image: Option<&'a Path>,
    /// Bundled artwork used when `image` is `None`.
    pub default_artwork: &'a Path,
    /// Bundled banner image drawn by the banner effect.
    pub banner_image: &'a Path,
}

/// Fully translated renderer invocation. Derived fresh for every run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderInvocation {
    /// Arguments following the renderer's configured prefix.
    pub args: Vec<OsString>,
    /// Requested frame size.
    pub resolution: Resolution,
    /// Background color passed with `--backgroundcolor`.
    pub background_color: u32,
}

impl RenderInvocation {
    /// Arguments as UTF-8 strings (lossy), for logging and dry runs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Build the renderer invocation for `track` at `resolution`.
pub fn translate(
    track: &Track,
    resolution: Resolution,
    inputs: &TranslateInputs<'_>,
) -> RenderInvocation {
    let mut args = ArgList::default();
    args.push(inputs.music);
    args.value("--resolution", resolution);
    args.value("--backgroundcolor", track.background_color);
    args.path("--image", inputs.image.unwrap_or(inputs.default_artwork));
    push_effects(&mut args, track, &track.effects, inputs);

    RenderInvocation {
        args: args.0,
        resolution,
        background_color: track.background_color,
    }
}

fn push_effects(args: &mut ArgList, track: &Track, fx: &EffectConfig, inputs: &TranslateInputs<'_>) {
    if let Some(banner) = fx.banner {
        args.path("--banner.image", inputs.banner_image);
        args.value("--banner.alpha", banner.alpha);
    }

    if let Some(text) = fx.text {
        args.value("--text.alpha", text.alpha);
        args.value("--text.color", text.color);
        args.value("--text.title", &track.title);
        args.value("--text.sub", &track.artist);
    }

    if let Some(blur) = fx.blur {
        args.value("--blur.movement.band.top", blur.movement.band.top);
        args.value("--blur.movement.band.bottom", blur.movement.band.bottom);
        args.value("--blur.movement.threshold", blur.movement.threshold);
        args.value("--blur.blink.band.top", blur.blink.band.top);
        args.value("--blur.blink.band.bottom", blur.blink.band.bottom);
        args.value("--blur.blink.threshold", blur.blink.threshold);
    }

    if let Some(particle) = fx.particle {
        args.value("--particle.limit.band.top", particle.limit.band.top);
        args.value("--particle.limit.band.bottom", particle.limit.band.bottom);
        args.value("--particle.limit.threshold", particle.limit.threshold);
        args.value("--particle.alpha", particle.alpha);
        args.value("--particle.color", particle.color);
    }

    if let Some(lightleaks) = fx.lightleaks {
        args.value("--lightleaks.alpha", lightleaks.alpha);
        args.value("--lightleaks.interval", lightleaks.interval);
    }

    if let Some(spectrum) = fx.spectrum {
        args.value("--spectrum.mode", spectrum.mode);
        args.value("--spectrum.alpha", spectrum.alpha);
        args.value("--spectrum.color", spectrum.color);
    }
}

#[derive(Default)]
struct ArgList(Vec<OsString>);

impl ArgList {
    fn push(&mut self, arg: impl AsRef<OsStr>) {
        self.0.push(arg.as_ref().to_os_string());
    }

    fn value(&mut self, flag: &str, value: impl Display) {
        self.push(flag);
        self.0.push(value.to_string().into());
    }

    fn path(&mut self, flag: &str, path: &Path) {
        self.push(flag);
        self.push(path);
    }
}

#[cfg(test)]
#[path = "../tests/unit/translate.rs"]
mod tests;
