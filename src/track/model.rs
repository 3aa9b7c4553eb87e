use std::fmt;

/// Opaque reference to an asset held by the storage collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetRef(String);

impl AssetRef {
    /// Wrap a storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the storage key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One audio work plus its artwork and visual-effect settings.
///
/// The pipeline only ever reads a track.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Track title, embedded as the `title` metadata tag and drawn by the text effect.
    pub title: String,
    /// Artist name, embedded as the `artist` metadata tag and drawn by the text effect.
    pub artist: String,
    /// Source audio.
    pub music: AssetRef,
    /// Optional still artwork; the bundled default artwork is used when absent.
    pub image: Option<AssetRef>,
    /// Background color handed to the renderer (packed `0xRRGGBB`).
    pub background_color: u32,
    /// Visual effects to draw.
    pub effects: EffectConfig,
}

/// Frequency band `[bottom, top]` the renderer reacts to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Band {
    /// Upper bound.
    pub top: u32,
    /// Lower bound.
    pub bottom: u32,
}

/// A band together with the level that triggers the effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandThreshold {
    /// Frequency band.
    pub band: Band,
    /// Trigger level.
    pub threshold: u32,
}

/// "Made with" banner overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerEffect {
    /// Non-zero opacity.
    pub alpha: f64,
}

/// Title/artist caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextEffect {
    /// Non-zero opacity.
    pub alpha: f64,
    /// Packed `0xRRGGBB` text color.
    pub color: u32,
}

/// Audio-reactive blur driven by two bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurEffect {
    /// Band driving the blur movement.
    pub movement: BandThreshold,
    /// Band driving the blur blink.
    pub blink: BandThreshold,
}

/// Audio-reactive particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleEffect {
    /// Band limiting particle emission.
    pub limit: BandThreshold,
    /// Non-zero opacity.
    pub alpha: f64,
    /// Packed `0xRRGGBB` particle color.
    pub color: u32,
}

/// Periodic light leaks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightleaksEffect {
    /// Non-zero opacity.
    pub alpha: f64,
    /// Interval between leaks.
    pub interval: u32,
}

/// Spectrum analyzer overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectrumEffect {
    /// Renderer-defined drawing mode.
    pub mode: u32,
    /// Non-zero opacity.
    pub alpha: f64,
    /// Packed `0xRRGGBB` spectrum color.
    pub color: u32,
}

/// The set of enabled effect groups.
///
/// A group is `Some` only when its enabling field is non-zero; the constructors below are the only
/// place that rule lives.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectConfig {
    /// Banner overlay.
    pub banner: Option<BannerEffect>,
    /// Caption.
    pub text: Option<TextEffect>,
    /// Blur.
    pub blur: Option<BlurEffect>,
    /// Particles.
    pub particle: Option<ParticleEffect>,
    /// Light leaks.
    pub lightleaks: Option<LightleaksEffect>,
    /// Spectrum.
    pub spectrum: Option<SpectrumEffect>,
}

impl EffectConfig {
    /// `true` when no group is enabled.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn enabled(alpha: f64) -> bool {
    alpha != 0.0
}

impl BannerEffect {
    /// Enabled iff `alpha` is non-zero.
    pub fn enabled(alpha: f64) -> Option<Self> {
        enabled(alpha).then_some(Self { alpha })
    }
}

impl TextEffect {
    /// Enabled iff `alpha` is non-zero.
    pub fn enabled(alpha: f64, color: u32) -> Option<Self> {
        enabled(alpha).then_some(Self { alpha, color })
    }
}

impl BlurEffect {
    /// Enabled iff both `movement.band.top` and `blink.band.top` are non-zero.
    pub fn enabled(movement: BandThreshold, blink: BandThreshold) -> Option<Self> {
        (movement.band.top != 0 && blink.band.top != 0).then_some(Self { movement, blink })
    }
}

impl ParticleEffect {
    /// Enabled iff `alpha` is non-zero.
    pub fn enabled(limit: BandThreshold, alpha: f64, color: u32) -> Option<Self> {
        enabled(alpha).then_some(Self {
            limit,
            alpha,
            color,
        })
    }
}

impl LightleaksEffect {
    /// Enabled iff `alpha` is non-zero.
    pub fn enabled(alpha: f64, interval: u32) -> Option<Self> {
        enabled(alpha).then_some(Self { alpha, interval })
    }
}

impl SpectrumEffect {
    /// Enabled iff `alpha` is non-zero.
    pub fn enabled(mode: u32, alpha: f64, color: u32) -> Option<Self> {
        enabled(alpha).then_some(Self { mode, alpha, color })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/model.rs"]
mod tests;
