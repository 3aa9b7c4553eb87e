use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{MvError, MvResult};
use crate::track::model::{
    AssetRef, Band, BandThreshold, BannerEffect, BlurEffect, EffectConfig, LightleaksEffect,
    ParticleEffect, SpectrumEffect, TextEffect, Track,
};

/// Flat stored attributes of a track, as read from its database row.
///
/// Every effect field defaults to zero; a missing attribute therefore disables its group. Field
/// names mirror the stored column names.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    /// Storage key of the source audio.
    pub music: String,
    /// Storage key of the artwork, if any.
    pub video_image: Option<String>,
    pub video_backgroundcolor: u32,

    pub video_banner_alpha: f64,

    pub video_text_alpha: f64,
    pub video_text_color: u32,

    pub video_blur_movement_band_top: u32,
    pub video_blur_movement_band_bottom: u32,
    pub video_blur_movement_threshold: u32,
    pub video_blur_blink_band_top: u32,
    pub video_blur_blink_band_bottom: u32,
    pub video_blur_blink_threshold: u32,

    pub video_particle_limit_band_top: u32,
    pub video_particle_limit_band_bottom: u32,
    pub video_particle_limit_threshold: u32,
    pub video_particle_alpha: f64,
    pub video_particle_color: u32,

    pub video_lightleaks_alpha: f64,
    pub video_lightleaks_interval: u32,

    pub video_spectrum_mode: u32,
    pub video_spectrum_alpha: f64,
    pub video_spectrum_color: u32,
}

impl TrackRecord {
    /// Parse a record from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MvResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MvError::validation(format!("parse track record JSON: {e}")))
    }

    /// Parse a record from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MvResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MvError::validation(format!("open track record '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the typed effect configuration, deciding which groups are enabled.
    pub fn effects(&self) -> EffectConfig {
        EffectConfig {
            banner: BannerEffect::enabled(self.video_banner_alpha),
            text: TextEffect::enabled(self.video_text_alpha, self.video_text_color),
            blur: BlurEffect::enabled(
                band_threshold(
                    self.video_blur_movement_band_top,
                    self.video_blur_movement_band_bottom,
                    self.video_blur_movement_threshold,
                ),
                band_threshold(
                    self.video_blur_blink_band_top,
                    self.video_blur_blink_band_bottom,
                    self.video_blur_blink_threshold,
                ),
            ),
            particle: ParticleEffect::enabled(
                band_threshold(
                    self.video_particle_limit_band_top,
                    self.video_particle_limit_band_bottom,
                    self.video_particle_limit_threshold,
                ),
                self.video_particle_alpha,
                self.video_particle_color,
            ),
            lightleaks: LightleaksEffect::enabled(
                self.video_lightleaks_alpha,
                self.video_lightleaks_interval,
            ),
            spectrum: SpectrumEffect::enabled(
                self.video_spectrum_mode,
                self.video_spectrum_alpha,
                self.video_spectrum_color,
            ),
        }
    }

    /// Convert into a [`Track`].
    pub fn into_track(self) -> MvResult<Track> {
        if self.music.trim().is_empty() {
            return Err(MvError::validation("track record has no music asset"));
        }
        let effects = self.effects();
        Ok(Track {
            title: self.title,
            artist: self.artist,
            music: AssetRef::new(self.music),
            image: self
                .video_image
                .filter(|key| !key.trim().is_empty())
                .map(AssetRef::new),
            background_color: self.video_backgroundcolor,
            effects,
        })
    }
}

fn band_threshold(top: u32, bottom: u32, threshold: u32) -> BandThreshold {
    BandThreshold {
        band: Band { top, bottom },
        threshold,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/record.rs"]
mod tests;
