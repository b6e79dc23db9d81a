//! Per-frame data handed to a renderer
//!
//! Nothing here draws. A [`FrameSink`] receives one [`FrameView`] per tick
//! and turns it into pixels however it likes.

use glam::DVec2;
use log::debug;
use serde::Serialize;

use crate::consts::*;
use crate::sim::StarState;

/// Which pre-rendered sprite variant to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKey {
    Default,
    Snarky,
    Custom,
}

/// Sprite to draw this frame, plus a color to rasterize first if the
/// custom variant is stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRequest {
    pub key: SpriteKey,
    pub rasterize: Option<String>,
}

/// Tracks which color the custom sprite variant was last rendered in
#[derive(Debug, Clone, Default)]
pub struct SpriteCache {
    custom_color: Option<String>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the sprite for `color`; the two stock colors never re-render
    pub fn resolve(&mut self, color: &str) -> SpriteRequest {
        if color == DEFAULT_COLOR {
            return SpriteRequest {
                key: SpriteKey::Default,
                rasterize: None,
            };
        }
        if color == SNARKY_COLOR {
            return SpriteRequest {
                key: SpriteKey::Snarky,
                rasterize: None,
            };
        }
        let rasterize = if self.custom_color.as_deref() == Some(color) {
            None
        } else {
            self.custom_color = Some(color.to_string());
            Some(color.to_string())
        };
        SpriteRequest {
            key: SpriteKey::Custom,
            rasterize,
        }
    }
}

/// One googly eye in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeView {
    pub socket: DVec2,
    pub eye_radius: f64,
    pub pupil_radius: f64,
    /// Radians, world frame
    pub pupil_angle: f64,
    pub pupil_center: DVec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub color: String,
    pub scale: f64,
    /// Degrees
    pub rotation: f64,
    pub opacity: f64,
    pub position: DVec2,
    /// Left then right, present only when eyes are enabled
    pub eyes: Option<[EyeView; 2]>,
}

impl FrameView {
    pub fn from_state(state: &StarState) -> Self {
        Self {
            color: state.color.clone(),
            scale: state.current_scale,
            rotation: state.rotation_angle,
            opacity: state.opacity,
            position: state.pos,
            eyes: state.eyes_enabled.then(|| eye_views(state)),
        }
    }

    /// Sprite edge length in pixels
    pub fn sprite_size(&self) -> f64 {
        STAR_BASE_SIZE * self.scale
    }
}

fn eye_views(state: &StarState) -> [EyeView; 2] {
    let eye_radius = STAR_BASE_SIZE * state.current_scale * EYE_SIZE_RATIO;
    let pupil_radius = eye_radius * PUPIL_SIZE_RATIO;
    let half_spacing = eye_radius * EYE_SPACING_RATIO / 2.0;
    let rotation = state.rotation_angle.to_radians();
    let axis = DVec2::from_angle(rotation);
    let reach = eye_radius - pupil_radius - 2.0;

    let view = |socket: DVec2, local_angle: f64| {
        let pupil_angle = local_angle + rotation;
        EyeView {
            socket,
            eye_radius,
            pupil_radius,
            pupil_angle,
            pupil_center: socket + DVec2::from_angle(pupil_angle) * reach,
        }
    };

    [
        view(state.pos - axis * half_spacing, state.left_eye.angle),
        view(state.pos + axis * half_spacing, state.right_eye.angle),
    ]
}

/// Consumer of rendered frames
pub trait FrameSink {
    fn present(&mut self, frame: &FrameView) -> anyhow::Result<()>;
}

/// Headless sink that logs a frame summary every `every` frames
#[derive(Debug)]
pub struct LogSink {
    every: u64,
    frames: u64,
    sprites: SpriteCache,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            sprites: SpriteCache::new(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &FrameView) -> anyhow::Result<()> {
        let sprite = self.sprites.resolve(&frame.color);
        if let Some(color) = &sprite.rasterize {
            debug!("Rasterizing custom sprite in {color}");
        }
        if self.frames % self.every == 0 {
            debug!(
                "frame {}: pos=({:.1}, {:.1}) scale={:.3} size={:.0}px rot={:.1} opacity={:.2} sprite={:?} eyes={}",
                self.frames,
                frame.position.x,
                frame.position.y,
                frame.scale,
                frame.sprite_size(),
                frame.rotation,
                frame.opacity,
                sprite.key,
                frame.eyes.is_some(),
            );
        }
        self.frames += 1;
        Ok(())
    }
}
