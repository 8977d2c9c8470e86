//! Transient wind gusts.
//!
//! A gust is a strip of strong wind along a segment that fades in, holds,
//! and fades out over its lifetime. The `GustRegistry` resource owns every
//! live gust, ages them each tick and drops them once their envelope has
//! returned to zero.

use bevy::prelude::*;

use crate::error::{non_negative, positive, ConfigError};

/// Default cap on concurrently live gusts.
pub const DEFAULT_MAX_LIVE_GUSTS: usize = 32;

/// Segments shorter than this have no usable direction.
const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// The region a gust affects: a strip of `width` centered on the segment
/// from `start` toward `end`, covering `length` units from `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GustStrip {
    start: Vec2,
    end: Vec2,
    width: f32,
    length: f32,
}

impl GustStrip {
    pub fn new(start: Vec2, end: Vec2, width: f32, length: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            start,
            end,
            width: positive("gust width", width)?,
            length: non_negative("gust length", length)?,
        })
    }

    /// Unit direction from start to end, or zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        let axis = self.end - self.start;
        if axis.length() < MIN_SEGMENT_LENGTH {
            Vec2::ZERO
        } else {
            axis.normalize()
        }
    }

    /// Returns true if `position` lies inside the strip.
    ///
    /// Degenerate (zero-length) segments contain nothing.
    pub fn contains(&self, position: Vec2) -> bool {
        let dir = self.direction();
        if dir == Vec2::ZERO {
            return false;
        }
        let rel = position - self.start;
        let along = rel.dot(dir);
        if along < 0.0 || along > self.length {
            return false;
        }
        rel.perp_dot(dir).abs() <= self.width * 0.5
    }
}

/// Fade-in / hold / fade-out timing of a gust, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GustEnvelope {
    fade_in: f32,
    duration: f32,
    fade_out: f32,
}

impl GustEnvelope {
    pub fn new(fade_in: f32, duration: f32, fade_out: f32) -> Result<Self, ConfigError> {
        let fade_in = non_negative("gust fade-in", fade_in)?;
        let duration = positive("gust duration", duration)?;
        let fade_out = non_negative("gust fade-out", fade_out)?;
        if fade_in + fade_out > duration {
            return Err(ConfigError::InvalidEnvelope { fade_in, fade_out, duration });
        }
        Ok(Self { fade_in, duration, fade_out })
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Envelope value in `[0, 1]` at `elapsed` seconds.
    ///
    /// Ramps use smoothstep, so the curve is continuous at every phase
    /// boundary and monotonic within each phase.
    pub fn value(&self, elapsed: f32) -> f32 {
        if elapsed >= self.duration || elapsed < 0.0 {
            return 0.0;
        }
        let fade_out_start = self.duration - self.fade_out;
        if elapsed > fade_out_start {
            return smoothstep((self.duration - elapsed) / self.fade_out);
        }
        if elapsed < self.fade_in {
            return smoothstep(elapsed / self.fade_in);
        }
        1.0
    }

    /// Lifecycle phase at `elapsed` seconds.
    pub fn phase_at(&self, elapsed: f32) -> GustPhase {
        if elapsed >= self.duration - self.fade_out {
            GustPhase::FadeOut
        } else if elapsed >= self.fade_in {
            GustPhase::Hold
        } else {
            GustPhase::FadeIn
        }
    }
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Lifecycle phase of a live gust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GustPhase {
    FadeIn,
    Hold,
    FadeOut,
}

/// A validated gust description. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindGust {
    pub strip: GustStrip,
    pub envelope: GustEnvelope,
    /// Peak force at full envelope.
    pub strength: f32,
}

impl WindGust {
    pub fn new(strip: GustStrip, envelope: GustEnvelope, strength: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            strip,
            envelope,
            strength: non_negative("gust strength", strength)?,
        })
    }
}

/// A gust being tracked by the registry.
#[derive(Debug, Clone)]
pub struct ActiveGust {
    pub gust: WindGust,
    pub elapsed: f32,
    pub phase: GustPhase,
}

impl ActiveGust {
    /// Force this gust applies at `position` right now.
    pub fn force_at(&self, position: Vec2) -> Vec2 {
        if !self.gust.strip.contains(position) {
            return Vec2::ZERO;
        }
        self.gust.strip.direction() * self.gust.strength * self.gust.envelope.value(self.elapsed)
    }
}

/// Owns all live gusts.
///
/// Overlapping gusts are independent and their forces simply add up.
/// At most `capacity` gusts are live at once; adding beyond that evicts
/// the oldest gust.
#[derive(Resource, Debug, Clone)]
pub struct GustRegistry {
    gusts: Vec<ActiveGust>,
    capacity: usize,
}

impl Default for GustRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_LIVE_GUSTS)
    }
}

impl GustRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            gusts: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Starts a new gust in `FadeIn` at elapsed 0.
    ///
    /// Returns the evicted gust if the registry was full.
    pub fn add(&mut self, gust: WindGust) -> Option<ActiveGust> {
        let evicted = if self.gusts.len() >= self.capacity {
            let oldest = self.gusts.remove(0);
            warn!(
                "Gust registry full ({} live), evicting oldest gust at {:.2}s",
                self.capacity, oldest.elapsed
            );
            Some(oldest)
        } else {
            None
        };

        self.gusts.push(ActiveGust {
            gust,
            elapsed: 0.0,
            phase: GustPhase::FadeIn,
        });
        evicted
    }

    /// Ages every gust by `dt`, updates phases and drops expired gusts.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for active in &mut self.gusts {
            active.elapsed += dt;
            active.phase = active.gust.envelope.phase_at(active.elapsed);
        }

        let before = self.gusts.len();
        self.gusts.retain(|g| g.elapsed < g.gust.envelope.duration());
        let expired = before - self.gusts.len();
        if expired > 0 {
            debug!("{} gust(s) expired, {} still live", expired, self.gusts.len());
        }
    }

    pub fn active_gusts(&self) -> &[ActiveGust] {
        &self.gusts
    }

    pub fn len(&self) -> usize {
        self.gusts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gusts.is_empty()
    }

    /// Summed force of every live gust at `position`.
    pub fn force_at(&self, position: Vec2) -> Vec2 {
        self.gusts.iter().map(|g| g.force_at(position)).sum()
    }
}
