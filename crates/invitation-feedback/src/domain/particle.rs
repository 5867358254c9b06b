//! Randomized particle layout.

use chrono::TimeDelta;
use invitation_core::rng::DeterministicRng;
use invitation_core::surface::NewElement;

/// Colours particles are drawn from.
pub const PALETTE: [&str; 6] = [
    "#d4af37", "#f4c2c2", "#fffaf0", "#b2ac88", "#e8b4b8", "#c9a66b",
];

/// Particle size range, in pixels.
pub const SIZE_PX: (u32, u32) = (6, 14);
/// Animation delay range, in milliseconds.
pub const DELAY_MS: (u32, u32) = (0, 500);
/// Fall duration range, in milliseconds.
pub const DURATION_MS: (u32, u32) = (2_000, 4_000);

/// Class of every particle element.
pub const PARTICLE_CLASS: &str = "confetti-piece";

/// Randomized look and timing of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSpec {
    /// Edge length in pixels.
    pub size_px: u32,
    /// Palette colour.
    pub color: &'static str,
    /// Horizontal position as a percentage of the layer width.
    pub left_pct: u32,
    /// Delay before the animation starts.
    pub delay_ms: u32,
    /// Animation duration.
    pub duration_ms: u32,
}

impl ParticleSpec {
    /// Draws a particle from `rng`.
    pub fn random(rng: &mut dyn DeterministicRng) -> Self {
        let last_color = u32::try_from(PALETTE.len() - 1).unwrap_or(0);
        Self {
            size_px: rng.next_u32_range(SIZE_PX.0, SIZE_PX.1),
            color: PALETTE[rng.next_u32_range(0, last_color) as usize % PALETTE.len()],
            left_pct: rng.next_u32_range(0, 100),
            delay_ms: rng.next_u32_range(DELAY_MS.0, DELAY_MS.1),
            duration_ms: rng.next_u32_range(DURATION_MS.0, DURATION_MS.1),
        }
    }

    /// Time from creation until the particle must be gone.
    #[must_use]
    pub fn lifetime(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.delay_ms) + i64::from(self.duration_ms))
    }

    /// Element description for the rendering surface.
    #[must_use]
    pub fn to_element(&self) -> NewElement {
        NewElement::new("div")
            .with_class(PARTICLE_CLASS)
            .with_style("width", &format!("{}px", self.size_px))
            .with_style("height", &format!("{}px", self.size_px))
            .with_style("background-color", self.color)
            .with_style("left", &format!("{}%", self.left_pct))
            .with_style("animation-delay", &format!("{}ms", self.delay_ms))
            .with_style("animation-duration", &format!("{}ms", self.duration_ms))
    }
}

/// Longest lifetime any particle can have.
#[must_use]
pub fn max_lifetime() -> TimeDelta {
    TimeDelta::milliseconds(i64::from(DELAY_MS.1) + i64::from(DURATION_MS.1))
}
