use serde::Deserialize;

/// Dimensions of the profiled cable. `width` and `height` stretch the shared
/// cross-section, `scale` multiplies everything uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CableMeshSettings {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// How far the additive glow strips float above the cable surface.
    pub glow_height: f32,
    pub upside_down: bool,
}

impl Default for CableMeshSettings {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            scale: 1.0,
            glow_height: 0.004,
            upside_down: false,
        }
    }
}

/// Plain round cable: a ring of `radial_segments` vertices per point.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TubeSettings {
    pub radius: f32,
    pub radial_segments: u32,
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            radius: 0.05,
            radial_segments: 8,
        }
    }
}
