//! Atlas layout shared by every cable material.
//!
//! The atlas is a single row of vertical strips. Each patch type owns one
//! strip; `v` is left unscaled so segment textures repeat along the cable.
//! The powered look of a patch lives `ACTIVE_COLUMN_OFFSET` strips to the
//! right of its idle strip.

use crate::uv::UvTransform;

pub const TILE_SIZE: u32 = 64;
pub const ATLAS_COLS: u32 = 16;
pub const ATLAS_WIDTH: u32 = TILE_SIZE * ATLAS_COLS;

pub type AtlasColumn = u32;

pub const COLUMN_SEGMENT: AtlasColumn = 0;
pub const COLUMN_JUNCTION_SIMPLE: AtlasColumn = 1;
pub const COLUMN_JUNCTION_OR: AtlasColumn = 2;
pub const COLUMN_JUNCTION_AND: AtlasColumn = 3;
pub const COLUMN_JUNCTION_PASSTHROUGH: AtlasColumn = 4;
pub const COLUMN_CONVEX: AtlasColumn = 5;
pub const COLUMN_CONCAVE: AtlasColumn = 6;
pub const COLUMN_GLOW: AtlasColumn = 7;

pub const ACTIVE_COLUMN_OFFSET: AtlasColumn = 8;

pub fn column_width() -> f32 {
    1.0 / ATLAS_COLS as f32
}

/// Maps unit patch UVs into `column`, inset by half a texel on each side so
/// bilinear filtering never samples the neighbouring strip.
pub fn atlas_column(column: AtlasColumn) -> UvTransform {
    let tile_width = column_width();
    let pad_u = 0.5 / ATLAS_WIDTH as f32;
    UvTransform {
        translate: cgmath::Vector2::new(column as f32 * tile_width + pad_u, 0.0),
        scale: cgmath::Vector2::new(tile_width - 2.0 * pad_u, 1.0),
        rotation: 0.0,
    }
}

/// Offset that moves an idle strip onto its powered counterpart.
pub fn active_shift() -> UvTransform {
    UvTransform::translation(ACTIVE_COLUMN_OFFSET as f32 * column_width(), 0.0)
}

/// Column transform with the active shift stacked on when `active`.
pub fn patch_uv(column: AtlasColumn, active: bool) -> UvTransform {
    if active {
        atlas_column(column) * active_shift()
    } else {
        atlas_column(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector2;

    #[test]
    fn columns_do_not_overlap() {
        for column in 0..ATLAS_COLS - 1 {
            let right_edge = atlas_column(column).apply(Vector2::new(1.0, 0.0)).x;
            let next_left = atlas_column(column + 1).apply(Vector2::new(0.0, 0.0)).x;
            assert!(right_edge < next_left);
        }
    }

    #[test]
    fn active_strip_lands_in_right_half() {
        let idle = patch_uv(COLUMN_SEGMENT, false).apply(Vector2::new(0.5, 0.0)).x;
        let active = patch_uv(COLUMN_SEGMENT, true).apply(Vector2::new(0.5, 0.0)).x;
        assert!(idle < 0.5);
        assert!(active > 0.5);
        assert!((active - idle - 0.5).abs() < 1e-6);
    }

    #[test]
    fn every_patch_column_has_an_active_twin_in_range() {
        let last = COLUMN_GLOW + ACTIVE_COLUMN_OFFSET;
        assert!(last < ATLAS_COLS);
    }
}
