use crate::coords::OutputDimensions;

use super::LayoutSettings;

/// Largest output width or height the resolver hands out. Matches the 2D
/// texture limit of `wgpu::Limits::default()`.
pub const MAX_OUTPUT_DIMENSION: u32 = 8192;

/// Computes the unscaled output size.
///
/// With a custom layout this is the bounding box of both placed screens,
/// transposed when the layout is rotated. Otherwise it is the 1x1 minimum.
pub fn base_dimensions(settings: &LayoutSettings) -> OutputDimensions {
    if !settings.custom_layout {
        return OutputDimensions::MIN;
    }

    let (primary, secondary) = settings.custom.placed(settings.swap_screens);
    let bounds = primary.union(secondary);
    let dims = OutputDimensions::new(bounds.width(), bounds.height());

    if settings.custom.rotated {
        dims.transposed()
    } else {
        dims
    }
}

/// Resolves the final output size: base size times the resolution factor,
/// capped at [`MAX_OUTPUT_DIMENSION`] per axis.
pub fn resolve(settings: &LayoutSettings) -> OutputDimensions {
    let factor = settings.resolution_factor;
    let factor = if factor.is_finite() && factor > 0.0 {
        factor
    } else {
        log::warn!("resolution factor {factor} is not usable; falling back to 1.0");
        1.0
    };

    let scaled = base_dimensions(settings).scaled(factor);
    let dims = scaled.clamped(MAX_OUTPUT_DIMENSION);
    if dims != scaled {
        log::warn!(
            "{}x{} exceeds the {MAX_OUTPUT_DIMENSION}px limit; using {}x{}",
            scaled.width(),
            scaled.height(),
            dims.width(),
            dims.height()
        );
    }
    log::trace!("resolved layout to {}x{}", dims.width(), dims.height());
    dims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ScreenRect;
    use crate::layout::CustomLayout;

    fn custom(top: ScreenRect, bottom: ScreenRect, rotated: bool) -> LayoutSettings {
        LayoutSettings {
            custom_layout: true,
            custom: CustomLayout {
                top_screen: top,
                bottom_screen: bottom,
                rotated,
            },
            ..LayoutSettings::default()
        }
    }

    // ── default layout ────────────────────────────────────────────────────

    #[test]
    fn default_layout_is_one_by_one() {
        assert_eq!(resolve(&LayoutSettings::default()).as_tuple(), (1, 1));
    }

    #[test]
    fn default_layout_scaled_by_two() {
        let settings = LayoutSettings {
            resolution_factor: 2.0,
            ..LayoutSettings::default()
        };
        assert_eq!(resolve(&settings).as_tuple(), (2, 2));
    }

    // ── custom layout ─────────────────────────────────────────────────────

    #[test]
    fn custom_layout_bounding_box() {
        // Side by side: 400x240 next to 320x240 sharing the bottom edge.
        let s = custom(
            ScreenRect::new(0, 240, 400, 0),
            ScreenRect::new(40, 240, 360, 0),
            false,
        );
        assert_eq!(resolve(&s).as_tuple(), (400, 240));
    }

    #[test]
    fn custom_layout_rotated_swaps_axes() {
        let s = custom(
            ScreenRect::new(0, 240, 400, 0),
            ScreenRect::new(40, 240, 360, 0),
            true,
        );
        assert_eq!(resolve(&s).as_tuple(), (240, 400));
    }

    #[test]
    fn custom_layout_stacked_default_rects() {
        let s = LayoutSettings {
            custom_layout: true,
            ..LayoutSettings::default()
        };
        assert_eq!(resolve(&s).as_tuple(), (400, 480));
    }

    #[test]
    fn swap_does_not_change_bounds() {
        let mut s = LayoutSettings {
            custom_layout: true,
            ..LayoutSettings::default()
        };
        let before = resolve(&s);
        s.swap_screens = true;
        assert_eq!(resolve(&s), before);
    }

    #[test]
    fn degenerate_custom_layout_clamps_to_one() {
        let empty = ScreenRect::new(10, 10, 10, 10);
        assert_eq!(resolve(&custom(empty, empty, false)).as_tuple(), (1, 1));
    }

    #[test]
    fn custom_layout_scaled_fractionally() {
        let mut s = custom(
            ScreenRect::new(0, 240, 400, 0),
            ScreenRect::new(0, 240, 400, 0),
            false,
        );
        s.resolution_factor = 1.5;
        assert_eq!(resolve(&s).as_tuple(), (600, 360));
    }

    // ── scale coercion ────────────────────────────────────────────────────

    #[test]
    fn huge_factor_is_capped() {
        let s = LayoutSettings {
            custom_layout: true,
            resolution_factor: 1.0e9,
            ..LayoutSettings::default()
        };
        let dims = resolve(&s);
        assert_eq!(dims.as_tuple(), (MAX_OUTPUT_DIMENSION, MAX_OUTPUT_DIMENSION));
        assert_eq!(dims.frame_bytes(), 8192 * 8192 * 4);
    }

    #[test]
    fn capping_keeps_the_smaller_axis() {
        // 400x480 * 20 = 8000x9600; only height is capped.
        let s = LayoutSettings {
            custom_layout: true,
            resolution_factor: 20.0,
            ..LayoutSettings::default()
        };
        assert_eq!(resolve(&s).as_tuple(), (8000, MAX_OUTPUT_DIMENSION));
    }

    #[test]
    fn unusable_factor_falls_back_to_one() {
        for factor in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            let s = LayoutSettings {
                custom_layout: true,
                resolution_factor: factor,
                ..LayoutSettings::default()
            };
            assert_eq!(resolve(&s).as_tuple(), (400, 480));
        }
    }
}
