use serde::Deserialize;

use crate::coords::ScreenRect;

/// Placement of the two logical screens when a custom layout is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomLayout {
    /// Rectangle of the primary (upper) screen.
    pub top_screen: ScreenRect,

    /// Rectangle of the secondary (lower) screen.
    pub bottom_screen: ScreenRect,

    /// The layout is displayed turned on its side.
    pub rotated: bool,
}

impl Default for CustomLayout {
    fn default() -> Self {
        // 400x240 primary stacked above a centred 320x240 secondary.
        Self {
            top_screen: ScreenRect::new(0, 480, 400, 240),
            bottom_screen: ScreenRect::new(40, 240, 360, 0),
            rotated: false,
        }
    }
}

impl CustomLayout {
    /// Returns `(primary, secondary)` after applying the swap flag.
    pub fn placed(&self, swap_screens: bool) -> (ScreenRect, ScreenRect) {
        if swap_screens {
            (self.bottom_screen, self.top_screen)
        } else {
            (self.top_screen, self.bottom_screen)
        }
    }
}

/// Layout configuration consumed by the resolver. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Use `custom` to size the output instead of the 1x1 default.
    pub custom_layout: bool,

    /// Exchange the primary and secondary screens.
    pub swap_screens: bool,

    /// Internal resolution multiplier. Fractional values are rounded per axis.
    ///
    /// Non-finite or non-positive values are treated as 1.0.
    pub resolution_factor: f32,

    pub custom: CustomLayout,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            custom_layout: false,
            swap_screens: false,
            resolution_factor: 1.0,
            custom: CustomLayout::default(),
        }
    }
}
