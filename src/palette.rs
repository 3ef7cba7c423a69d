//! Colors shared by the simulation (entity/particle tints) and the renderer

/// Linear RGBA color
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

// Blocks
pub const BLOCK_ADD: Color = [0.133, 0.773, 0.369, 1.0];
pub const BLOCK_MULT: Color = [0.231, 0.510, 0.965, 1.0];
pub const BLOCK_SUB: Color = [0.937, 0.267, 0.267, 1.0];
pub const BLOCK_DIV: Color = [0.976, 0.451, 0.086, 1.0];
pub const BLOCK_DEATH: Color = BLACK;
pub const BLOCK_SHINE: Color = [1.0, 1.0, 1.0, 0.2];

// Hazards
pub const ENEMY: Color = [0.863, 0.149, 0.149, 1.0];
pub const ENEMY_SPIKE: Color = [0.6, 0.106, 0.106, 1.0];
pub const BOSS: Color = [0.498, 0.114, 0.114, 1.0];
pub const HEALTH_BAR: Color = [0.937, 0.267, 0.267, 1.0];

// Road
pub const ROAD_MAIN: Color = [0.118, 0.161, 0.231, 1.0];
pub const ROAD_STRIPE: Color = [0.2, 0.255, 0.333, 1.0];
pub const SHADOW: Color = [0.0, 0.0, 0.0, 0.5];

// Player figure
pub const ARMOR_GREY: Color = [0.580, 0.639, 0.722, 1.0];
pub const ARMOR_BLUE: Color = [0.231, 0.510, 0.965, 1.0];
pub const ARMOR_RED: Color = [0.725, 0.110, 0.110, 1.0];
pub const ARMOR_DARK: Color = [0.118, 0.161, 0.231, 1.0];
pub const ARMOR_GOLD: Color = [0.961, 0.620, 0.043, 1.0];
pub const LEGS: Color = [0.2, 0.255, 0.333, 1.0];
pub const VISOR: Color = [0.024, 0.714, 0.831, 1.0];
pub const WINGS: Color = [0.376, 0.647, 0.980, 1.0];

/// Sky and ground colors for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub sky_top: Color,
    pub sky_bottom: Color,
    pub ground: Color,
}

/// Themes cycle with level: dark blue, red, deep blue, green, purple
pub const THEMES: [Theme; 5] = [
    Theme {
        sky_top: [0.059, 0.090, 0.165, 1.0],
        sky_bottom: [0.118, 0.161, 0.231, 1.0],
        ground: [0.008, 0.024, 0.090, 1.0],
    },
    Theme {
        sky_top: [0.165, 0.039, 0.059, 1.0],
        sky_bottom: [0.271, 0.039, 0.039, 1.0],
        ground: [0.102, 0.020, 0.020, 1.0],
    },
    Theme {
        sky_top: [0.090, 0.145, 0.329, 1.0],
        sky_bottom: [0.118, 0.227, 0.541, 1.0],
        ground: [0.008, 0.024, 0.090, 1.0],
    },
    Theme {
        sky_top: [0.008, 0.173, 0.133, 1.0],
        sky_bottom: [0.024, 0.306, 0.231, 1.0],
        ground: [0.008, 0.024, 0.090, 1.0],
    },
    Theme {
        sky_top: [0.180, 0.063, 0.396, 1.0],
        sky_bottom: [0.345, 0.110, 0.529, 1.0],
        ground: [0.008, 0.024, 0.090, 1.0],
    },
];

/// Theme for a 1-based level
pub fn theme_for_level(level: u32) -> Theme {
    THEMES[(level.max(1) - 1) as usize % THEMES.len()]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}
