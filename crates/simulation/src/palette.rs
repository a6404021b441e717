//! Visual themes per time-of-day category.
//!
//! Pure data: the render loop looks a palette up once per scene activation and
//! never mutates it. Adding a theme means adding a table entry, not touching
//! the painter.

use crate::time_of_day::TimeCategory;

/// An sRGB pixel, `[r, g, b, a]`.
pub type Rgba = [u8; 4];

/// Build an opaque pixel from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Rgba {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelestialKind {
    Sun,
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celestial {
    pub kind: CelestialKind,
    pub color: Rgba,
    /// Vertical position as a fraction of the viewport height (0 = top).
    pub vertical_position: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub sky_top: Rgba,
    pub sky_bottom: Rgba,
    pub terrain: Rgba,
    pub foliage: [Rgba; 3],
    pub trunk: Rgba,
    pub fireflies: bool,
    pub celestial: Celestial,
}

/// Firefly glow color, shared by every palette that enables them.
pub const FIREFLY_COLOR: Rgba = hex(0xfbbf24);

const MORNING: Palette = Palette {
    sky_top: hex(0xfef9c3),
    sky_bottom: hex(0xbfdbfe),
    terrain: hex(0x57534e),
    foliage: [hex(0x65a30d), hex(0x4d7c0f), hex(0x3f6212)],
    trunk: hex(0x5d4037),
    fireflies: false,
    // Rising sun
    celestial: Celestial {
        kind: CelestialKind::Sun,
        color: hex(0xfde047),
        vertical_position: 0.3,
    },
};

const DAY: Palette = Palette {
    sky_top: hex(0x38bdf8),
    sky_bottom: hex(0xbae6fd),
    terrain: hex(0x0f766e),
    foliage: [hex(0x16a34a), hex(0x15803d), hex(0x166534)],
    trunk: hex(0x3f2e26),
    fireflies: false,
    celestial: Celestial {
        kind: CelestialKind::Sun,
        color: hex(0xfacc15),
        vertical_position: 0.15,
    },
};

const EVENING: Palette = Palette {
    sky_top: hex(0x1e1b4b),
    sky_bottom: hex(0xfb923c),
    terrain: hex(0x431407),
    foliage: [hex(0x854d0e), hex(0x713f12), hex(0x422006)],
    trunk: hex(0x29150f),
    fireflies: true,
    // Setting sun
    celestial: Celestial {
        kind: CelestialKind::Sun,
        color: hex(0xef4444),
        vertical_position: 0.6,
    },
};

const NIGHT: Palette = Palette {
    sky_top: hex(0x020617),
    sky_bottom: hex(0x0f172a),
    terrain: hex(0x022c22),
    foliage: [hex(0x064e3b), hex(0x065f46), hex(0x047857)],
    trunk: hex(0x1a120b),
    fireflies: true,
    celestial: Celestial {
        kind: CelestialKind::Moon,
        color: hex(0xfef3c7),
        vertical_position: 0.15,
    },
};

/// The theme for `category`.
pub fn palette_for(category: TimeCategory) -> &'static Palette {
    match category {
        TimeCategory::Morning => &MORNING,
        TimeCategory::Day => &DAY,
        TimeCategory::Evening => &EVENING,
        TimeCategory::Night => &NIGHT,
    }
}
