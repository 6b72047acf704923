use eink_palette::Rgb;

/// Geometry, native palette and mounting orientation of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub width: u32,
    pub height: u32,
    /// Native colors in controller index order
    pub palette: &'static [Rgb],
    /// Mirror horizontally before pushing
    pub flip_x: bool,
    /// Mirror vertically before pushing
    pub flip_y: bool,
}

const WHITE_BLACK_YELLOW: &[Rgb] = &[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 255, 0)];
const WHITE_BLACK_RED: &[Rgb] = &[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 0, 0)];

/// Desaturated seven-color ACeP palette; the trailing "clean" entry repeats
/// white and is dropped when the palette is built.
const ACEP_DESATURATED: &[Rgb] = &[
    Rgb::new(0, 0, 0),
    Rgb::new(255, 255, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 140, 0),
    Rgb::new(255, 255, 255),
];

impl DisplaySpec {
    /// Inky pHAT, yellow ink: 212x104
    pub const PHAT_YELLOW: Self = Self::new(212, 104, WHITE_BLACK_YELLOW);

    /// Inky pHAT, red ink: 212x104
    pub const PHAT_RED: Self = Self::new(212, 104, WHITE_BLACK_RED);

    /// Inky wHAT, yellow ink: 400x300
    pub const WHAT_YELLOW: Self = Self::new(400, 300, WHITE_BLACK_YELLOW);

    /// Inky wHAT, red ink: 400x300
    pub const WHAT_RED: Self = Self::new(400, 300, WHITE_BLACK_RED);

    /// Inky Impression 5.7": 600x448, seven colors
    pub const IMPRESSION_57: Self = Self::new(600, 448, ACEP_DESATURATED);

    /// Preset names accepted by [`DisplaySpec::from_name`].
    pub const PRESETS: &'static [(&'static str, DisplaySpec)] = &[
        ("phat-yellow", Self::PHAT_YELLOW),
        ("phat-red", Self::PHAT_RED),
        ("what-yellow", Self::WHAT_YELLOW),
        ("what-red", Self::WHAT_RED),
        ("impression-5.7", Self::IMPRESSION_57),
    ];

    const fn new(width: u32, height: u32, palette: &'static [Rgb]) -> Self {
        Self {
            width,
            height,
            palette,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()))
            .map(|(_, spec)| *spec)
    }

    /// Same panel with the given mounting orientation.
    pub fn with_orientation(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }
}
