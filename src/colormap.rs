// ============================================================================
// COLOR TYPES
// ============================================================================

/// 8-bit RGB color used for every chart element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    pub const GRAY: Color = Color::new(0x80, 0x80, 0x80);
    pub const GREEN: Color = Color::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear RGB blend, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

// ============================================================================
// VALUE GRADIENT
// ============================================================================

/// Half-width of the displayed value range, fixed at [-3, 3].
pub const VALUE_LIMIT: f64 = 3.0;

/// `limit` if it is a usable half-width, [`VALUE_LIMIT`] otherwise.
pub fn sanitize_limit(limit: f64) -> f64 {
    if limit.is_finite() && limit > 0.0 {
        limit
    } else {
        VALUE_LIMIT
    }
}

/// Three-stop diverging gradient over a symmetric value range.
///
/// `-limit` maps to `negative`, zero to `neutral`, `+limit` to `positive`;
/// values beyond the range take the color of the nearest end. A limit that is
/// not finite and positive behaves like [`VALUE_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub limit: f64,
    pub negative: Color,
    pub neutral: Color,
    pub positive: Color,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            limit: VALUE_LIMIT,
            negative: Color::BLUE,
            neutral: Color::GRAY,
            positive: Color::GREEN,
        }
    }
}

impl Gradient {
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        let limit = sanitize_limit(self.limit);
        value.clamp(-limit, limit)
    }

    /// `|value| / limit` after clamping, in `[0, 1]`.
    pub fn magnitude(&self, value: f64) -> f64 {
        self.clamp(value).abs() / sanitize_limit(self.limit)
    }

    pub fn color(&self, value: f64) -> Color {
        let v = self.clamp(value);
        let t = self.magnitude(v);
        if v < 0.0 {
            self.neutral.lerp(self.negative, t)
        } else {
            self.neutral.lerp(self.positive, t)
        }
    }
}
