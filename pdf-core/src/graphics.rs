/// Points per millimetre (1 pt = 1/72 in).
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// RGB color for PDF graphics operations.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from RGB components (each 0.0–1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub fn gray(level: f64) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Create a color from 8-bit components, as used in config files
    /// and design tools.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb8_scales_components() {
        assert_eq!(Color::from_rgb8(255, 255, 255), Color::WHITE);
        assert_eq!(Color::from_rgb8(0, 0, 0), Color::BLACK);
        let c = Color::from_rgb8(51, 102, 204);
        assert!((c.r - 0.2).abs() < 1e-9);
        assert!((c.g - 0.4).abs() < 1e-9);
        assert!((c.b - 0.8).abs() < 1e-9);
    }

    #[test]
    fn a4_width_in_points() {
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 1e-3);
    }
}
