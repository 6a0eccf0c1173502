use serde::{Deserialize, Serialize};

/// An sRGB color with straight alpha.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` for CSS-speaking map hosts.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Drawing instructions for one cell or marker.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub color: Color,
    pub fill_opacity: f32,
    /// Outline width in screen pixels.
    pub stroke_weight: f32,
}

impl CellStyle {
    pub const fn new(color: Color, fill_opacity: f32, stroke_weight: f32) -> Self {
        Self {
            color,
            fill_opacity,
            stroke_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_formats() {
        let c = Color::rgba(34, 139, 34, 0.5);
        assert_eq!(c.to_hex(), "#228b22");
        assert_eq!(c.to_css(), "rgba(34, 139, 34, 0.5)");
        assert_eq!(c.with_alpha(1.0).a, 1.0);
    }
}
