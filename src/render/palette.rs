use ratatui::style::Color;

use crate::globe::Category;

/// Colors for one display mode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub atmosphere: Color,
    pub limb: Color,
    pub surface: Color,
    pub selected: Color,
    pub border: Color,
    pub text: Color,
    pub dim_text: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                atmosphere: Color::Rgb(0x44, 0x66, 0xaa),
                limb: Color::Rgb(0x33, 0x41, 0x55),
                surface: Color::Rgb(0x94, 0xa3, 0xb8),
                selected: Color::Rgb(0x22, 0xd3, 0xee),
                border: Color::DarkGray,
                text: Color::White,
                dim_text: Color::Gray,
                accent: Color::Rgb(0x22, 0xd3, 0xee),
            }
        } else {
            Self {
                atmosphere: Color::Rgb(0x66, 0x99, 0xff),
                limb: Color::Rgb(0x64, 0x74, 0x8b),
                surface: Color::Rgb(0x16, 0xa3, 0x4a),
                selected: Color::Rgb(0x06, 0xb6, 0xd4),
                border: Color::Gray,
                text: Color::Black,
                dim_text: Color::DarkGray,
                accent: Color::Rgb(0x25, 0x63, 0xeb),
            }
        }
    }

    /// Dot color; brighter in dark mode where the glow reads stronger
    pub fn marker(&self, category: Category, dark_mode: bool) -> Color {
        match (category, dark_mode) {
            (Category::Sales, false) => Color::Rgb(0x3b, 0x82, 0xf6),
            (Category::Sales, true) => Color::Rgb(0x60, 0xa5, 0xfa),
            (Category::Technical, false) => Color::Rgb(0xf9, 0x73, 0x16),
            (Category::Technical, true) => Color::Rgb(0xfb, 0x92, 0x3c),
        }
    }

    /// Glow ring color, the emissive shade of the dot
    pub fn glow(&self, category: Category, dark_mode: bool) -> Color {
        match (category, dark_mode) {
            (Category::Sales, false) => Color::Rgb(0x1e, 0x40, 0xaf),
            (Category::Sales, true) => Color::Rgb(0x3b, 0x82, 0xf6),
            (Category::Technical, false) => Color::Rgb(0xc2, 0x41, 0x0c),
            (Category::Technical, true) => Color::Rgb(0xf9, 0x73, 0x16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_differ() {
        assert_ne!(Palette::for_mode(true), Palette::for_mode(false));
    }

    #[test]
    fn test_categories_have_distinct_markers() {
        let p = Palette::for_mode(false);
        assert_ne!(p.marker(Category::Sales, false), p.marker(Category::Technical, false));
        assert_ne!(p.marker(Category::Sales, false), p.marker(Category::Sales, true));
    }
}
