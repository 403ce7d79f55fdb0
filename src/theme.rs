//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use minertui::Color as Jewel;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Jewel colours and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Jewel colours in `Jewel::PLAYABLE` order: blue, green, yellow, purple, red.
    pub jewels: [Color; 5],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, timer).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Cursor frame and hints.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// One Dark palette, same hex values as onedark.theme.
    pub fn onedark_default() -> Self {
        Self {
            jewels: [
                Color::Rgb(0x61, 0xAF, 0xEF), // cpu_box / blue
                Color::Rgb(0x98, 0xC3, 0x79), // mem_box / green
                Color::Rgb(0xE5, 0xC0, 0x7B), // title / yellow
                Color::Rgb(0xC6, 0x78, 0xDD), // net_box / magenta
                Color::Rgb(0xE0, 0x6C, 0x75), // cpu_end / red
            ],
            bg: Color::Rgb(0x31, 0x35, 0x3F),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override jewel colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.jewels = [
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0x00),
                ];
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito inspired: no red/green pair relies on hue alone
                self.jewels = [
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0xBB, 0xBB, 0x00),
                    Color::Rgb(0xEE, 0x33, 0x77),
                    Color::Rgb(0xEE, 0x77, 0x33),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::onedark_default();
        Self {
            jewels: [
                get("cpu_box").unwrap_or(d.jewels[0]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.jewels[1]),
                get("title").or_else(|| get("cpu_mid")).unwrap_or(d.jewels[2]),
                get("net_box").unwrap_or(d.jewels[3]),
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.jewels[4]),
            ],
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    /// Terminal colour of a jewel; the empty sentinel draws as background.
    #[inline]
    pub fn jewel_color(&self, jewel: Jewel) -> Color {
        jewel.index().map_or(self.bg, |i| self.jewels[i])
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

fn hex_digits(s: &str) -> Result<u8, ThemeError> {
    u8::from_str_radix(s, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let (r, g, b) = match s.len() {
        6 => (hex_digits(&s[0..2])?, hex_digits(&s[2..4])?, hex_digits(&s[4..6])?),
        3 => (
            hex_digits(&s[0..1])? * 17,
            hex_digits(&s[1..2])? * 17,
            hex_digits(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GG0000").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_theme_file_overrides_jewels() {
        let map = parse_theme_file("theme[cpu_box]=\"#000001\"\n# comment\ntheme[cpu_end]='#FF0000'");
        let t = Theme::from_map(&map);
        assert_eq!(t.jewel_color(Jewel::Blue), Color::Rgb(0, 0, 1));
        assert_eq!(t.jewel_color(Jewel::Red), Color::Rgb(0xFF, 0, 0));
        assert_eq!(t.jewel_color(Jewel::None), t.bg);
    }
}
