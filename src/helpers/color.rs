//! Series Colors
//!
//! Random color generation for new farms, hex to rgba conversion, and the
//! registry that keeps a farm's color stable across refreshes.

use ahash::AHashMap;
use rand::Rng;

use crate::error::{Error, Result};

/// Generate a random `#RRGGBB` color (uppercase hex)
pub fn get_random_color() -> String {
    format!("#{:06X}", rand::rng().random_range(0..=0xFF_FFFFu32))
}

/// Convert `#RRGGBB` (or `#RGB`) plus alpha into `rgba(r, g, b, a)`
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Invalid {
            message: format!("Invalid hex color: {hex}"),
        });
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => {
            return Err(Error::Invalid {
                message: format!("Invalid hex color: {hex}"),
            });
        }
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| Error::Invalid {
            message: format!("Invalid hex color: {hex}"),
        })
    };

    Ok(format!(
        "rgba({}, {}, {}, {})",
        channel(0)?,
        channel(2)?,
        channel(4)?,
        alpha
    ))
}

/// Farm id to color assignments.
///
/// Entries are only ever added, so a farm keeps its first color for the session.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    colors: AHashMap<String, String>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `farm_id`, assigning a new random one on first sight
    pub fn color_for(&mut self, farm_id: &str) -> String {
        if let Some(color) = self.colors.get(farm_id) {
            return color.clone();
        }
        let color = get_random_color();
        self.colors.insert(farm_id.to_string(), color.clone());
        color
    }

    pub fn get(&self, farm_id: &str) -> Option<&str> {
        self.colors.get(farm_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_color(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    #[test]
    fn test_random_color_format() {
        for _ in 0..500 {
            let color = get_random_color();
            assert!(is_hex_color(&color), "bad color {color}");
        }
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(
            hex_to_rgba("#FF0000", 0.5).expect("rgba"),
            "rgba(255, 0, 0, 0.5)"
        );
        assert_eq!(
            hex_to_rgba("#0f0", 1.0).expect("rgba"),
            "rgba(0, 255, 0, 1)"
        );
        assert!(hex_to_rgba("#GG0000", 0.5).is_err());
        assert!(hex_to_rgba("#FF00", 0.5).is_err());
        // multi-byte characters with a hex-like byte length
        assert!(hex_to_rgba("#€€", 0.5).is_err());
        assert!(hex_to_rgba("#€", 0.5).is_err());
    }

    #[test]
    fn test_registry_is_stable() {
        let mut registry = ColorRegistry::new();
        let first = registry.color_for("farm1");
        let _ = registry.color_for("farm2");
        assert_eq!(registry.color_for("farm1"), first);
        assert_eq!(registry.len(), 2);
    }
}
