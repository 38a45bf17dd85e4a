use serde::Deserialize;

/// An RGB + alpha color using 0 to 1 floats. Defaults to fully opaque black.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
    #[serde(default = "opaque")]
    pub alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Default for Rgba {
    fn default() -> Self {
        BLACK
    }
}

impl Rgba {
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from RGB channels.
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }
}

// Useful color constants
pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
pub const RED: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
pub const GREEN: Rgba = Rgba::rgb(0.0, 1.0, 0.0);
pub const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 1.0);

/// Parse a color given as "r,g,b" or "r,g,b,a" with 0..1 channels.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut ch = [0.0f64; 4];
    ch[3] = 1.0;
    for (i, p) in parts.iter().enumerate() {
        ch[i] = p.parse().ok()?;
    }
    Some(Rgba::new(ch[0], ch[1], ch[2], ch[3]))
}
