use std::str::FromStr;

use crate::foundation::error::{MapExportError, MapExportResult};

/// Straight-alpha RGBA8 color parsed from a CSS color string.
///
/// Supports the forms host widgets put in style options: `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa`, `rgb()/rgba()`, `hsl()/hsla()` and a small set of named colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CssColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl CssColor {
    /// Opaque black, the drawing surface default.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Build a color from straight RGBA8 channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Parse a CSS color string.
    pub fn parse(s: &str) -> MapExportResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some((name, args)) = split_function(&lower) {
            return match name {
                "rgb" | "rgba" => parse_rgb_args(args),
                "hsl" | "hsla" => parse_hsl_args(args),
                _ => Err(MapExportError::validation(format!(
                    "unsupported color function \"{name}\""
                ))),
            };
        }
        named(&lower)
            .ok_or_else(|| MapExportError::validation(format!("unknown color \"{s}\"")))
    }
}

impl FromStr for CssColor {
    type Err = MapExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let args = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), args))
}

fn parse_hex(s: &str) -> MapExportResult<CssColor> {
    fn nibble(c: u8) -> MapExportResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| MapExportError::validation(format!("invalid hex digit '{}'", c as char)))
    }

    let bytes = s.as_bytes();
    let mut ch = Vec::with_capacity(4);
    match bytes.len() {
        3 | 4 => {
            for &c in bytes {
                let n = nibble(c)?;
                ch.push(n * 17);
            }
        }
        6 | 8 => {
            for pair in bytes.chunks_exact(2) {
                ch.push(nibble(pair[0])? * 16 + nibble(pair[1])?);
            }
        }
        _ => {
            return Err(MapExportError::validation(
                "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA",
            ));
        }
    }
    let a = ch.get(3).copied().unwrap_or(255);
    Ok(CssColor::rgba(ch[0], ch[1], ch[2], a))
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_component(part: &str, scale: f64) -> MapExportResult<f64> {
    let (num, pct) = match part.strip_suffix('%') {
        Some(n) => (n, true),
        None => (part, false),
    };
    let v: f64 = num
        .parse()
        .map_err(|_| MapExportError::validation(format!("invalid color component \"{part}\"")))?;
    Ok(if pct { v / 100.0 } else { v / scale })
}

fn parse_alpha(parts: &[&str]) -> MapExportResult<f64> {
    match parts.get(3) {
        Some(p) => parse_component(p, 1.0),
        None => Ok(1.0),
    }
}

fn parse_rgb_args(args: &str) -> MapExportResult<CssColor> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(MapExportError::validation(
            "rgb() expects 3 or 4 components",
        ));
    }
    let r = parse_component(parts[0], 255.0)?;
    let g = parse_component(parts[1], 255.0)?;
    let b = parse_component(parts[2], 255.0)?;
    Ok(CssColor::from_unit(r, g, b, parse_alpha(&parts)?))
}

fn parse_hsl_args(args: &str) -> MapExportResult<CssColor> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(MapExportError::validation(
            "hsl() expects 3 or 4 components",
        ));
    }
    let h: f64 = parts[0]
        .trim_end_matches("deg")
        .parse()
        .map_err(|_| MapExportError::validation(format!("invalid hue \"{}\"", parts[0])))?;
    let s = parse_component(parts[1], 100.0)?;
    let l = parse_component(parts[2], 100.0)?;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(CssColor::from_unit(r, g, b, parse_alpha(&parts)?))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn named(name: &str) -> Option<CssColor> {
    let c = match name {
        "transparent" => CssColor::rgba(0, 0, 0, 0),
        "black" => CssColor::rgba(0, 0, 0, 255),
        "white" => CssColor::rgba(255, 255, 255, 255),
        "red" => CssColor::rgba(255, 0, 0, 255),
        "green" => CssColor::rgba(0, 128, 0, 255),
        "lime" => CssColor::rgba(0, 255, 0, 255),
        "blue" => CssColor::rgba(0, 0, 255, 255),
        "yellow" => CssColor::rgba(255, 255, 0, 255),
        "orange" => CssColor::rgba(255, 165, 0, 255),
        "purple" => CssColor::rgba(128, 0, 128, 255),
        "magenta" | "fuchsia" => CssColor::rgba(255, 0, 255, 255),
        "cyan" | "aqua" => CssColor::rgba(0, 255, 255, 255),
        "gray" | "grey" => CssColor::rgba(128, 128, 128, 255),
        "silver" => CssColor::rgba(192, 192, 192, 255),
        "maroon" => CssColor::rgba(128, 0, 0, 255),
        "navy" => CssColor::rgba(0, 0, 128, 255),
        "olive" => CssColor::rgba(128, 128, 0, 255),
        "teal" => CssColor::rgba(0, 128, 128, 255),
        "brown" => CssColor::rgba(165, 42, 42, 255),
        "pink" => CssColor::rgba(255, 192, 203, 255),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
