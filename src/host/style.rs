use crate::foundation::color::CssColor;

/// Stroke end cap style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Flat end at the vertex.
    Butt,
    /// Semicircular end.
    #[default]
    Round,
    /// Square end extended by half the line width.
    Square,
}

/// Stroke corner style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    /// Sharp corner.
    Miter,
    /// Rounded corner.
    #[default]
    Round,
    /// Cut-off corner.
    Bevel,
}

/// Interior test used when filling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    /// Non-zero winding.
    NonZero,
    /// Even-odd parity.
    #[default]
    EvenOdd,
}

/// Styling options of a vector layer, with the host widget's defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathStyle {
    /// Whether the outline is stroked.
    pub stroke: bool,
    /// Stroke color; also the fill color when `fill_color` is unset.
    pub color: String,
    /// Stroke width in pixels. Zero disables stroking.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Stroke end caps.
    pub line_cap: LineCap,
    /// Stroke corners.
    pub line_join: LineJoin,
    /// Dash pattern as a CSS-like list (`"5, 10"`).
    pub dash_array: Option<String>,
    /// Whether the interior is filled.
    pub fill: bool,
    /// Fill color override.
    pub fill_color: Option<String>,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Fill rule; even-odd when unset.
    pub fill_rule: Option<FillRule>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke: true,
            color: "#3388ff".to_owned(),
            weight: 3.0,
            opacity: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash_array: None,
            fill: false,
            fill_color: None,
            fill_opacity: 0.2,
            fill_rule: None,
        }
    }
}

impl PathStyle {
    /// Defaults for filled shapes (polygons, circles).
    pub fn filled() -> Self {
        Self {
            fill: true,
            ..Self::default()
        }
    }

    /// Resolved stroke color; unparsable colors fall back to black.
    pub fn stroke_color(&self) -> CssColor {
        parse_or_black(&self.color)
    }

    /// Resolved fill color (`fill_color`, else `color`).
    pub fn fill_color(&self) -> CssColor {
        parse_or_black(self.fill_color.as_deref().unwrap_or(&self.color))
    }

    /// Resolved fill rule.
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule.unwrap_or_default()
    }

    /// Whether a stroke pass should run.
    pub fn strokes(&self) -> bool {
        self.stroke && self.weight != 0.0
    }

    /// Parsed dash pattern, normalised to an even number of entries.
    ///
    /// Lists containing a negative, non-finite or unparsable entry, or summing to zero, yield an
    /// empty pattern (solid line).
    pub fn dash_pattern(&self) -> Vec<f64> {
        let Some(raw) = self.dash_array.as_deref() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for part in raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
        {
            match part.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => out.push(v),
                _ => return Vec::new(),
            }
        }
        if out.iter().sum::<f64>() <= 0.0 {
            return Vec::new();
        }
        if out.len() % 2 == 1 {
            out.extend_from_within(..);
        }
        out
    }
}

fn parse_or_black(s: &str) -> CssColor {
    CssColor::parse(s).unwrap_or_else(|e| {
        tracing::debug!(color = s, error = %e, "unparsable style color, using black");
        CssColor::BLACK
    })
}

#[cfg(test)]
#[path = "../../tests/unit/host/style.rs"]
mod tests;
