use vello_cpu::kurbo::{BezPath, Cap, Join, Stroke};
use vello_cpu::peniko::{Color, Fill};

use crate::foundation::color::CssColor;
use crate::host::style::{FillRule, LineCap, LineJoin, PathStyle};

/// Stroke parameters for `style`: width, caps, joins and dashes.
pub fn stroke_for(style: &PathStyle) -> Stroke {
    let cap = match style.line_cap {
        LineCap::Butt => Cap::Butt,
        LineCap::Round => Cap::Round,
        LineCap::Square => Cap::Square,
    };
    let join = match style.line_join {
        LineJoin::Miter => Join::Miter,
        LineJoin::Round => Join::Round,
        LineJoin::Bevel => Join::Bevel,
    };
    let stroke = Stroke::new(style.weight.abs()).with_caps(cap).with_join(join);
    let dashes = style.dash_pattern();
    if dashes.is_empty() {
        stroke
    } else {
        stroke.with_dashes(0.0, dashes)
    }
}

/// Fill rule in rasteriser terms.
pub fn fill_rule_for(style: &PathStyle) -> Fill {
    match style.fill_rule() {
        FillRule::NonZero => Fill::NonZero,
        FillRule::EvenOdd => Fill::EvenOdd,
    }
}

fn paint(c: CssColor) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f64,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0) as f32
    } else {
        1.0
    };
    if opacity <= 0.0 {
        return;
    }
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    draw(ctx);
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

/// Fill then stroke `path` as `style` describes.
///
/// The fill pass runs when `fill` is set, with `fill_opacity` and the fill color. The stroke pass
/// runs when `stroke` is set and `weight` is non-zero, with `opacity` and `color`.
pub fn fill_and_stroke(ctx: &mut vello_cpu::RenderContext, path: &BezPath, style: &PathStyle) {
    if style.fill {
        ctx.set_fill_rule(fill_rule_for(style));
        ctx.set_paint(paint(style.fill_color()));
        with_opacity(ctx, style.fill_opacity, |ctx| ctx.fill_path(path));
    }
    if style.strokes() {
        ctx.set_stroke(stroke_for(style));
        ctx.set_paint(paint(style.stroke_color()));
        with_opacity(ctx, style.opacity, |ctx| ctx.stroke_path(path));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
