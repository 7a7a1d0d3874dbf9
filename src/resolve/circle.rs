use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point};
use crate::host::layer::CircleLayer;

const ARC_TOLERANCE: f64 = 0.1;

/// Circle geometry in raster space, read from the layer's live state at composite time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleGeometry {
    /// Centre in raster space.
    pub center: Point,
    /// Horizontal radius in pixels.
    pub radius: f64,
    /// Vertical over horizontal radius; `1` for round circles.
    pub scale_y: f64,
}

impl CircleGeometry {
    /// Geometry for `layer` centred at the raster point `center`, or `None` when the layer is
    /// empty.
    ///
    /// Live pixel radii are rounded with a floor of one pixel. Without a live radius the
    /// configured radius is used as-is.
    pub fn from_layer(layer: &CircleLayer, center: Point) -> Option<Self> {
        if layer.is_empty() {
            return None;
        }
        let (radius, scale_y) = match layer.radius_px {
            Some(rx) => {
                let r = rx.round().max(1.0);
                let s = layer
                    .radius_y_px
                    .filter(|ry| ry.is_finite())
                    .map_or(1.0, |ry| ry.round().max(1.0) / r);
                (r, s)
            }
            None => (layer.radius, 1.0),
        };
        Some(Self {
            center,
            radius,
            scale_y,
        })
    }

    /// Vertical scaling applied to the arc.
    pub fn transform(&self) -> Affine {
        if self.scale_y == 1.0 {
            Affine::IDENTITY
        } else {
            Affine::scale_non_uniform(1.0, self.scale_y)
        }
    }

    /// Outline path: an arc of `radius` at `(x, y / s)` mapped through [`Self::transform`], so it
    /// lands centred on `center` with vertical radius `radius * s`.
    pub fn to_path(&self) -> BezPath {
        let pre = Point::new(self.center.x, self.center.y / self.scale_y);
        let mut path = kurbo::Circle::new(pre, self.radius).to_path(ARC_TOLERANCE);
        path.apply_affine(self.transform());
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/circle.rs"]
mod tests;
