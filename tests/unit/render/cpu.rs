use std::collections::BTreeMap;

use super::*;
use crate::foundation::core::{Canvas, LatLng, LayerId, PixelBounds, TileKey};
use crate::host::layer::{CircleLayer, Layer};
use crate::host::style::PathStyle;
use crate::resolve::session::{ResolvedMarker, ResolvedTileImage, ResolvedTileLayer};
use crate::resolve::viewport::ExportViewport;

struct PlaneHost;

impl MapHost for PlaneHost {
    fn size(&self) -> Canvas {
        Canvas::new(100, 100)
    }
    fn pixel_bounds(&self) -> PixelBounds {
        PixelBounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0))
    }
    fn zoom(&self) -> f64 {
        0.0
    }
    fn project(&self, at: LatLng) -> Point {
        Point::new(at.lng, at.lat)
    }
    fn layers(&self) -> Vec<MapExportResult<Layer>> {
        Vec::new()
    }
}

fn session() -> ExportSession {
    ExportSession::new(
        ExportViewport {
            canvas: Canvas::new(100, 100),
            bounds: PixelBounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
        },
        0.0,
    )
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DecodedImage {
    let data = rgba.repeat((w * h) as usize);
    DecodedImage::from_premul(w, h, data).unwrap()
}

fn tile_layer(tiles: Vec<(TileKey, ResolvedTileImage)>) -> ResolvedTileLayer {
    ResolvedTileLayer {
        id: LayerId(1),
        tile_size: 2,
        effective_zoom: 0.0,
        scale_factor: 1.0,
        tiles: tiles.into_iter().collect::<BTreeMap<_, _>>(),
    }
}

#[test]
fn empty_session_is_transparent_or_clear_color() {
    let frame = composite(&session(), &PlaneHost, &ExportOpts::default()).unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));
    assert_eq!(frame.data.len(), 100 * 100 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(50, 50), Some([0, 0, 0, 0]));

    let opts = ExportOpts::default().with_clear_rgba(Some([255, 255, 255, 255]));
    let frame = composite(&session(), &PlaneHost, &opts).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(99, 99), Some([255, 255, 255, 255]));
}

#[test]
fn tiles_are_scaled_to_draw_size_with_opacity() {
    let mut s = session();
    s.register_tile_layer(
        tile_layer(vec![
            (
                TileKey { row: 0, col: 0 },
                ResolvedTileImage {
                    image: solid(2, 2, [255, 0, 0, 255]),
                    position: Point::new(4.0, 4.0),
                    draw_size: 8.0,
                    opacity: 1.0,
                },
            ),
            (
                TileKey { row: 0, col: 1 },
                ResolvedTileImage {
                    image: solid(2, 2, [0, 255, 0, 255]),
                    position: Point::new(40.0, 40.0),
                    draw_size: 2.0,
                    opacity: 0.5,
                },
            ),
        ]),
        2,
    );
    let frame = composite(&s, &PlaneHost, &ExportOpts::default()).unwrap();
    assert_eq!(frame.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(13, 13), Some([0, 0, 0, 0]));
    let [_, g, _, a] = frame.pixel(41, 41).unwrap();
    assert!((120..=135).contains(&a) && g == a, "half-opaque tile got alpha {a}");
}

#[test]
fn markers_draw_over_paths() {
    let mut s = session();
    s.register_path(
        LayerId(2),
        ResolvedPath {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
                Point::new(0.0, 50.0),
            ],
            closed: true,
            style: PathStyle {
                fill_color: Some("#0000ff".to_owned()),
                fill_opacity: 1.0,
                stroke: false,
                ..PathStyle::filled()
            },
        },
    );
    s.register_marker(
        LayerId(1),
        ResolvedMarker {
            image: solid(4, 4, [255, 0, 0, 255]),
            position: Point::new(10.0, 10.0),
        },
    );
    let frame = composite(&s, &PlaneHost, &ExportOpts::default()).unwrap();
    assert_eq!(frame.pixel(11, 11), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(30, 30), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(70, 70), Some([0, 0, 0, 0]));
}

#[test]
fn elliptical_circle_does_not_leak_scale_into_later_circles() {
    let solid_fill = PathStyle {
        stroke: false,
        fill_opacity: 1.0,
        fill_color: Some("#000000".to_owned()),
        ..PathStyle::filled()
    };
    let mut s = session();
    s.register_circle(
        LayerId(1),
        CircleLayer {
            lat_lng: LatLng::new(50.0, 50.0),
            radius_px: Some(10.0),
            radius_y_px: Some(20.0),
            radius: 10.0,
            style: solid_fill.clone(),
        },
    );
    s.register_circle(
        LayerId(2),
        CircleLayer {
            style: solid_fill,
            ..CircleLayer::new(LatLng::new(20.0, 20.0), 5.0)
        },
    );
    let frame = composite(&s, &PlaneHost, &ExportOpts::default()).unwrap();

    assert_eq!(frame.pixel(50, 35).unwrap()[3], 255);
    assert_eq!(frame.pixel(50, 65).unwrap()[3], 255);
    assert_eq!(frame.pixel(65, 50).unwrap()[3], 0);

    assert_eq!(frame.pixel(20, 20).unwrap()[3], 255);
    assert_eq!(frame.pixel(20, 28).unwrap()[3], 0);
    assert_eq!(frame.pixel(20, 12).unwrap()[3], 0);
}

#[test]
fn empty_circles_are_skipped() {
    let mut s = session();
    s.register_circle(
        LayerId(1),
        CircleLayer {
            radius_px: Some(0.0),
            ..CircleLayer::new(LatLng::new(50.0, 50.0), 5.0)
        },
    );
    let frame = composite(&s, &PlaneHost, &ExportOpts::default()).unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn outline_closes_only_filled_paths() {
    let mut path = ResolvedPath {
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        closed: false,
        style: PathStyle::default(),
    };
    assert_eq!(path_outline(&path).unwrap().elements().len(), 2);
    path.closed = true;
    assert_eq!(path_outline(&path).unwrap().elements().len(), 3);
    path.points.clear();
    assert!(path_outline(&path).is_none());
}

#[test]
fn undrawable_marker_image_is_skipped_not_fatal() {
    let mut s = session();
    s.register_marker(
        LayerId(1),
        ResolvedMarker {
            image: solid(70_000, 1, [0, 0, 255, 255]),
            position: Point::new(0.0, 0.0),
        },
    );
    s.register_marker(
        LayerId(2),
        ResolvedMarker {
            image: solid(4, 4, [255, 0, 0, 255]),
            position: Point::new(10.0, 10.0),
        },
    );
    let frame = composite(&s, &PlaneHost, &ExportOpts::default()).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(11, 11), Some([255, 0, 0, 255]));
}
