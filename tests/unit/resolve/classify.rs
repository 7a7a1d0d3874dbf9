use super::*;
use crate::foundation::core::{Canvas, LatLng, PixelBounds, Point};
use crate::foundation::error::{MapExportError, MapExportResult};
use crate::host::fetch::MemoryFetcher;
use crate::host::style::PathStyle;

struct PlaneHost {
    layers: Vec<Layer>,
    faulty: bool,
}

impl MapHost for PlaneHost {
    fn size(&self) -> Canvas {
        Canvas::new(100, 100)
    }
    fn pixel_bounds(&self) -> PixelBounds {
        PixelBounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0))
    }
    fn zoom(&self) -> f64 {
        2.0
    }
    fn project(&self, at: LatLng) -> Point {
        Point::new(at.lng, at.lat)
    }
    fn layers(&self) -> Vec<MapExportResult<Layer>> {
        let mut out: Vec<_> = self.layers.iter().cloned().map(Ok).collect();
        if self.faulty {
            out.insert(0, Err(MapExportError::validation("broken layer")));
        }
        out
    }
}

fn viewport() -> ExportViewport {
    ExportViewport {
        canvas: Canvas::new(100, 100),
        bounds: PixelBounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
    }
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 0, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn marker(url: Option<&str>) -> LayerKind {
    LayerKind::Marker(MarkerLayer {
        lat_lng: LatLng::new(10.0, 10.0),
        icon_url: url.map(str::to_owned),
        icon_anchor: None,
    })
}

#[test]
fn classification_follows_capabilities() {
    assert!(matches!(classify(&Layer::new(1, marker(Some("a.png")))), LayerClass::Marker(_)));
    assert!(matches!(classify(&Layer::new(1, marker(None))), LayerClass::Ignored));
    assert!(matches!(classify(&Layer::new(1, marker(Some("")))), LayerClass::Ignored));
    assert!(matches!(
        classify(&Layer::new(1, LayerKind::TileRaster(TileLayer::new("t")))),
        LayerClass::TileRaster(_)
    ));
    let empty_path = PathLayer {
        rings: Vec::new(),
        style: PathStyle::default(),
    };
    assert!(matches!(classify(&Layer::new(1, LayerKind::Path(empty_path))), LayerClass::Ignored));
    assert!(matches!(classify(&Layer::new(1, LayerKind::Unknown)), LayerClass::Ignored));
}

#[tokio::test]
async fn mixed_layers_resolve_into_one_session() {
    let host = PlaneHost {
        faulty: true,
        layers: vec![
            Layer::new(3, LayerKind::TileRaster(TileLayer::new("t/{z}/{x}/{y}.png"))),
            Layer::new(5, marker(Some("pin.png"))),
            Layer::new(5, marker(Some("pin.png"))),
            Layer::new(
                8,
                LayerKind::Path(PathLayer {
                    rings: vec![vec![LatLng::new(10.0, 10.0), LatLng::new(50.0, 50.0)]],
                    style: PathStyle::default(),
                }),
            ),
            Layer::new(
                9,
                LayerKind::Path(PathLayer {
                    rings: vec![vec![LatLng::new(500.0, 500.0)]],
                    style: PathStyle::default(),
                }),
            ),
            Layer::new(11, LayerKind::Circle(CircleLayer::new(LatLng::new(1.0, 1.0), 4.0))),
            Layer::new(12, LayerKind::Unknown),
        ],
    };
    let fetcher = MemoryFetcher::new()
        .with("t/2/0/0.png", png(256, 256))
        .with("pin.png", png(2, 2));

    let session = resolve_layers(&host, &fetcher, viewport(), &ExportOpts::default()).await;

    assert_eq!(session.zoom, 2.0);
    assert_eq!(session.tile_layers.len(), 1);
    assert_eq!(session.stats.tiles_drawn, 1);
    assert_eq!(session.markers.len(), 1);
    assert_eq!(session.paths.keys().map(|k| k.0).collect::<Vec<_>>(), vec![8]);
    assert_eq!(session.circles.len(), 1);
    assert_eq!(session.stats.layers_skipped, 2);
}

#[tokio::test]
async fn broken_tile_layer_does_not_abort_siblings() {
    let mut bad = TileLayer::new("t");
    bad.tile_size = 0;
    let host = PlaneHost {
        faulty: false,
        layers: vec![
            Layer::new(1, LayerKind::TileRaster(bad)),
            Layer::new(2, marker(Some("pin.png"))),
        ],
    };
    let fetcher = MemoryFetcher::new().with("pin.png", png(2, 2));

    let session = resolve_layers(&host, &fetcher, viewport(), &ExportOpts::default()).await;
    assert!(session.tile_layers.is_empty());
    assert_eq!(session.markers.len(), 1);
    assert_eq!(session.stats.layers_skipped, 1);
}
