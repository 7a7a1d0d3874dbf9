use super::*;
use serde_json::json;

#[test]
fn template_url_substitutes_all_placeholders() {
    let layer = TileLayer::new("https://{s}.tile.test/{z}/{x}/{y}{r}.png?inv={-y}");
    let url = layer.template_url(TileCoord { x: 1, y: 2, z: 3 });
    assert_eq!(url, "https://a.tile.test/3/1/2.png?inv=5");
}

#[test]
fn subdomains_rotate_by_coordinate_sum() {
    let layer = TileLayer::new("{s}");
    assert_eq!(layer.template_url(TileCoord { x: 0, y: 0, z: 1 }), "a");
    assert_eq!(layer.template_url(TileCoord { x: 1, y: 0, z: 1 }), "b");
    assert_eq!(layer.template_url(TileCoord { x: 1, y: 1, z: 1 }), "c");
    assert_eq!(layer.template_url(TileCoord { x: -4, y: 0, z: 1 }), "b");
}

#[test]
fn tile_url_applies_zoom_offset_and_tms() {
    let mut layer = TileLayer::new("{z}/{x}/{y}");
    layer.zoom_offset = 1;
    assert_eq!(layer.tile_url(TileCoord { x: 1, y: 1, z: 2 }), "3/1/1");
    layer.tms = true;
    assert_eq!(layer.tile_url(TileCoord { x: 1, y: 1, z: 2 }), "3/1/6");
}

#[test]
fn opacity_prefers_option_then_runtime_field() {
    let mut layer = TileLayer::new("x");
    assert_eq!(layer.effective_opacity(), 1.0);
    layer.current_opacity = Some(0.25);
    assert_eq!(layer.effective_opacity(), 0.25);
    layer.opacity = Some(0.5);
    assert_eq!(layer.effective_opacity(), 0.5);
    layer.opacity = Some(3.0);
    assert_eq!(layer.effective_opacity(), 1.0);
}

#[test]
fn native_zoom_defaults() {
    let mut layer = TileLayer::new("x");
    assert_eq!(layer.native_zoom_range(), (0.0, 20.0));
    layer.max_native_zoom = Some(16.0);
    assert_eq!(layer.native_zoom_range(), (0.0, 16.0));
}

#[test]
fn filled_paths_use_outer_ring_only() {
    let outer = vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0)];
    let hole = vec![LatLng::new(0.5, 0.5)];
    let mut layer = PathLayer {
        rings: vec![outer.clone(), hole],
        style: PathStyle::filled(),
    };
    assert_eq!(layer.vertices(), outer);
    layer.style.fill = false;
    assert_eq!(layer.vertices().len(), 3);
}

#[test]
fn circle_emptiness() {
    let c = CircleLayer::new(LatLng::new(0.0, 0.0), 5.0);
    assert!(!c.is_empty());
    let zero = CircleLayer {
        radius_px: Some(0.0),
        ..c.clone()
    };
    assert!(zero.is_empty());
    let no_live = CircleLayer {
        radius_px: None,
        radius: 0.0,
        ..c
    };
    assert!(no_live.is_empty());
}

#[test]
fn layers_deserialize_by_type_tag() {
    let layers: Vec<Layer> = serde_json::from_value(json!([
        {"id": 1, "type": "tile_raster", "url": "t/{z}/{x}/{y}.png", "maxNativeZoom": 16},
        {"id": 2, "type": "marker", "latLng": {"lat": 1.0, "lng": 2.0}, "iconUrl": "pin.png", "iconAnchor": [12, 41]},
        {"id": 3, "type": "path", "latLngs": [[{"lat": 0.0, "lng": 0.0}]], "options": {"color": "red"}},
        {"id": 4, "type": "circle", "latLng": {"lat": 0.0, "lng": 0.0}, "radiusPx": 8.0},
        {"id": 5, "type": "heatmap"}
    ]))
    .unwrap();

    assert!(matches!(&layers[0].kind, LayerKind::TileRaster(t) if t.max_native_zoom == Some(16.0)));
    assert!(matches!(&layers[1].kind, LayerKind::Marker(m) if m.icon_anchor == Some([12.0, 41.0])));
    assert!(matches!(&layers[2].kind, LayerKind::Path(p) if p.style.color == "red" && !p.style.fill));
    assert!(matches!(&layers[3].kind, LayerKind::Circle(c) if c.style.fill));
    assert!(matches!(layers[4].kind, LayerKind::Unknown));
    assert_eq!(layers[4].id, LayerId(5));
}
