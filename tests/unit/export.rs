use super::*;
use crate::foundation::core::{Canvas, LatLng};
use crate::host::fetch::MemoryFetcher;
use crate::host::static_map::StaticMap;

#[test]
fn encode_png_unpremultiplies() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 0, 0, 255, 255],
        premultiplied: true,
    };
    let png = encode_png(&frame).unwrap();
    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 1));
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert_eq!(back.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn encode_png_rejects_short_buffers() {
    let frame = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 8],
        premultiplied: true,
    };
    let err = encode_png(&frame).unwrap_err();
    assert!(err.to_string().starts_with("encode error:"));
}

#[test]
fn blocking_export_of_empty_map_matches_viewport() {
    let map = StaticMap::new(LatLng::new(0.0, 0.0), 2.0, Canvas::new(40, 30));
    let out =
        export_viewport_blocking(&map, &MemoryFetcher::new(), &ExportOpts::default()).unwrap();
    assert_eq!((out.width, out.height), (40, 30));
    assert_eq!(out.file_name, "exported.png");
    assert_eq!(out.stats, ExportStats::default());
    assert!(out.png.starts_with(b"\x89PNG"));
}

#[test]
fn bad_crop_surfaces_as_error() {
    let map = StaticMap::new(LatLng::new(0.0, 0.0), 2.0, Canvas::new(40, 30));
    let opts = ExportOpts::default().with_crop(Some(f64::NAN));
    let err = export_viewport_blocking(&map, &MemoryFetcher::new(), &opts).unwrap_err();
    assert!(matches!(err, MapExportError::Validation(_)));
}

#[test]
fn save_to_dir_uses_file_name() {
    let dir = std::env::temp_dir().join(format!("map-export-save-{}", std::process::id()));
    let img = ExportedImage {
        png: vec![1, 2, 3],
        width: 1,
        height: 1,
        file_name: "view.png".to_owned(),
        stats: ExportStats::default(),
    };
    let path = img.save_to_dir(&dir).unwrap();
    assert_eq!(path, dir.join("view.png"));
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    std::fs::remove_dir_all(&dir).ok();
}
