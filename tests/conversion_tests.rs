//! Library-level conversion tests
//!
//! Drives the run pipeline against an in-memory `LevelStore` so that every
//! save and persist can be observed, and against `LocalLevels` for level
//! string fidelity.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use img2gd::color::Rgb;
use img2gd::convert::{convert_image, ConvertError, ConvertOptions, Origin, ReferenceChannel};
use img2gd::level::LevelDocument;
use img2gd::pipeline::{run, RunParams};
use img2gd::report::NullReporter;
use img2gd::store::{LevelHandle, LevelInfo, LevelRecord, LevelStore, LocalLevels, StoreError};
use tempfile::TempDir;

/// Store keeping level strings in memory and counting persists.
#[derive(Default)]
struct MemoryStore {
    levels: Vec<(LevelInfo, String)>,
    persisted: Vec<(LevelInfo, String)>,
    persist_calls: usize,
}

impl MemoryStore {
    fn with_level(name: &str, data: &str) -> Self {
        let info = LevelInfo {
            name: name.to_string(),
            revision: 0,
            author: "mem".to_string(),
            song_id: 0,
            binary_version: 35,
        };
        let levels = vec![(info, data.to_string())];
        Self { persisted: levels.clone(), levels, persist_calls: 0 }
    }

    fn persisted_doc(&self, name: &str) -> LevelDocument {
        let (_, data) = self.persisted.iter().find(|(i, _)| i.name == name).unwrap();
        LevelDocument::parse(data).unwrap()
    }
}

impl LevelStore for MemoryStore {
    fn level_exists(&self, name: &str) -> bool {
        self.levels.iter().any(|(i, _)| i.name == name)
    }

    fn get_level(&self, name: &str, revision: u32) -> Result<LevelHandle, StoreError> {
        self.levels
            .iter()
            .find(|(i, _)| i.name == name && i.revision == revision)
            .map(|(i, _)| LevelHandle::new(i.clone()))
            .ok_or_else(|| StoreError::LevelNotFound { name: name.to_string(), revision })
    }

    fn load(&self, handle: &LevelHandle) -> Result<LevelDocument, StoreError> {
        let (_, data) = self.levels.iter().find(|(i, _)| i == handle.info()).unwrap();
        LevelDocument::parse(data)
            .map_err(|source| StoreError::Corrupt { name: handle.name().to_string(), source })
    }

    fn save(&mut self, handle: &LevelHandle, doc: &LevelDocument) -> Result<(), StoreError> {
        let entry = self.levels.iter_mut().find(|(i, _)| i == handle.info()).unwrap();
        entry.1 = doc.encode();
        Ok(())
    }

    fn levels(&self) -> Vec<LevelInfo> {
        self.levels.iter().map(|(i, _)| i.clone()).collect()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.persisted = self.levels.clone();
        self.persist_calls += 1;
        Ok(())
    }

    fn data_files(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

fn write_png(dir: &Path, image: &RgbaImage) -> PathBuf {
    let path = dir.join("source.png");
    image.save(&path).unwrap();
    path
}

fn params(image: PathBuf, level: &str) -> RunParams {
    RunParams {
        image,
        level: level.to_string(),
        revision: 0,
        backup_dir: None,
        options: ConvertOptions::default(),
    }
}

#[test]
fn test_tall_image_flips_vertically() {
    let temp = TempDir::new().unwrap();
    let mut img = RgbaImage::new(1, 10);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(0, 9, Rgba([0, 0, 0, 255]));
    let png = write_png(temp.path(), &img);

    let mut store = MemoryStore::with_level("Tall", "");
    let mut p = params(png, "Tall");
    p.options.origin = Origin::new(0, 100);
    run(&p, &mut store, &NullReporter).unwrap();

    let doc = store.persisted_doc("Tall");
    let ys: Vec<f32> = doc.objects().iter().map(|o| o.y).collect();
    assert_eq!(doc.object_count(), 2);
    assert!(ys.contains(&147.5), "top row maps to 9*5+2.5+100");
    assert!(ys.contains(&102.5), "bottom row maps to 2.5+100");
}

#[test]
fn test_persist_happens_once() {
    let temp = TempDir::new().unwrap();
    let png = write_png(temp.path(), &RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])));
    let mut store = MemoryStore::with_level("Canvas", "");

    let summary = run(&params(png, "Canvas"), &mut store, &NullReporter).unwrap();
    assert_eq!(summary.placed, 16);
    assert_eq!(store.persist_calls, 1);
    assert_eq!(store.persisted_doc("Canvas").object_count(), 16);
}

#[test]
fn test_rejected_reference_persists_nothing() {
    let temp = TempDir::new().unwrap();
    let png = write_png(temp.path(), &RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
    let mut store = MemoryStore::with_level("Canvas", "");

    let mut p = params(png, "Canvas");
    p.options.reference = ReferenceChannel { id: 0, seed: Rgb::new(255, 0, 0) };
    let err = run(&p, &mut store, &NullReporter).unwrap_err();

    assert!(matches!(err, ConvertError::DocumentMutation { .. }));
    assert_eq!(store.persist_calls, 0);
    assert_eq!(store.persisted_doc("Canvas").object_count(), 0);
}

#[test]
fn test_unsaturated_reference_is_rejected() {
    let temp = TempDir::new().unwrap();
    let png = write_png(temp.path(), &RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])));
    let mut store = MemoryStore::with_level("Canvas", "");

    let mut p = params(png, "Canvas");
    p.options.reference = ReferenceChannel { id: 999, seed: Rgb::new(128, 128, 128) };
    let err = run(&p, &mut store, &NullReporter).unwrap_err();

    assert!(matches!(err, ConvertError::InvalidReference { id: 999, .. }));
    assert_eq!(store.persist_calls, 0);
}

#[test]
fn test_freshly_loaded_copies_convert_identically() {
    let temp = TempDir::new().unwrap();
    let mut img = RgbaImage::new(3, 3);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x * 80) as u8, (y * 80) as u8, 200, if (x + y) % 2 == 0 { 255 } else { 40 }]);
    }

    let mut record = LevelRecord::new("Twin");
    record.data = "kA13,0,kS38,1_40_2_125_3_255_6_1000|;1,8,2,0,3,0,99,kept;".to_string();
    let store = LocalLevels::create(temp.path(), vec![record]).unwrap();
    let handle = store.get_level("Twin", 0).unwrap();

    let options = ConvertOptions::default();
    let mut a = store.load(&handle).unwrap();
    let mut b = store.load(&handle).unwrap();
    convert_image(&img, &options, &mut a, &NullReporter).unwrap();
    convert_image(&img, &options, &mut b, &NullReporter).unwrap();

    assert_eq!(a.object_count(), b.object_count());
    assert_eq!(a.objects(), b.objects());
    assert_eq!(a.encode(), b.encode());
}

#[test]
fn test_existing_level_content_survives_run() {
    let temp = TempDir::new().unwrap();
    let png = write_png(temp.path(), &RgbaImage::from_pixel(1, 1, Rgba([0, 255, 255, 255])));

    let mut record = LevelRecord::new("Busy");
    record.data = "kA13,0,kA4,1;1,8,2,30,3,15,99,kept;".to_string();
    let mut store = LocalLevels::create(&temp.path().join("save"), vec![record]).unwrap();

    run(&params(png, "Busy"), &mut store, &NullReporter).unwrap();

    let reopened = LocalLevels::open(&temp.path().join("save")).unwrap();
    let doc = reopened.load(&reopened.get_level("Busy", 0).unwrap()).unwrap();
    assert_eq!(doc.object_count(), 2);

    let spike = &doc.objects()[0];
    assert_eq!(spike.id, 8);
    assert!(spike.extra.iter().any(|(k, v)| *k == 99 && v == "kept"));
    assert!(doc.header().iter().any(|(k, v)| k == "kA4" && v == "1"));

    let pixel = &doc.objects()[1];
    assert_eq!(pixel.id, 211);
    assert_eq!(pixel.color_channel, Some(999));
    assert_eq!(pixel.scale, Some(5.0));
    assert!((pixel.hsv.unwrap().hue - 180.0).abs() < 1e-4);
}
