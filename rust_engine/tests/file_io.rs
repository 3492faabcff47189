use std::fs;

use sh_dma::config::DEFAULT_CHUNK_VERSION;
use sh_dma::config::DMA_ANIM_VERSION;
use sh_dma::{Chunk, ChunkPayload, DmaConfig, DmaError, DmaFile, LinkPolicy, MorphCurve, ShapeKeyAnimation};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_animation() -> ShapeKeyAnimation {
    ShapeKeyAnimation::new(
        "",
        vec![
            MorphCurve::from_points("Blink", &[(0.0, 0.0), (6.0, 1.0), (12.0, 0.0)]),
            MorphCurve::from_points("Smile", &[(0.0, 0.0), (30.0, 0.5), (45.0, 1.0), (90.0, 0.0)]),
        ],
    )
}

#[test]
fn save_and_load_file() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("face.dma");

    let anim = sample_animation();
    anim.to_file(&path, DEFAULT_CHUNK_VERSION, 30.0, LinkPolicy::LegacyZeroTerminated)
        .unwrap();

    let dma = DmaFile::load(&path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len() as u32, dma.size());
    assert_eq!(dma.chunks.len(), 1);
    assert_eq!(dma.chunks[0].library_version().to_string(), "3.7.0.2");

    let imported = ShapeKeyAnimation::from_file(
        &path,
        &["Blink", "Smile"],
        30.0,
        LinkPolicy::LegacyZeroTerminated,
    )
    .unwrap()
    .unwrap();
    assert_eq!(imported.name, "face.dma");
    assert_eq!(imported.curves, anim.curves);
    assert_eq!(imported.end_frame, 90.0);
}

#[test]
fn import_export_with_default_config() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.dma");

    let anim = sample_animation();
    anim.export(&path).unwrap();

    let imported = ShapeKeyAnimation::import(&path, &["Blink", "Smile"])
        .unwrap()
        .unwrap();
    assert_eq!(imported.curves, anim.curves);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DmaFile::load(dir.path().join("missing.dma")).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn truncated_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.dma");

    let bytes = sample_animation()
        .to_dma_file(DEFAULT_CHUNK_VERSION, 30.0, LinkPolicy::Forward)
        .unwrap()
        .to_bytes()
        .unwrap();
    fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();

    assert!(matches!(DmaFile::load(&path), Err(DmaError::Io(_))));
}

#[test]
fn empty_file_has_no_animation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.dma");
    DmaFile::default().save(&path).unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    assert!(DmaFile::load(&path).unwrap().chunks.is_empty());
    let imported =
        ShapeKeyAnimation::from_file(&path, &["Blink"], 30.0, LinkPolicy::Forward).unwrap();
    assert!(imported.is_none());
}

#[test]
fn zero_duration_curve_fails_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.dma");

    let anim = ShapeKeyAnimation::new(
        "bad",
        vec![MorphCurve::from_points("Blink", &[(3.0, 0.0), (3.0, 1.0)])],
    );
    let err = anim
        .to_file(&path, DEFAULT_CHUNK_VERSION, 30.0, LinkPolicy::Forward)
        .unwrap_err();
    assert!(err.is_data_error());
    assert!(!path.exists());
}

#[test]
fn config_controls_unknown_chunk_retention() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.dma");

    let action = sample_animation()
        .to_action(30.0, DMA_ANIM_VERSION, 0, LinkPolicy::LegacyZeroTerminated)
        .unwrap();
    DmaFile::new(vec![
        Chunk::opaque(0x10, DEFAULT_CHUNK_VERSION, vec![1, 2, 3, 4]),
        Chunk::action(DEFAULT_CHUNK_VERSION, action),
    ])
    .save(&path)
    .unwrap();

    let keep = DmaConfig {
        keep_unknown_chunks: true,
        ..DmaConfig::default()
    };
    let kept = DmaFile::load_with_config(&path, &keep).unwrap();
    assert_eq!(kept.chunks.len(), 2);
    assert!(matches!(
        &kept.chunks[0].payload,
        ChunkPayload::Opaque(data) if data.as_slice() == [1, 2, 3, 4]
    ));
    assert_eq!(kept.to_bytes().unwrap(), fs::read(&path).unwrap());

    let skipped = DmaFile::load_with_config(&path, &DmaConfig::default()).unwrap();
    assert_eq!(skipped.chunks.len(), 1);
    assert!(skipped.chunks[0].as_action().is_some());

    // 两种配置下导入结果相同
    let a = ShapeKeyAnimation::import_with_config(&path, &["Blink", "Smile"], &keep)
        .unwrap()
        .unwrap();
    let b = ShapeKeyAnimation::import_with_config(&path, &["Blink", "Smile"], &DmaConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a.name, "mixed.dma");
}
