use std::fs;
use std::path::Path;
use tempfile::tempdir;

use flashprobe::application::dto::InspectOptions;
use flashprobe::application::{InspectImageUseCase, LocatePartitionUseCase};
use flashprobe::core::ByteImage;
use flashprobe::domain::entities::SPIFFS_MAGIC;
use flashprobe::domain::repositories::RecoveredFileWriter;
use flashprobe::domain::services::ScanOutcome;
use flashprobe::infrastructure::persistence::LocalFileWriter;

const PAGE: usize = 256;

fn write_object(image: &mut [u8], offset: usize, name: &str, payload: &[u8]) {
    image[offset..offset + 4].copy_from_slice(&SPIFFS_MAGIC.to_le_bytes());
    image[offset + 4] = 1;
    image[offset + 5..offset + 7].copy_from_slice(&((offset / PAGE) as u16).to_le_bytes());
    image[offset + 8..offset + 12].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    image[offset + 12] = name.len() as u8;
    let name_start = offset + 32;
    image[name_start..name_start + name.len()].copy_from_slice(name.as_bytes());
    let data_start = name_start + name.len();
    image[data_start..data_start + payload.len()].copy_from_slice(payload);
}

fn sample_payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| ((i.wrapping_mul(31).wrapping_add(seed as usize)) % 200) as u8 + 1)
        .collect()
}

fn create_spiffs_image() -> Vec<u8> {
    let mut image = vec![0xFFu8; 64 * 1024];
    write_object(&mut image, 0, "/index.html", &sample_payload(180, 1));
    write_object(&mut image, 4 * PAGE, "/css/style.css", &sample_payload(700, 2));
    write_object(&mut image, 12 * PAGE, "/js/app.js", &sample_payload(2000, 3));
    image
}

#[test]
fn test_full_extraction_pipeline() {
    let dir = tempdir().unwrap();
    let image_path = dir.path().join("spiffs.bin");
    let output_dir = dir.path().join("extracted");

    let image = create_spiffs_image();
    fs::write(&image_path, &image).unwrap();

    let options = InspectOptions::default().with_extract_dir(&output_dir);
    let report = InspectImageUseCase::default()
        .execute(&image_path, &options)
        .unwrap();

    assert!(report.success);
    assert_eq!(report.headers().len(), 3);
    assert_eq!(report.extracted.len(), 3);
    assert!(report.failures.is_empty());
    assert!(report.fallback.is_none());
    assert!(report.leading_bytes.is_none());

    for header in report.headers() {
        let range = header.payload_range(image.len()).unwrap();
        let written = fs::read(output_dir.join(header.relative_name())).unwrap();
        assert_eq!(written, &image[range]);
    }

    assert!(output_dir.join("css").is_dir());
    assert!(output_dir.join("js").join("app.js").is_file());
}

#[test]
fn test_out_of_bounds_entry_does_not_abort_batch() {
    let dir = tempdir().unwrap();
    let mut image = create_spiffs_image();
    let broken = 20 * PAGE;
    write_object(&mut image, broken, "/broken.bin", b"");
    image[broken + 8..broken + 12].copy_from_slice(&0x0100_0000u32.to_le_bytes());

    let options = InspectOptions::default().with_extract_dir(dir.path());
    let report = InspectImageUseCase::default()
        .inspect(&ByteImage::from_bytes(image), "memory".to_string(), &options)
        .unwrap();

    assert!(report.success);
    assert_eq!(report.headers().len(), 4);
    assert_eq!(report.extracted.len(), 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "/broken.bin");
    assert!(!dir.path().join("broken.bin").exists());
}

#[test]
fn test_unsafe_name_is_reported_not_written() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let mut image = vec![0xFFu8; 4096];
    write_object(&mut image, 0, "/../../etc/evil", b"payload");
    write_object(&mut image, PAGE, "/fine.txt", b"payload");

    let options = InspectOptions::default().with_extract_dir(&out);
    let report = InspectImageUseCase::default()
        .inspect(&ByteImage::from_bytes(image), "memory".to_string(), &options)
        .unwrap();

    assert_eq!(report.extracted.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(out.join("fine.txt").is_file());
    assert!(!dir.path().join("etc").exists());
}

#[test]
fn test_signature_fallback_extracts_web_assets() {
    let dir = tempdir().unwrap();
    let mut image = vec![0xFFu8; 512];
    let html_start = image.len();
    image.extend(b"<!DOCTYPE html><html><head><title>Timer</title></head><body>");
    image.extend(b"<div id=\"laps\"></div></body></html>");
    image.extend(vec![0xFF; 1024]);
    let css_start = image.len();
    image.extend(b"body { margin: 0; font-family: monospace; background: #111; color: #eee; }");
    image.extend(vec![0x00; 1024]);

    let options = InspectOptions::default().with_extract_dir(dir.path());
    let report = InspectImageUseCase::default()
        .inspect(&ByteImage::from_bytes(image.clone()), "memory".to_string(), &options)
        .unwrap();

    assert_eq!(report.scan, ScanOutcome::NoObjects);
    assert!(report.success);
    assert_eq!(report.blocks().len(), 2);
    assert_eq!(report.extracted.len(), 2);
    assert!(report.leading_bytes.is_none());

    let html = fs::read(dir.path().join("index.html")).unwrap();
    assert!(html.starts_with(b"<!DOCTYPE html"));
    assert!(html.ends_with(b"</html>"));
    assert_eq!(report.extracted[0].source_offset, html_start);

    let css = fs::read(dir.path().join("style.css")).unwrap();
    assert_eq!(report.extracted[1].source_offset, css_start);
    assert!(css.ends_with(b"}"));
}

fn create_blank_prefixed_image() -> Vec<u8> {
    let mut image = vec![0u8; 2048];
    image.extend(b"<html><body>");
    image.extend(vec![b'.'; 64]);
    image.extend(b"</body></html>");
    image
}

#[test]
fn test_blank_image_without_extraction_fails() {
    let report = InspectImageUseCase::default()
        .inspect(
            &ByteImage::from_bytes(create_blank_prefixed_image()),
            "memory".to_string(),
            &InspectOptions::default(),
        )
        .unwrap();

    assert_eq!(report.scan, ScanOutcome::Corrupted);
    assert!(report.fallback.is_none());
    assert!(report.leading_bytes.is_none());
    assert!(!report.success);
}

#[test]
fn test_blank_image_with_extraction_recovers_markup() {
    let dir = tempdir().unwrap();
    let options = InspectOptions::default().with_extract_dir(dir.path());

    let report = InspectImageUseCase::default()
        .inspect(
            &ByteImage::from_bytes(create_blank_prefixed_image()),
            "memory".to_string(),
            &options,
        )
        .unwrap();

    assert_eq!(report.scan, ScanOutcome::Corrupted);
    assert_eq!(report.blocks().len(), 1);
    assert_eq!(report.extracted.len(), 1);
    assert!(report.success);

    let html = fs::read(dir.path().join("index.html")).unwrap();
    assert!(html.starts_with(b"<html><body>"));
    assert!(html.ends_with(b"</html>"));
}

#[test]
fn test_nothing_found_emits_leading_bytes() {
    let image: Vec<u8> = (0..2048).map(|i| (i % 7) as u8 + 1).collect();

    let report = InspectImageUseCase::default()
        .inspect(
            &ByteImage::from_bytes(image.clone()),
            "memory".to_string(),
            &InspectOptions::default(),
        )
        .unwrap();

    assert!(!report.success);
    assert!(report.nothing_recovered());
    assert_eq!(report.leading_bytes.as_deref(), Some(&image[..512]));
}

#[test]
fn test_inspect_missing_file() {
    let dir = tempdir().unwrap();
    let result = InspectImageUseCase::default()
        .execute(&dir.path().join("missing.bin"), &InspectOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_locate_partition_from_file() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("partitions.bin");

    let mut table = vec![0u8; 64];
    table[..3].copy_from_slice(b"nvs");
    table[16] = 0x01;
    table[18] = 0x02;
    table[32..38].copy_from_slice(b"spiffs");
    table[48] = 0x01;
    table[50] = 0x82;
    table[52..56].copy_from_slice(&0x0029_0000u32.to_le_bytes());
    table.extend(vec![0xFF; 32]);
    fs::write(&table_path, &table).unwrap();

    let lookup = LocatePartitionUseCase::new().execute(&table_path).unwrap();
    assert_eq!(lookup.entries.len(), 2);
    assert_eq!(lookup.result().unwrap().offset_hex(), "0x290000");
    assert_eq!(lookup.filesystem.as_ref().unwrap().name, "spiffs");
}

#[test]
fn test_locate_partition_missing_file() {
    let result = LocatePartitionUseCase::new().execute(Path::new("/nonexistent/partitions.bin"));
    assert!(result.is_err());
}

#[test]
fn test_writer_counts_across_batch() {
    let dir = tempdir().unwrap();
    let writer = LocalFileWriter::new(dir.path()).unwrap();
    let image = ByteImage::from_bytes(create_spiffs_image());

    let report = InspectImageUseCase::default().inspect_with_writer(
        &image,
        "memory".to_string(),
        &InspectOptions::default(),
        Some(&writer),
    );

    assert_eq!(writer.files_written(), 3);
    assert_eq!(writer.bytes_written(), 180 + 700 + 2000);
    assert_eq!(report.extract_dir.as_deref(), Some(dir.path()));
}
