//! Basic processing integration tests

use super::{MeshFixture, field, read_tsv, write_geology_table, write_mesh};
use crate::config::{CalendarMode, StatsConfig};
use crate::processor::MeshProcessor;
use tempfile::TempDir;

fn create_bundle(temp_dir: &TempDir) -> std::path::PathBuf {
    let root = temp_dir.path().join("bundle");
    std::fs::create_dir_all(&root).unwrap();
    write_geology_table(&root, &[("#FFFFFF", 1), ("#000000", 2)]);
    root
}

#[tokio::test]
async fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_bundle(&temp_dir);
    write_mesh(&root, "54382130", &MeshFixture::default());
    write_mesh(
        &root,
        "54382129",
        &MeshFixture {
            daily_value: 2.0,
            ..Default::default()
        },
    );
    let output_dir = temp_dir.path().join("out");

    let processor = MeshProcessor::new(root, output_dir.clone())
        .unwrap()
        .with_config(StatsConfig::default().with_workers(2));
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.meshes_processed, 2);
    assert_eq!(stats.geology_columns, 2);
    assert_eq!(stats.output_path, output_dir.join("mesh_stats.tsv"));

    let rows = read_tsv(&stats.output_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), rows[1].len());

    // Rows sorted by mesh code regardless of completion order
    assert_eq!(rows[1][0], "54382129");
    assert_eq!(rows[2][0], "54382130");

    // January totals: 31 days of the constant value
    assert_eq!(field(&rows, 1, "prec_mean01"), "62.0");
    assert_eq!(field(&rows, 2, "prec_mean01"), "31.0");
    assert_eq!(field(&rows, 2, "temp_mean07"), "1.0");

    // Elevation 100, 102, 100 with one missing cell
    assert_eq!(field(&rows, 2, "ele_med"), "100.0");
    assert_eq!(field(&rows, 2, "ele_mod"), "100");
    assert_eq!(field(&rows, 2, "slp_mean"), "10.0");
    assert_eq!(field(&rows, 2, "slp_mod"), "10");

    let direction: f64 = field(&rows, 2, "dir_mean").parse().unwrap();
    assert!(direction < 1e-6 || direction > 360.0 - 1e-6, "got {}", direction);

    assert_eq!(field(&rows, 2, "geol_1"), "3");
    assert_eq!(field(&rows, 2, "geol_2"), "1");
}

#[tokio::test]
async fn test_all_missing_grid_writes_none() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_bundle(&temp_dir);
    write_mesh(
        &root,
        "54382129",
        &MeshFixture {
            slope: vec![vec![None, None], vec![None, None]],
            direction: vec![vec![None, None], vec![None, None]],
            ..Default::default()
        },
    );

    let processor = MeshProcessor::new(root, temp_dir.path().join("out")).unwrap();
    let stats = processor.process().await.unwrap();
    let rows = read_tsv(&stats.output_path);

    for column in ["slp_mean", "slp_std", "slp_med", "slp_mod", "dir_mean"] {
        assert_eq!(field(&rows, 1, column), "None", "column {}", column);
    }
    assert_ne!(field(&rows, 1, "ele_mean"), "None");
}

#[tokio::test]
async fn test_optional_columns() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_bundle(&temp_dir);
    write_mesh(&root, "54382129", &MeshFixture::default());

    let config = StatsConfig::default().with_extent().with_landuse();
    let processor = MeshProcessor::new(root, temp_dir.path().join("out"))
        .unwrap()
        .with_config(config);
    let stats = processor.process().await.unwrap();
    let rows = read_tsv(&stats.output_path);

    assert_eq!(field(&rows, 1, "minx"), "139.0");
    assert_eq!(field(&rows, 1, "maxy"), "35.0125");
    assert_eq!(field(&rows, 1, "landuse_forest"), "20.0");
    assert_eq!(rows[0].last().map(String::as_str), Some("landuse_golf_course"));
}

#[tokio::test]
async fn test_gregorian_calendar() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_bundle(&temp_dir);
    write_mesh(&root, "54382129", &MeshFixture::default());

    let config = StatsConfig::default()
        .with_calendar(CalendarMode::Gregorian)
        .with_years(1978, 2016);
    let processor = MeshProcessor::new(root, temp_dir.path().join("out"))
        .unwrap()
        .with_config(config);
    let stats = processor.process().await.unwrap();
    let rows = read_tsv(&stats.output_path);

    // 10 leap Februaries out of 39 years: (29 * 10 + 28 * 29) / 39
    let february: f64 = field(&rows, 1, "prec_mean02").parse().unwrap();
    approx::assert_abs_diff_eq!(february, (290.0 + 812.0) / 39.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_quiet_run_hides_progress_and_still_exports() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_bundle(&temp_dir);
    write_mesh(&root, "54382130", &MeshFixture::default());

    let processor = MeshProcessor::new(root, temp_dir.path().join("out"))
        .unwrap()
        .with_config(StatsConfig::default().with_progress(false));
    assert!(processor.progress_bar(1).is_hidden());

    let stats = processor.process().await.unwrap();
    assert_eq!(stats.meshes_processed, 1);
    assert_eq!(read_tsv(&stats.output_path).len(), 2);
}
