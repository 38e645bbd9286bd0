#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Write a plain CSV file (one row per entry, `\n` terminated), creating parents.
pub fn write_csv(path: &Path, rows: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for r in rows {
        writeln!(&mut f, "{}", r).unwrap();
    }
}

/// Write a zstd-compressed CSV file with the provided rows.
pub fn write_zst_csv(path: &Path, rows: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for r in rows {
        writeln!(&mut enc, "{}", r).unwrap();
    }
    enc.finish().unwrap();
}

/// Two-file corpus:
/// - fileA.csv: Springfield,IL,120000 / Chicago,IL,2700000
/// - fileB.csv: Austin,TX,950000
pub fn make_two_files() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir.path().join("fileA.csv"), &["Springfield,IL,120000", "Chicago,IL,2700000"]);
    write_csv(&dir.path().join("fileB.csv"), &["Austin,TX,950000"]);
    dir
}

/// A larger nested corpus with a few malformed rows mixed in:
/// - CA: 4 qualifying at 100k (LA, SD, SJ, SF), 1 small town
/// - TX: 3 qualifying (Houston, Dallas, Austin), 1 bad population
/// - NY: 3 qualifying (NYC, Buffalo, Rochester); ties TX on count, loses on max
/// - WA: 1 qualifying (Seattle), 1 short row
/// - VT: nothing over 100k
pub fn make_corpus_nested() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_csv(&root.join("west/ca.csv"), &[
        "Los Angeles,CA,3898747",
        "San Diego,CA,1386932",
        "Tinyville,CA,812",
        "San Jose,CA,1013240",
    ]);
    write_csv(&root.join("west/more/ca_north.csv"), &["San Francisco,CA,873965"]);
    write_csv(&root.join("west/wa.csv"), &["Seattle,WA,737015", "Spokane,WA"]);
    write_csv(&root.join("south/tx.csv"), &[
        "Houston,TX,2304580",
        "Dallas,TX,1304379",
        "Plano,TX,lots",
        "Austin,TX,961855",
    ]);
    write_csv(&root.join("east/ny.csv"), &[
        "New York,NY,8804190",
        "Buffalo,NY,278349",
        "Rochester,NY,211328",
    ]);
    write_csv(&root.join("east/vt.csv"), &["Burlington,VT,44743"]);
    dir
}
