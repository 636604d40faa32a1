// This file contains some high-level tests for magqc and functions common to other tests.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use flate2::Compression;
use flate2::write::GzEncoder;
use maplit::hashmap;
use std::collections::HashMap;
use std::fs::{File, create_dir, read_to_string};
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use crate::layout::LayoutMode;
use crate::metrics::ReportMetrics;
use crate::misc::file_md5;
use crate::record::REPORT_HEADER;
use crate::report::report;
use crate::summary::load_report;


pub fn assert_almost_eq(a: f64, b: f64, epsilon: f64) {
    assert!((a - b).abs() < epsilon,
            "Numbers are not within {:?} of each other: {} vs {}", epsilon, a, b);
}


pub fn make_test_file(file_path: &Path, contents: &str) {
    let mut file = File::create(file_path).unwrap();
    write!(file, "{}", contents).unwrap();
}


pub fn make_gzipped_test_file(file_path: &Path, contents: &str) {
    let mut file = File::create(file_path).unwrap();
    let mut e = GzEncoder::new(Vec::new(), Compression::default());
    e.write_all(contents.as_bytes()).unwrap();
    let _ = file.write_all(&e.finish().unwrap());
}


fn fasta_with_lengths(lengths: &[usize]) -> String {
    let mut fasta = String::new();
    for (i, length) in lengths.iter().enumerate() {
        fasta.push_str(&format!(">contig_{} length={}\n", i + 1, length));
        let seq = "ACGT".repeat(length / 4 + 1)[..*length].to_string();
        for chunk in seq.as_bytes().chunks(80) {
            fasta.push_str(std::str::from_utf8(chunk).unwrap());
            fasta.push('\n');
        }
    }
    fasta
}


fn checkm_report(rows: &[(&str, &str, &str)]) -> String {
    let mut text = "Bin Id\tMarker lineage\t# genomes\t# markers\tCompleteness\tContamination\t\
                    Strain heterogeneity\n".to_string();
    for (bin_id, completeness, contamination) in rows {
        text.push_str(&format!("{}\tk__Bacteria (UID203)\t5449\t104\t{}\t{}\t0.00\n",
                               bin_id, completeness, contamination));
    }
    text
}


fn report_rows(out_csv: &Path) -> HashMap<String, String> {
    // Maps each row's file name to the row with the file name and digest removed.
    let text = read_to_string(out_csv).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(REPORT_HEADER));
    lines.map(|line| {
        let mut parts = line.splitn(3, ',');
        let name = parts.next().unwrap().to_string();
        let _digest = parts.next().unwrap();
        (name, parts.next().unwrap().to_string())
    }).collect()
}


#[test]
fn test_flat_without_quality() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let g1 = in_dir.path().join("g1.fa");
    make_test_file(&g1, &fasta_with_lengths(&[100, 300]));
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto, None, 2, None);

    let text = read_to_string(&out_csv).unwrap();
    let expected = format!("{}\ng1.fa,{},400,2,300,100,300,1,NA,NA,NA,NA\n",
                           REPORT_HEADER, file_md5(&g1).unwrap());
    assert_eq!(text, expected);
}


#[test]
fn test_flat_with_quality() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    make_test_file(&in_dir.path().join("bin.1.fa"), &fasta_with_lengths(&[1000, 500, 250]));
    make_gzipped_test_file(&in_dir.path().join("bin.2.fa.gz"), &fasta_with_lengths(&[10, 20, 30]));
    make_test_file(&in_dir.path().join("bin.3.fna"), &fasta_with_lengths(&[5]));
    make_test_file(&in_dir.path().join("bin.4.fasta"), "");
    make_test_file(&in_dir.path().join("readme.txt"), "not a genome");
    let quality = out_dir.path().join("checkm.tsv");
    make_test_file(&quality, &checkm_report(&[("bin.1", "90.00", "5.00"),
                                              ("bin.2", "89.9", "5"),
                                              ("bin.4", "10", "20"),
                                              ("other", "99", "0")]));
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Flat,
           Some(quality), 4, None);

    let rows = report_rows(&out_csv);
    let expected = hashmap!{
        "bin.1.fa".to_string()    => "1750,3,1000,250,1000,1,90,5,65,near-complete".to_string(),
        "bin.2.fa.gz".to_string() => "60,3,30,10,30,1,89.9,5,64.9,high-quality".to_string(),
        "bin.3.fna".to_string()   => "5,1,5,5,5,1,NA,NA,NA,NA".to_string(),
        "bin.4.fasta".to_string() => "0,0,0,0,0,0,10,20,-90,low-quality".to_string(),
    };
    assert_eq!(rows, expected);
}


#[test]
fn test_nested_with_quality() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let sample_1 = in_dir.path().join("Sample1");
    let sample_2 = in_dir.path().join("Sample2");
    create_dir(&sample_1).unwrap();
    create_dir(&sample_2).unwrap();
    make_gzipped_test_file(&sample_1.join("bin.1.fa.gz"), &fasta_with_lengths(&[400, 300, 200, 100]));
    make_test_file(&sample_2.join("bin.1.fa"), &fasta_with_lengths(&[50, 50]));
    make_test_file(&in_dir.path().join("stray.fa"), &fasta_with_lengths(&[50]));
    let quality = out_dir.path().join("checkm.tsv");
    make_test_file(&quality, &checkm_report(&[("Sample1_bin.1", "50", "10"),
                                              ("bin.1", "99", "0")]));
    let out_csv = out_dir.path().join("nested").join("report.csv");
    let metrics_yaml = out_dir.path().join("metrics.yaml");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto,
           Some(quality), 1, Some(metrics_yaml.clone()));

    let text = read_to_string(&out_csv).unwrap();
    let names: Vec<_> = text.lines().skip(1)
        .map(|line| line.split(',').next().unwrap().to_string()).collect();
    assert_eq!(names, vec!["Sample1_bin.1.fa.gz", "Sample2_bin.1.fa"]);

    let rows = report_rows(&out_csv);
    assert_eq!(rows["Sample1_bin.1.fa.gz"], "1000,4,400,100,300,2,50,10,0,medium-quality");
    assert_eq!(rows["Sample2_bin.1.fa"], "100,2,50,50,50,1,NA,NA,NA,NA");

    let metrics: ReportMetrics = serde_yaml::from_str(&read_to_string(&metrics_yaml).unwrap())
        .unwrap();
    assert_eq!(metrics.genome_count, 2);
    assert_eq!(metrics.quality_matched, 1);
    assert_eq!(metrics.medium_quality, 1);
}


#[test]
fn test_digest_is_of_raw_bytes() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let fasta = fasta_with_lengths(&[123, 45]);
    let plain = in_dir.path().join("a.fa");
    let gzipped = in_dir.path().join("b.fa.gz");
    make_test_file(&plain, &fasta);
    make_gzipped_test_file(&gzipped, &fasta);
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Flat, None, 2, None);

    let text = read_to_string(&out_csv).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[1], format!("a.fa,{},168,2,123,45,123,1,NA,NA,NA,NA",
                                 file_md5(&plain).unwrap()));
    assert_eq!(lines[2], format!("b.fa.gz,{},168,2,123,45,123,1,NA,NA,NA,NA",
                                 file_md5(&gzipped).unwrap()));
    assert_ne!(file_md5(&plain).unwrap(), file_md5(&gzipped).unwrap());
}


#[test]
fn test_empty_input_dir() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto, None, 1, None);
    assert_eq!(read_to_string(&out_csv).unwrap(), format!("{}\n", REPORT_HEADER));
}


#[test]
fn test_missing_input_dir() {
    let out_dir = tempdir().unwrap();
    let missing: PathBuf = out_dir.path().join("no_such_dir");
    let out_csv = out_dir.path().join("report.csv");
    assert!(panic::catch_unwind(|| {
        report(missing.clone(), Some(out_csv.clone()), LayoutMode::Auto, None, 1, None);
    }).is_err());
    assert!(!out_csv.exists());
}


#[test]
fn test_missing_quality_report() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    make_test_file(&in_dir.path().join("g1.fa"), &fasta_with_lengths(&[100]));
    let out_csv = out_dir.path().join("report.csv");
    let quality = out_dir.path().join("no_such_report.tsv");
    assert!(panic::catch_unwind(|| {
        report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto,
               Some(quality.clone()), 1, None);
    }).is_err());
    assert!(!out_csv.exists());
}


#[test]
fn test_bad_thread_count() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let out_csv = out_dir.path().join("report.csv");
    assert!(panic::catch_unwind(|| {
        report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto, None, 0,
               None);
    }).is_err());
    assert!(!out_csv.exists());
}


#[test]
fn test_unreadable_gzip_gets_error_row() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    // Gzip magic number followed by garbage.
    let mut file = File::create(in_dir.path().join("broken.fa.gz")).unwrap();
    file.write_all(&[31, 139, 0, 1, 2, 3, 4, 5]).unwrap();
    drop(file);
    make_test_file(&in_dir.path().join("good.fa"), &fasta_with_lengths(&[10]));
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Flat, None, 2, None);

    let text = read_to_string(&out_csv).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[1], "broken.fa.gz,ERROR,0,0,0,0,0,0,NA,NA,NA,NA");
    assert!(lines[2].starts_with("good.fa,"));
}


#[test]
fn test_comma_in_file_name_round_trip() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let g1 = in_dir.path().join("bin,1.fa");
    make_test_file(&g1, &fasta_with_lengths(&[100]));
    let quality = out_dir.path().join("checkm.tsv");
    make_test_file(&quality, &checkm_report(&[("bin,1", "95", "1")]));
    let out_csv = out_dir.path().join("report.csv");
    report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Flat,
           Some(quality), 1, None);

    let text = read_to_string(&out_csv).unwrap();
    assert_eq!(text, format!("{}\n\"bin,1.fa\",{},100,1,100,100,100,1,95,1,90,near-complete\n",
                             REPORT_HEADER, file_md5(&g1).unwrap()));
    let records = load_report(&out_csv).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].display_name, "bin,1.fa");
    assert_eq!(records[0].genome_id, "bin,1");
    assert!(records[0].quality.is_some());
}


#[test]
fn test_unwritable_metrics_leaves_no_report() {
    let in_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    make_test_file(&in_dir.path().join("g1.fa"), &fasta_with_lengths(&[100]));
    let out_csv = out_dir.path().join("report.csv");
    // The metrics file's parent directory is a regular file, so it can't be created.
    let blocker = out_dir.path().join("blocker");
    make_test_file(&blocker, "");
    let metrics_yaml = blocker.join("metrics.yaml");
    assert!(panic::catch_unwind(|| {
        report(in_dir.path().to_path_buf(), Some(out_csv.clone()), LayoutMode::Auto, None, 1,
               Some(metrics_yaml.clone()));
    }).is_err());
    assert!(!out_csv.exists());
    assert!(!metrics_yaml.exists());
}
