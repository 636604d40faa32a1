// This file contains the code for the magqc report subcommand.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use chrono::Local;
use colored::Colorize;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs::remove_file;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assembly_stats::AssemblyStats;
use crate::layout::{find_sequence_files, resolve_layout, Layout, LayoutMode};
use crate::log::{section_header, explanation};
use crate::metrics::ReportMetrics;
use crate::misc::{check_if_dir_exists, check_if_file_exists, check_if_file_is_not_dir,
                  create_parent_dir, file_md5, format_duration, progress_bar, quit_with_error};
use crate::naming::GenomeName;
use crate::quality_report::QualityReport;
use crate::record::{GenomeRecord, DIGEST_ERROR, REPORT_HEADER};


pub fn report(in_dir: PathBuf, out_csv: Option<PathBuf>, layout_mode: LayoutMode,
              quality_report: Option<PathBuf>, threads: usize, metrics_yaml: Option<PathBuf>) {
    let start_time = Instant::now();
    let out_csv = out_csv.unwrap_or_else(default_out_csv);
    check_settings(&in_dir, &out_csv, &quality_report, &metrics_yaml, threads);
    starting_message();
    print_settings(&in_dir, &out_csv, layout_mode, &quality_report, threads, &metrics_yaml);
    let layout = choose_layout(&in_dir, layout_mode);
    let files = find_files(&in_dir, layout);
    let quality = load_quality_report(&quality_report);
    let records = build_records(&files, layout, &quality, threads);
    let metrics = ReportMetrics::from_records(&records);
    if let Some(metrics_yaml) = &metrics_yaml {
        save_metrics(metrics_yaml, &metrics);
    }
    save_report(&out_csv, &records, &metrics_yaml);
    finished_message(start_time, &out_csv, &metrics);
}


fn default_out_csv() -> PathBuf {
    PathBuf::from(format!("Genome_Statistics_{}.csv", Local::now().format("%Y%m%d")))
}


fn check_settings(in_dir: &Path, out_csv: &Path, quality_report: &Option<PathBuf>,
                  metrics_yaml: &Option<PathBuf>, threads: usize) {
    check_if_dir_exists(in_dir);
    if let Some(quality_report) = quality_report {
        check_if_file_exists(quality_report);
    }
    check_if_file_is_not_dir(out_csv);
    if let Some(metrics_yaml) = metrics_yaml {
        check_if_file_is_not_dir(metrics_yaml);
    }
    if threads < 1   { quit_with_error("--threads cannot be less than 1"); }
    if threads > 100 { quit_with_error("--threads cannot be greater than 100"); }
}


fn starting_message() {
    section_header("Starting magqc report");
    explanation("This command finds all genome FASTA files in the input directory, calculates \
                 their assembly statistics (size, sequence count, N50 and L50) and, if a quality \
                 report is given, classifies each genome using its completeness and \
                 contamination.");
}


fn print_settings(in_dir: &Path, out_csv: &Path, layout_mode: LayoutMode,
                  quality_report: &Option<PathBuf>, threads: usize,
                  metrics_yaml: &Option<PathBuf>) {
    eprintln!("Settings:");
    eprintln!("  --input_dir {}", in_dir.display());
    eprintln!("  --out_csv {}", out_csv.display());
    eprintln!("  --layout {}", format!("{:?}", layout_mode).to_lowercase());
    if let Some(quality_report) = quality_report {
        eprintln!("  --quality_report {}", quality_report.display());
    }
    eprintln!("  --threads {}", threads);
    if let Some(metrics_yaml) = metrics_yaml {
        eprintln!("  --metrics {}", metrics_yaml.display());
    }
    eprintln!();
}


fn choose_layout(in_dir: &Path, layout_mode: LayoutMode) -> Layout {
    let layout = resolve_layout(in_dir, layout_mode).unwrap_or_else(|e| {
        quit_with_error(&format!("unable to read directory {}\n{}", in_dir.display(), e));
    });
    if layout_mode == LayoutMode::Auto {
        eprintln!("Detected directory layout: {}", layout);
    } else {
        eprintln!("Directory layout: {}", layout);
    }
    layout
}


fn find_files(in_dir: &Path, layout: Layout) -> Vec<PathBuf> {
    section_header("Finding genome files");
    explanation("FASTA files (.fa, .fna or .fasta, optionally gzipped) are now gathered from the \
                 input directory (flat layout) or from its sample subdirectories (nested layout).");
    let files = find_sequence_files(in_dir, layout).unwrap_or_else(|e| {
        quit_with_error(&format!("unable to read directory {}\n{}", in_dir.display(), e));
    });
    if files.is_empty() {
        eprintln!("{}", format!("Warning: no FASTA files found in {}", in_dir.display()).yellow());
        eprintln!();
        return files;
    }
    eprintln!("Found {} FASTA file{}:", files.len(), if files.len() == 1 { "" } else { "s" });
    for path in files.iter().take(3) {
        eprintln!("  {}", GenomeName::from_path(path, layout).display_name);
    }
    if files.len() > 3 {
        eprintln!("  ...");
    }
    eprintln!();
    files
}


fn load_quality_report(quality_report: &Option<PathBuf>) -> QualityReport {
    let Some(filename) = quality_report else {
        return QualityReport::empty();
    };
    section_header("Loading quality report");
    explanation("Completeness and contamination values are now loaded from the quality report. \
                 Rows that can't be parsed are skipped.");
    let (report, summary) = QualityReport::load(filename).unwrap_or_else(|e| {
        quit_with_error(&format!("unable to load {}\n{}", filename.display(), e));
    });
    eprintln!("Genomes loaded: {}", summary.loaded);
    if summary.skipped > 0 {
        eprintln!("{}", format!("Rows skipped: {}", summary.skipped).yellow());
    }
    if summary.duplicates > 0 {
        eprintln!("{}", format!("Duplicate genome IDs (last row used): {}",
                                summary.duplicates).yellow());
    }
    eprintln!();
    report
}


fn build_records(files: &[PathBuf], layout: Layout, quality: &QualityReport,
                 threads: usize) -> Vec<GenomeRecord> {
    section_header("Calculating genome statistics");
    explanation("Each FASTA file is now read to get its MD5 checksum and assembly statistics, \
                 and its genome ID is matched against the quality report.");
    let pool = ThreadPoolBuilder::new().num_threads(threads).build().unwrap_or_else(|e| {
        quit_with_error(&format!("failed to start thread pool\n{}", e));
    });
    let pb = progress_bar(files.len());
    let results: Vec<_> = pool.install(|| {
        files.par_iter().map(|path| {  // parallel for loop with rayon
            let result = build_record(path, layout, quality);
            pb.inc(1);
            result
        }).collect()
    });
    pb.finish_and_clear();

    let mut records = Vec::with_capacity(results.len());
    for (record, error) in results {
        if let Some(error) = error {
            eprintln!("{}", format!("{}: unreadable ({})", record.display_name, error).red());
        }
        records.push(record);
    }
    eprintln!("Genomes processed: {}", records.len());
    if !quality.is_empty() {
        print_match_counts(&records);
    }
    eprintln!();
    records
}


fn print_match_counts(records: &[GenomeRecord]) {
    // Shows up to three unmatched genome IDs, to help spot naming differences between the FASTA
    // files and the quality report.
    let unmatched: Vec<_> = records.iter().filter(|r| r.quality.is_none())
                                   .map(|r| r.genome_id.as_str()).collect();
    let matched = records.len() - unmatched.len();
    eprintln!("{}", format!("Matched to quality report: {}", matched).green());
    if !unmatched.is_empty() {
        let examples = unmatched.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
        let more = if unmatched.len() > 3 { ", ..." } else { "" };
        eprintln!("{}", format!("Not in quality report: {} ({}{})",
                                unmatched.len(), examples, more).yellow());
    }
}


pub fn build_record(path: &Path, layout: Layout,
                    quality: &QualityReport) -> (GenomeRecord, Option<io::Error>) {
    // A file that can't be read still gets a row, with digest ERROR and zero statistics.
    let name = GenomeName::from_path(path, layout);
    let quality_record = quality.get(&name.genome_id).copied();
    match read_sequence_file(path) {
        Ok((digest, stats)) => (GenomeRecord::new(name, digest, stats, quality_record.as_ref()),
                                None),
        Err(e) => (GenomeRecord::new(name, DIGEST_ERROR.to_string(), AssemblyStats::default(),
                                     quality_record.as_ref()),
                   Some(e)),
    }
}


fn read_sequence_file(path: &Path) -> io::Result<(String, AssemblyStats)> {
    let digest = file_md5(path)?;
    let stats = AssemblyStats::from_file(path)?;
    Ok((digest, stats))
}


pub fn write_report(out_csv: &Path, records: &[GenomeRecord]) -> io::Result<()> {
    // Fields holding commas or quotes (e.g. from odd file names) are quoted.
    let mut writer = csv::Writer::from_path(out_csv)?;
    writer.write_record(REPORT_HEADER.split(','))?;
    for record in records {
        writer.write_record(record.csv_fields())?;
    }
    writer.flush()
}


fn save_report(out_csv: &Path, records: &[GenomeRecord], metrics_yaml: &Option<PathBuf>) {
    // Runs after the metrics are saved, so a failure here removes both files.
    create_parent_dir(out_csv);
    if let Err(e) = write_report(out_csv, records) {
        let _ = remove_file(out_csv);
        if let Some(metrics_yaml) = metrics_yaml {
            let _ = remove_file(metrics_yaml);
        }
        quit_with_error(&format!("failed to write {}\n{}", out_csv.display(), e));
    }
}


fn save_metrics(metrics_yaml: &Path, metrics: &ReportMetrics) {
    create_parent_dir(metrics_yaml);
    if let Err(e) = metrics.save_to_yaml(metrics_yaml) {
        let _ = remove_file(metrics_yaml);
        quit_with_error(&format!("failed to write {}\n{}", metrics_yaml.display(), e));
    }
}


fn finished_message(start_time: Instant, out_csv: &Path, metrics: &ReportMetrics) {
    section_header("Finished!");
    eprintln!("Genomes in report: {}", metrics.genome_count);
    if metrics.empty_files > 0 {
        eprintln!("Files with no sequences: {}", metrics.empty_files);
    }
    if metrics.unreadable_files > 0 {
        eprintln!("{}", format!("Unreadable files: {}", metrics.unreadable_files).red());
    }
    eprintln!("Genome report: {}", out_csv.display());
    eprintln!("Time to run: {}", format_duration(start_time.elapsed()));
    eprintln!();
}
