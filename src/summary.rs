// This file contains the code for the magqc summary subcommand.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use csv::ReaderBuilder;
use std::path::{Path, PathBuf};

use crate::classify::QualityClass;
use crate::log::{section_header, explanation};
use crate::metrics::ReportMetrics;
use crate::misc::{check_if_file_exists, check_if_file_is_not_dir, create_parent_dir, format_float,
                  percentage, quit_with_error};
use crate::record::{GenomeRecord, REPORT_HEADER};


pub fn summary(in_csvs: Vec<PathBuf>, metrics_yaml: Option<PathBuf>) {
    check_settings(&in_csvs, &metrics_yaml);
    starting_message();
    print_settings(&in_csvs, &metrics_yaml);
    let records = load_reports(&in_csvs);
    let metrics = ReportMetrics::from_records(&records);
    print_distribution(&metrics);
    if let Some(metrics_yaml) = &metrics_yaml {
        create_parent_dir(metrics_yaml);
        if let Err(e) = metrics.save_to_yaml(metrics_yaml) {
            quit_with_error(&format!("failed to write {}\n{}", metrics_yaml.display(), e));
        }
    }
    finished_message(&metrics_yaml);
}


fn check_settings(in_csvs: &[PathBuf], metrics_yaml: &Option<PathBuf>) {
    for in_csv in in_csvs {
        check_if_file_exists(in_csv);
    }
    if let Some(metrics_yaml) = metrics_yaml {
        check_if_file_is_not_dir(metrics_yaml);
    }
}


fn starting_message() {
    section_header("Starting magqc summary");
    explanation("This command reads one or more genome reports (made by magqc report) and \
                 summarises how the genomes are distributed across the quality classes.");
}


fn print_settings(in_csvs: &[PathBuf], metrics_yaml: &Option<PathBuf>) {
    eprintln!("Settings:");
    eprintln!("  --in_csv {}", in_csvs.iter().map(|p| p.display().to_string())
                                       .collect::<Vec<_>>().join(" "));
    if let Some(metrics_yaml) = metrics_yaml {
        eprintln!("  --metrics {}", metrics_yaml.display());
    }
    eprintln!();
}


fn load_reports(in_csvs: &[PathBuf]) -> Vec<GenomeRecord> {
    section_header("Loading genome reports");
    let mut records = Vec::new();
    for in_csv in in_csvs {
        let file_records = load_report(in_csv).unwrap_or_else(|e| quit_with_error(&e));
        eprintln!("{}: {} genomes", in_csv.display(), file_records.len());
        records.extend(file_records);
    }
    eprintln!();
    records
}


pub fn load_report(in_csv: &Path) -> Result<Vec<GenomeRecord>, String> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(in_csv)
        .map_err(|e| format!("unable to open {}\n{}", in_csv.display(), e))?;
    let header_ok = reader.headers()
        .map_err(|e| format!("failed to read {}\n{}", in_csv.display(), e))?
        .iter().eq(REPORT_HEADER.split(','));
    if !header_ok {
        return Err(format!("{} does not start with a genome report header", in_csv.display()));
    }
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| format!("failed to read {}\n{}", in_csv.display(), e))?;
        let line = row.position().map_or(0, |p| p.line());
        let fields: Vec<&str> = row.iter().collect();
        let record = GenomeRecord::from_csv_fields(&fields)
            .map_err(|e| format!("{} line {}: {}", in_csv.display(), line, e))?;
        records.push(record);
    }
    Ok(records)
}


fn print_distribution(metrics: &ReportMetrics) {
    section_header("Quality class distribution");
    explanation("Percentages are of the genomes that have a quality classification. Means are \
                 over medium-quality and better genomes.");
    eprintln!("Genomes: {}", metrics.genome_count);
    eprintln!("Total bases: {}", metrics.total_bases);
    eprintln!("With quality classification: {}", metrics.quality_matched);
    eprintln!("Without quality classification: {}", metrics.quality_unmatched);
    eprintln!();
    for line in distribution_lines(metrics) {
        println!("{}", line);
    }
    eprintln!();
    if let (Some(completeness), Some(contamination)) =
            (metrics.medium_or_better_mean_completeness,
             metrics.medium_or_better_mean_contamination) {
        eprintln!("Mean completeness: {}%", format_float((completeness * 100.0).round() / 100.0));
        eprintln!("Mean contamination: {}%", format_float((contamination * 100.0).round() / 100.0));
        eprintln!();
    }
}


fn distribution_lines(metrics: &ReportMetrics) -> Vec<String> {
    let mut lines = vec!["quality_class\tcount\tpercent".to_string()];
    for quality_class in QualityClass::ALL {
        let count = metrics.class_count(quality_class);
        lines.push(format!("{}\t{}\t{}", quality_class.short_label(), count,
                           percentage(count, metrics.quality_matched)));
    }
    lines
}


fn finished_message(metrics_yaml: &Option<PathBuf>) {
    section_header("Finished!");
    if let Some(metrics_yaml) = metrics_yaml {
        eprintln!("Metrics: {}", metrics_yaml.display());
        eprintln!();
    }
}
