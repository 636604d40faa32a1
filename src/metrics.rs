// This file contains the code for magqc's run metrics, which can be saved to a YAML file.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use crate::classify::QualityClass;
use crate::record::GenomeRecord;


#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ReportMetrics {
    pub genome_count: usize,
    pub total_bases: u64,
    pub empty_files: usize,
    pub unreadable_files: usize,
    pub quality_matched: usize,
    pub quality_unmatched: usize,
    pub near_complete: usize,
    pub high_quality: usize,
    pub medium_quality: usize,
    pub low_quality: usize,
    pub medium_or_better_mean_completeness: Option<f64>,
    pub medium_or_better_mean_contamination: Option<f64>,
}

impl ReportMetrics {
    pub fn new() -> Self { Self::default() }

    pub fn from_records(records: &[GenomeRecord]) -> Self {
        let mut metrics = ReportMetrics::new();
        let mut completeness_sum = 0.0;
        let mut contamination_sum = 0.0;
        let mut medium_or_better = 0;
        for record in records {
            metrics.genome_count += 1;
            metrics.total_bases += record.stats.total_size;
            if record.is_unreadable() {
                metrics.unreadable_files += 1;
            } else if record.stats.sequence_count == 0 {
                metrics.empty_files += 1;
            }
            let Some(quality) = &record.quality else {
                metrics.quality_unmatched += 1;
                continue;
            };
            metrics.quality_matched += 1;
            *metrics.class_count_mut(quality.quality_class) += 1;
            if quality.quality_class.is_medium_or_better() {
                medium_or_better += 1;
                completeness_sum += quality.completeness.to_f64();
                contamination_sum += quality.contamination.to_f64();
            }
        }
        if medium_or_better > 0 {
            metrics.medium_or_better_mean_completeness =
                Some(completeness_sum / medium_or_better as f64);
            metrics.medium_or_better_mean_contamination =
                Some(contamination_sum / medium_or_better as f64);
        }
        metrics
    }

    pub fn class_count(&self, quality_class: QualityClass) -> usize {
        match quality_class {
            QualityClass::NearComplete  => self.near_complete,
            QualityClass::HighQuality   => self.high_quality,
            QualityClass::MediumQuality => self.medium_quality,
            QualityClass::LowQuality    => self.low_quality,
        }
    }

    fn class_count_mut(&mut self, quality_class: QualityClass) -> &mut usize {
        match quality_class {
            QualityClass::NearComplete  => &mut self.near_complete,
            QualityClass::HighQuality   => &mut self.high_quality,
            QualityClass::MediumQuality => &mut self.medium_quality,
            QualityClass::LowQuality    => &mut self.low_quality,
        }
    }

    pub fn save_to_yaml(&self, filename: &Path) -> io::Result<()> {
        let yaml_string = serde_yaml::to_string(self).map_err(io::Error::other)?;
        let mut file = File::create(filename)?;
        file.write_all(yaml_string.as_bytes())?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::read_to_string;
    use tempfile::tempdir;
    use crate::tests::assert_almost_eq;

    fn record(line: &str) -> GenomeRecord {
        GenomeRecord::from_csv_line(line).unwrap()
    }

    fn example_records() -> Vec<GenomeRecord> {
        vec![record("a.fa,x,400,2,300,100,300,1,95,1,90,near-complete"),
             record("b.fa,x,100,1,100,100,100,1,75,5,50,high-quality"),
             record("c.fa,x,50,1,50,50,50,1,40,2,30,low-quality"),
             record("d.fa,x,0,0,0,0,0,0,NA,NA,NA,NA"),
             record("e.fa,ERROR,0,0,0,0,0,0,NA,NA,NA,NA")]
    }

    #[test]
    fn test_from_records() {
        let metrics = ReportMetrics::from_records(&example_records());
        assert_eq!(metrics.genome_count, 5);
        assert_eq!(metrics.total_bases, 550);
        assert_eq!(metrics.empty_files, 1);
        assert_eq!(metrics.unreadable_files, 1);
        assert_eq!(metrics.quality_matched, 3);
        assert_eq!(metrics.quality_unmatched, 2);
        assert_eq!(metrics.class_count(QualityClass::NearComplete), 1);
        assert_eq!(metrics.class_count(QualityClass::HighQuality), 1);
        assert_eq!(metrics.class_count(QualityClass::MediumQuality), 0);
        assert_eq!(metrics.class_count(QualityClass::LowQuality), 1);
        assert_almost_eq(metrics.medium_or_better_mean_completeness.unwrap(), 85.0, 1e-8);
        assert_almost_eq(metrics.medium_or_better_mean_contamination.unwrap(), 3.0, 1e-8);
    }

    #[test]
    fn test_from_no_records() {
        let metrics = ReportMetrics::from_records(&[]);
        assert_eq!(metrics, ReportMetrics::new());
        assert!(metrics.medium_or_better_mean_completeness.is_none());
    }

    #[test]
    fn test_save_to_yaml() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("metrics.yaml");
        let metrics = ReportMetrics::from_records(&example_records());
        metrics.save_to_yaml(&yaml).unwrap();
        let text = read_to_string(&yaml).unwrap();
        assert!(text.contains("genome_count: 5"));
        assert!(text.contains("near_complete: 1"));
        let loaded: ReportMetrics = serde_yaml::from_str(&text).unwrap();
        assert_eq!(loaded, metrics);
    }
}
