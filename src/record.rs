// This file contains the GenomeRecord type: one row of the genome report, joining a FASTA file's
// name, digest and assembly statistics with its quality classification (when there is one).

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use crate::assembly_stats::AssemblyStats;
use crate::classify::{classify, QualityClass};
use crate::decimal::Decimal;
use crate::naming::{strip_extensions, GenomeName};
use crate::quality_report::QualityRecord;


pub const REPORT_HEADER: &str = "fasta_file_name,fasta_file_md5,total_size(bp),sequences,\
                                 largest_seq(bp),smallest_seq(bp),N50(bp),L50,completeness(%),\
                                 contamination(%),QS,quality_class";
pub const NOT_AVAILABLE: &str = "NA";
pub const DIGEST_ERROR: &str = "ERROR";
const FIELD_COUNT: usize = 12;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityFields {
    pub completeness: Decimal,
    pub contamination: Decimal,
    pub qs: Decimal,
    pub quality_class: QualityClass,
}

impl QualityFields {
    pub fn from_record(record: &QualityRecord) -> Self {
        let classification = classify(record.completeness, record.contamination);
        QualityFields {
            completeness: record.completeness,
            contamination: record.contamination,
            qs: classification.qs,
            quality_class: classification.quality_class,
        }
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeRecord {
    pub display_name: String,
    pub content_digest: String,
    pub genome_id: String,
    pub stats: AssemblyStats,
    pub quality: Option<QualityFields>,
}

impl GenomeRecord {
    pub fn new(name: GenomeName, content_digest: String, stats: AssemblyStats,
               quality: Option<&QualityRecord>) -> Self {
        GenomeRecord {
            display_name: name.display_name,
            content_digest,
            genome_id: name.genome_id,
            stats,
            quality: quality.map(QualityFields::from_record),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.content_digest == DIGEST_ERROR
    }

    pub fn csv_fields(&self) -> Vec<String> {
        let mut fields = vec![self.display_name.clone(), self.content_digest.clone()];
        fields.extend(self.stats.csv_fields());
        match &self.quality {
            Some(q) => {
                fields.push(q.completeness.to_string());
                fields.push(q.contamination.to_string());
                fields.push(q.qs.to_string());
                fields.push(q.quality_class.to_string());
            }
            None => fields.resize(FIELD_COUNT, NOT_AVAILABLE.to_string()),
        }
        fields
    }

    pub fn from_csv_fields(fields: &[&str]) -> Result<Self, String> {
        // Reverses csv_fields. The genome ID isn't a column, but stripping the extensions from
        // the display name gives it back for both layouts.
        if fields.len() != FIELD_COUNT {
            return Err(format!("expected {} fields but found {}", FIELD_COUNT, fields.len()));
        }
        let int = |i: usize| fields[i].parse::<u64>()
            .map_err(|_| format!("invalid integer in column {}: {}", i + 1, fields[i]));
        let stats = AssemblyStats {
            total_size: int(2)?,
            sequence_count: int(3)?,
            largest_length: int(4)?,
            smallest_length: int(5)?,
            n50: int(6)?,
            l50: int(7)?,
        };
        let quality = if fields[8..].iter().all(|f| *f == NOT_AVAILABLE) {
            None
        } else {
            let dec = |i: usize| fields[i].parse::<Decimal>().map_err(|e| e.to_string());
            let quality_class = QualityClass::from_name(fields[11])
                .ok_or_else(|| format!("unknown quality class: {}", fields[11]))?;
            Some(QualityFields { completeness: dec(8)?, contamination: dec(9)?, qs: dec(10)?,
                                 quality_class })
        };
        Ok(GenomeRecord {
            display_name: fields[0].to_string(),
            content_digest: fields[1].to_string(),
            genome_id: strip_extensions(fields[0]).to_string(),
            stats,
            quality,
        })
    }
}


#[cfg(test)]
impl GenomeRecord {
    // Single-row CSV helpers, quoting the same way as the report writer.
    pub fn to_csv_line(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.csv_fields()).unwrap();
        writer.flush().unwrap();
        let line = String::from_utf8(writer.get_ref().clone()).unwrap();
        line.trim_end_matches(['\n', '\r']).to_string()
    }

    pub fn from_csv_line(line: &str) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true)
            .from_reader(line.as_bytes());
        let row = reader.records().next().ok_or("empty line")?.map_err(|e| e.to_string())?;
        Self::from_csv_fields(&row.iter().collect::<Vec<_>>())
    }
}
