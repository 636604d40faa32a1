// This file contains the code for loading a tab-separated genome quality report (e.g. CheckM
// output) into a table of completeness and contamination values keyed by genome ID.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use fxhash::FxHashMap;
use regex::Regex;
use std::io;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use crate::decimal::Decimal;
use crate::misc::open_text_reader;


const DEFAULT_COMPLETENESS_COLUMN: usize = 4;
const DEFAULT_CONTAMINATION_COLUMN: usize = 5;
const ID_HEADER_TOKENS: [&str; 5] = ["bin id", "bin_id", "name", "genome", "user_genome"];

// A number (with optional exponent), possibly wrapped in annotation that has no digits of its own.
static ADORNED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9+\-.]*([+\-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+\-]?[0-9]+)?)[^0-9]*$")
        .unwrap()
});


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityRecord {
    pub completeness: Decimal,
    pub contamination: Decimal,
}


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub duplicates: usize,
}


#[derive(Debug, Default)]
pub struct QualityReport {
    records: FxHashMap<String, QualityRecord>,
}

impl QualityReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(filename: &Path) -> io::Result<(Self, LoadSummary)> {
        Self::from_reader(open_text_reader(filename)?)
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<(Self, LoadSummary)> {
        // Rows that can't be parsed are counted and skipped, never fatal. Header rows (which can
        // appear more than once in concatenated reports) set the column positions for the rows
        // that follow.
        let mut records = FxHashMap::default();
        let mut summary = LoadSummary::default();
        let mut columns = (DEFAULT_COMPLETENESS_COLUMN, DEFAULT_CONTAMINATION_COLUMN);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if is_blank_or_separator(line) {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if is_header_row(&fields) {
                if let Some(header_columns) = header_columns(&fields) {
                    columns = header_columns;
                }
                continue;
            }
            match parse_row(&fields, columns) {
                Some((genome_id, record)) => {
                    if records.insert(genome_id, record).is_some() {
                        summary.duplicates += 1;
                    }
                }
                None => summary.skipped += 1,
            }
        }
        summary.loaded = records.len();
        Ok((QualityReport { records }, summary))
    }

    pub fn get(&self, genome_id: &str) -> Option<&QualityRecord> {
        self.records.get(genome_id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


fn is_blank_or_separator(line: &str) -> bool {
    line.chars().all(|c| c.is_whitespace() || c == '-')
}


fn is_header_row(fields: &[&str]) -> bool {
    let first = fields[0].trim().to_ascii_lowercase();
    ID_HEADER_TOKENS.contains(&first.as_str()) ||
        fields.iter().any(|f| is_numeric_header_token(f))
}


fn is_numeric_header_token(field: &str) -> bool {
    let field = field.trim();
    field.eq_ignore_ascii_case("completeness") || field.eq_ignore_ascii_case("contamination")
}


fn header_columns(fields: &[&str]) -> Option<(usize, usize)> {
    let find = |name: &str| fields.iter().position(|f| f.trim().eq_ignore_ascii_case(name));
    Some((find("completeness")?, find("contamination")?))
}


fn parse_row(fields: &[&str], columns: (usize, usize)) -> Option<(String, QualityRecord)> {
    let (completeness_col, contamination_col) = columns;
    let genome_id = fields[0].trim();
    if genome_id.is_empty() {
        return None;
    }
    let completeness = parse_adorned_number(fields.get(completeness_col)?)?;
    let contamination = parse_adorned_number(fields.get(contamination_col)?)?;
    Some((genome_id.to_string(), QualityRecord { completeness, contamination }))
}


fn parse_adorned_number(field: &str) -> Option<Decimal> {
    // e.g. "95.45%" -> 95.45, "9.5e1" -> 95
    let captures = ADORNED_NUMBER.captures(field)?;
    captures[1].parse().ok()
}
