// This file contains the code for turning a genome file's path into the genome ID used to match
// it with the quality report, and into the name shown in the output report.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use std::path::Path;

use crate::layout::Layout;


const COMPRESSION_SUFFIXES: [&str; 1] = [".gz"];
const SEQUENCE_SUFFIXES: [&str; 3] = [".fasta", ".fna", ".fa"];


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeName {
    pub genome_id: String,
    pub display_name: String,
}

impl GenomeName {
    pub fn from_path(path: &Path, layout: Layout) -> Self {
        let base_name = file_name_string(path);
        let stem = strip_extensions(&base_name);
        match layout {
            Layout::Flat => GenomeName {
                genome_id: stem.to_string(),
                display_name: base_name.clone(),
            },
            Layout::Nested => {
                let sample = path.parent().map(file_name_string).unwrap_or_default();
                if sample.is_empty() {
                    GenomeName { genome_id: stem.to_string(), display_name: base_name.clone() }
                } else {
                    GenomeName { genome_id: format!("{}_{}", sample, stem),
                                 display_name: format!("{}_{}", sample, base_name) }
                }
            }
        }
    }
}


fn file_name_string(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}


pub fn strip_extensions(filename: &str) -> &str {
    // Removes recognised compression and sequence suffixes from the end of the name, one at a
    // time, until none match. A suffix is never removed if that would leave nothing behind.
    let mut stem = filename;
    while let Some(shorter) = strip_one_suffix(stem, &COMPRESSION_SUFFIXES)
                                  .or_else(|| strip_one_suffix(stem, &SEQUENCE_SUFFIXES)) {
        stem = shorter;
    }
    stem
}


pub fn is_sequence_filename(filename: &str) -> bool {
    // A sequence file ends in a sequence suffix, optionally followed by compression suffixes,
    // and has a non-empty name in front of that.
    let mut stem = filename;
    while let Some(shorter) = strip_one_suffix(stem, &COMPRESSION_SUFFIXES) {
        stem = shorter;
    }
    strip_one_suffix(stem, &SEQUENCE_SUFFIXES).is_some()
}


fn strip_one_suffix<'a>(name: &'a str, suffixes: &[&str]) -> Option<&'a str> {
    // Matching is ASCII case-insensitive. Suffixes are pure ASCII, so the cut point is always a
    // char boundary.
    let bytes = name.as_bytes();
    for suffix in suffixes {
        let suffix = suffix.as_bytes();
        if bytes.len() > suffix.len() &&
                bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix) {
            return Some(&name[..name.len() - suffix.len()]);
        }
    }
    None
}
