// This file contains the code for calculating assembly statistics (size, sequence count, N50,
// L50) from a FASTA file in a single streaming pass.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use std::io;
use std::io::BufRead;
use std::path::Path;

use crate::misc::open_text_reader;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub total_size: u64,
    pub sequence_count: u64,
    pub largest_length: u64,
    pub smallest_length: u64,
    pub n50: u64,
    pub l50: u64,
}

impl AssemblyStats {
    pub fn from_file(filename: &Path) -> io::Result<Self> {
        Self::from_reader(open_text_reader(filename)?)
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        // Sequence lines are only counted, never stored: memory use is one length per record.
        let mut lengths = Vec::new();
        let mut current_length = 0u64;
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let text = line.trim_ascii();
            if text.first() == Some(&b'>') {
                if current_length > 0 {
                    lengths.push(current_length);
                }
                current_length = 0;
            } else {
                current_length += text.len() as u64;
            }
        }
        if current_length > 0 {
            lengths.push(current_length);
        }
        Ok(Self::from_lengths(lengths))
    }

    pub fn from_lengths(mut lengths: Vec<u64>) -> Self {
        if lengths.is_empty() {
            return Self::default();
        }
        let total_size: u64 = lengths.iter().sum();
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        let (n50, l50) = n50_l50(&lengths, total_size);
        AssemblyStats {
            total_size,
            sequence_count: lengths.len() as u64,
            largest_length: lengths[0],
            smallest_length: lengths[lengths.len() - 1],
            n50,
            l50,
        }
    }

    pub fn csv_fields(&self) -> [String; 6] {
        [self.total_size.to_string(), self.sequence_count.to_string(),
         self.largest_length.to_string(), self.smallest_length.to_string(),
         self.n50.to_string(), self.l50.to_string()]
    }
}


fn n50_l50(sorted_lengths: &[u64], total_size: u64) -> (u64, u64) {
    // Walks the lengths (sorted longest first) until the running total reaches half the total
    // size. Comparing 2 * running_total against total_size keeps odd totals exact.
    let mut running_total = 0u64;
    for (i, &length) in sorted_lengths.iter().enumerate() {
        running_total += length;
        if 2 * running_total >= total_size {
            return (length, i as u64 + 1);
        }
    }
    (0, 0)
}
