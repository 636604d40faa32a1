// This file contains functions for printing magqc's progress output to stderr.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use chrono::prelude::*;
use colored::Colorize;


pub fn section_header(text: &str) {
    let date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let header = format!("{} {}", text.bold().bright_yellow().underline(),
                         format!("({})", date).dimmed());
    eprintln!();
    eprintln!("{}", header);
}


pub fn explanation(text: &str) {
    // Explanations are wrapped to the terminal width (or 80 columns if the width can't be
    // determined) and printed dimmed so they stand apart from the results.
    let term_width = term_size::dimensions_stderr().map(|(w, _)| w).unwrap_or(80);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for line in textwrap::wrap(&text, wrap_width(term_width)) {
        eprintln!("{}", line.dimmed());
    }
    eprintln!();
}


fn wrap_width(term_width: usize) -> usize {
    term_width.clamp(40, 100)
}
