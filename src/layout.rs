// This file contains the code for deciding how genome files are organised in the input directory
// (flat or nested) and for finding those files.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use clap::ValueEnum;
use std::fmt;
use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};

use crate::naming::is_sequence_filename;


#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Auto,    // nested if the input directory has any subdirectories, flat otherwise
    Flat,    // genome files sit directly in the input directory
    Nested,  // genome files sit in per-sample subdirectories of the input directory
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Flat,
    Nested,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Flat   => write!(f, "flat"),
            Layout::Nested => write!(f, "nested"),
        }
    }
}


pub fn resolve_layout(in_dir: &Path, mode: LayoutMode) -> io::Result<Layout> {
    // An explicit layout is used as given. Only auto mode looks at the directory.
    match mode {
        LayoutMode::Flat   => Ok(Layout::Flat),
        LayoutMode::Nested => Ok(Layout::Nested),
        LayoutMode::Auto   => detect_layout(in_dir),
    }
}


pub fn detect_layout(in_dir: &Path) -> io::Result<Layout> {
    for entry in read_dir(in_dir)? {
        let path = entry?.path();
        if path.is_dir() && !is_hidden(&path) {
            return Ok(Layout::Nested);
        }
    }
    Ok(Layout::Flat)
}


pub fn find_sequence_files(in_dir: &Path, layout: Layout) -> io::Result<Vec<PathBuf>> {
    // Flat: sequence files directly in the input directory. Nested: sequence files directly in
    // each immediate subdirectory. Results are sorted so downstream output is deterministic.
    let mut files = match layout {
        Layout::Flat => sequence_files_in_dir(in_dir)?,
        Layout::Nested => {
            let mut files = Vec::new();
            for sample_dir in subdirectories(in_dir)? {
                files.extend(sequence_files_in_dir(&sample_dir)?);
            }
            files
        }
    };
    files.sort();
    Ok(files)
}


fn subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && !is_hidden(&path) {
            dirs.push(path);
        }
    }
    Ok(dirs)
}


fn sequence_files_in_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || is_hidden(&path) {
            continue;
        }
        let is_seq = path.file_name().and_then(|n| n.to_str()).is_some_and(is_sequence_filename);
        if is_seq {
            files.push(path);
        }
    }
    Ok(files)
}


fn is_hidden(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
