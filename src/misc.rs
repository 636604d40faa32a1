// This file contains miscellaneous functions used by various parts of magqc.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, create_dir_all};
use std::io;
use std::io::{prelude::*, BufReader};
use std::path::Path;


pub fn check_if_file_exists(filename: &Path) {
    // Quits with an error if the given path is not an existing file.
    if !filename.exists() {
        quit_with_error(&format!("file does not exist: {}", filename.display()));
    }
    if !filename.is_file() {
        quit_with_error(&format!("{} is not a file", filename.display()));
    }
}


pub fn check_if_dir_exists(dir: &Path) {
    // Quits with an error if the given path is not an existing directory.
    if !dir.exists() {
        quit_with_error(&format!("directory does not exist: {}", dir.display()));
    }
    if !dir.is_dir() {
        quit_with_error(&format!("{} is not a directory", dir.display()));
    }
}


pub fn check_if_file_is_not_dir(filename: &Path) {
    // Quits with an error if the given output path is an existing directory.
    if filename.is_dir() {
        quit_with_error(&format!("{} is a directory, not a file", filename.display()));
    }
}


pub fn create_parent_dir(filename: &Path) {
    let Some(parent) = filename.parent() else { return };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return;
    }
    if let Err(e) = create_dir_all(parent) {
        quit_with_error(&format!("failed to create directory {}\n{}", parent.display(), e));
    }
}


#[cfg(not(test))]
pub fn quit_with_error(text: &str) -> ! {
    // For friendly error messages, this function normally just prints the error and quits.
    eprintln!();
    eprintln!("Error: {}", text);
    std::process::exit(1);
}
#[cfg(test)]
pub fn quit_with_error(text: &str) -> ! {
    // But when running unit tests, this function instead panics so I can catch it for the test.
    panic!("{}", text);
}


pub fn is_file_gzipped(filename: &Path) -> io::Result<bool> {
    // Looks for the gzip magic number in the first two bytes. Files too short to hold it are
    // treated as plain text.
    let mut file = File::open(filename)?;
    let mut buf = [0u8; 2];
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 { return Ok(false); }
        filled += n;
    }
    Ok(buf[0] == 31 && buf[1] == 139)
}


pub fn open_text_reader(filename: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    // Returns a buffered reader over the file's decompressed text, for both unzipped and gzipped
    // files.
    let file = File::open(filename)?;
    if is_file_gzipped(filename)? {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}


pub fn file_md5(filename: &Path) -> io::Result<String> {
    // MD5 of the raw file bytes (not decompressed), read in chunks.
    let mut reader = BufReader::new(File::open(filename)?);
    let mut context = md5::Context::new();
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() { break; }
        context.consume(chunk);
        let n = chunk.len();
        reader.consume(n);
    }
    Ok(format!("{:x}", context.compute()))
}


pub fn format_duration(duration: std::time::Duration) -> String {
    let microseconds = duration.as_micros() % 1000000;
    let seconds =      duration.as_micros() / 1000000 % 60;
    let minutes =      duration.as_micros() / 1000000 / 60 % 60;
    let hours =        duration.as_micros() / 1000000 / 60 / 60;
    format!("{}:{:02}:{:02}.{:06}", hours, minutes, seconds, microseconds)
}


pub fn format_float(num: f64) -> String {
    // Formats a float with up to six decimal places but then drops trailing zeros.
    let mut formatted = format!("{:.6}", num);
    if !formatted.contains('.') { return formatted }
    while formatted.ends_with('0') { formatted.pop(); }
    if formatted.ends_with('.') { formatted.pop(); }
    formatted
}


pub fn percentage(count: usize, total: usize) -> String {
    if total == 0 { return "0.0%".to_string(); }
    format!("{:.1}%", 100.0 * count as f64 / total as f64)
}


pub fn progress_bar(length: usize) -> ProgressBar {
    if cfg!(test) {
        ProgressBar::hidden() // don't show a progress bar during unit tests
    } else {
        let pb = ProgressBar::new(length as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} files ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()));
        pb
    }
}
