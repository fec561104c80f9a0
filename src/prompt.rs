//! Interactive collection of request values
//!
//! Each prompt repeats until it gets a usable answer. Reader and writer are
//! generic so the loops can be driven from memory in tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

const INVALID_INPUT: &str = "Invalid input";

/// Ask for a positive integer (`u32`, `usize`, ...) until one is entered
pub fn prompt_positive<T, R, W>(input: &mut R, output: &mut W, label: &str) -> io::Result<T>
where
    T: FromStr + PartialOrd + From<u8>,
    R: BufRead,
    W: Write,
{
    loop {
        let line = read_answer(input, output, label)?;
        match line.trim().parse::<T>() {
            Ok(value) if value >= T::from(1) => return Ok(value),
            _ => writeln!(output, "{INVALID_INPUT}")?,
        }
    }
}

/// Ask for a non-empty path until one is entered
pub fn prompt_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<PathBuf> {
    loop {
        let line = read_answer(input, output, label)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            writeln!(output, "{INVALID_INPUT}")?;
        } else {
            return Ok(PathBuf::from(trimmed));
        }
    }
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("input closed while waiting for {label}"),
        ));
    }
    Ok(line)
}
