use std::fs;
use std::io::{self, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::LentoError;
use crate::lento::Matrix;

/// Strip NEXUS comments (`[...]`, possibly nested) from the input.
fn strip_comments(nexus: &str) -> String {
    let mut result = String::with_capacity(nexus.len());
    let mut depth = 0usize;

    for ch in nexus.chars() {
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(ch),
            _ => {}
        }
    }

    result
}

/// `BEGIN DATA;` or `BEGIN CHARACTERS;`, with any whitespace between the words.
fn is_character_block(line: &str) -> bool {
    let mut words = line.split_whitespace();
    words.next().is_some_and(|w| w.eq_ignore_ascii_case("BEGIN"))
        && words.next().is_some_and(|w| {
            let block = w.trim_end_matches(';');
            block.eq_ignore_ascii_case("DATA") || block.eq_ignore_ascii_case("CHARACTERS")
        })
}

/// Read the character matrix of a NEXUS file.
pub fn read_nexus_matrix<P: AsRef<Path>>(path: P) -> Result<Matrix, LentoError> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_nexus_matrix(&content)
}

/// Parse the `MATRIX` command of the first DATA or CHARACTERS block.
///
/// Rows are `taxon states`; states may be contiguous (`0110`) or separated
/// by whitespace, and a polymorphic group such as `(01)` or `{01}` is one
/// state. Repeated taxon names (interleaved matrices) are appended.
pub fn parse_nexus_matrix(content: &str) -> Result<Matrix, LentoError> {
    let content = strip_comments(content);

    let mut lines = content
        .lines()
        .skip_while(|line| !is_character_block(line))
        .skip_while(|line| !line.trim().to_ascii_uppercase().starts_with("MATRIX"));

    let first = lines
        .next()
        .ok_or_else(|| LentoError::Nexus("no MATRIX command in a DATA or CHARACTERS block".into()))?;
    // rows may start right after the keyword
    let first = &first.trim()["MATRIX".len()..];

    let mut matrix = Matrix::new();
    for line in std::iter::once(first).chain(lines) {
        let (row, terminated) = match line.find(';') {
            Some(end) => (&line[..end], true),
            None => (line, false),
        };
        if let Some((taxon, states)) = parse_row(row)? {
            matrix.entry(taxon).or_default().extend(states);
        }
        if terminated {
            break;
        }
    }

    if matrix.is_empty() {
        return Err(LentoError::Nexus("MATRIX command has no rows".into()));
    }
    Ok(matrix)
}

fn parse_row(line: &str) -> Result<Option<(String, Vec<String>)>, LentoError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    // STRUCTURE:
    // Taxon_A  0110?
    // 'Taxon B' 0 1 (01) 0
    let (taxon, rest) = if let Some(quoted) = line.strip_prefix('\'') {
        let end = quoted
            .find('\'')
            .ok_or_else(|| LentoError::Nexus(format!("unterminated taxon name: {line}")))?;
        (quoted[..end].to_string(), &quoted[end + 1..])
    } else {
        let end = line.find(char::is_whitespace).unwrap_or(line.len());
        (line[..end].to_string(), &line[end..])
    };

    Ok(Some((taxon, parse_states(rest)?)))
}

fn parse_states(rest: &str) -> Result<Vec<String>, LentoError> {
    let mut states = Vec::new();
    let mut chars = rest.chars();

    while let Some(ch) = chars.next() {
        let close = match ch {
            c if c.is_whitespace() => continue,
            '(' => ')',
            '{' => '}',
            c => {
                states.push(c.to_string());
                continue;
            }
        };
        let mut group = String::from(ch);
        loop {
            match chars.next() {
                Some(c) if c == close => {
                    group.push(c);
                    break;
                }
                Some(c) if !c.is_whitespace() => group.push(c),
                Some(_) => {}
                None => return Err(LentoError::Nexus(format!("unterminated state group: {group}"))),
            }
        }
        states.push(group);
    }

    Ok(states)
}

/// Whether [`write_report`] compresses output written to `path`.
pub fn is_gzip_path(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Write a Lento report to a file.
/// If `path` ends with `.gz`, the output is gzip-compressed.
/// Stdout (`-`) is the caller's business and is rejected here.
pub fn write_report<P: AsRef<Path>>(path: P, report: &str) -> io::Result<()> {
    use std::fs::File;
    use std::io::BufWriter;

    let p = path.as_ref();
    if p.as_os_str() == "-" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "writing to stdout is not supported by write_report",
        ));
    }

    let mut out: Box<dyn Write> = if is_gzip_path(p) {
        let f = File::create(p)?;
        let enc = GzEncoder::new(f, Compression::default());
        Box::new(BufWriter::new(enc))
    } else {
        Box::new(BufWriter::new(File::create(p)?))
    };

    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(())
}
