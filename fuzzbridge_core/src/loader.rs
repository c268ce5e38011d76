use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from parsing the line-oriented dictionary text format.
///
/// Each variant carries the 1-based line number so a diagnostic can point
/// at the offending line. A malformed line is always an error, never
/// silently skipped.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The line carries content but no quoted literal.
    #[error("line {line}: expected a quoted literal")]
    MissingQuote { line: usize },

    /// The opening quote has no matching closing quote.
    #[error("line {line}: literal is not terminated by a closing quote")]
    UnterminatedLiteral { line: usize },

    /// A backslash escape other than `\\`, `\"` or `\xNN`.
    #[error("line {line}: invalid escape sequence")]
    InvalidEscape { line: usize },

    /// A `\xNN` escape with a non-hex digit.
    #[error("line {line}: invalid hex digit in \\x escape")]
    InvalidHexDigit { line: usize },

    /// Non-whitespace content after the closing quote.
    #[error("line {line}: unexpected characters after the closing quote")]
    TrailingCharacters { line: usize },
}

/// Errors from loading seed or dictionary inputs off storage.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// An I/O failure while reading a seed or dictionary path.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dictionary file failed to parse. Names the offending file; the
    /// harness entry point treats this as fatal.
    #[error("could not parse dictionary file {path:?}: {source}")]
    DictionaryParse {
        path: PathBuf,
        #[source]
        source: DictionaryError,
    },
}

/// One file read by the external file-reading collaborator.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

/// Reads `path` as either a single file or a one-level directory of files.
///
/// Directory entries are returned sorted by path so loading order is
/// deterministic; subdirectories and their contents are not traversed.
pub fn read_file_or_directory(path: &Path) -> Result<Vec<FileEntry>, LoaderError> {
    let io_err = |source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path.is_dir() {
        let mut file_paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(path).map_err(io_err)? {
            let entry_path = entry.map_err(io_err)?.path();
            if entry_path.is_file() {
                file_paths.push(entry_path);
            }
        }
        file_paths.sort();

        let mut entries = Vec::with_capacity(file_paths.len());
        for file_path in file_paths {
            let data = fs::read(&file_path).map_err(|source| LoaderError::Io {
                path: file_path.clone(),
                source,
            })?;
            entries.push(FileEntry {
                path: file_path,
                data,
            });
        }
        Ok(entries)
    } else {
        let data = fs::read(path).map_err(io_err)?;
        Ok(vec![FileEntry {
            path: path.to_path_buf(),
            data,
        }])
    }
}

/// Loads the seed corpus under `path`, truncating each entry to at most
/// `max_len` bytes.
///
/// An empty `path` means "no seed corpus" and yields an empty list.
/// Oversized seeds are truncated silently; entries come back in the order
/// the file-reading collaborator produced them.
pub fn read_seeds(path: &str, max_len: usize) -> Result<Vec<Vec<u8>>, LoaderError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let entries = read_file_or_directory(Path::new(path))?;
    Ok(entries
        .into_iter()
        .map(|mut entry| {
            entry.data.truncate(max_len);
            entry.data
        })
        .collect())
}

/// Loads and parses every dictionary file under `path`, flattening all
/// literals in file order then line order.
///
/// An empty `path` means "no dictionary" and yields an empty list. A parse
/// failure in any file stops loading and names the file.
pub fn read_dictionary(path: &str) -> Result<Vec<Vec<u8>>, LoaderError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let mut tokens = Vec::new();
    for entry in read_file_or_directory(Path::new(path))? {
        let parsed =
            parse_dictionary(&entry.data).map_err(|source| LoaderError::DictionaryParse {
                path: entry.path,
                source,
            })?;
        tokens.extend(parsed);
    }
    Ok(tokens)
}

/// Parses dictionary text: one quoted literal per line.
///
/// Blank lines and `#` comment lines are ignored, an optional `name=`
/// prefix before the opening quote is ignored, and the literal supports the
/// `\\`, `\"` and `\xNN` escapes. The input is consumed as raw bytes, so a
/// literal may carry arbitrary byte values directly as well as via escapes.
pub fn parse_dictionary(data: &[u8]) -> Result<Vec<Vec<u8>>, DictionaryError> {
    let mut tokens = Vec::new();
    for (index, raw_line) in data.split(|&b| b == b'\n').enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim_ascii();
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        tokens.push(parse_literal_line(line, line_number)?);
    }
    Ok(tokens)
}

fn from_hex(digit: u8, line: usize) -> Result<u8, DictionaryError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        _ => Err(DictionaryError::InvalidHexDigit { line }),
    }
}

fn parse_literal_line(bytes: &[u8], line_number: usize) -> Result<Vec<u8>, DictionaryError> {
    // Anything before the opening quote is the optional `name=` prefix.
    let open = bytes
        .iter()
        .position(|&b| b == b'"')
        .ok_or(DictionaryError::MissingQuote { line: line_number })?;

    let mut token = Vec::new();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                // Closing quote; only whitespace may follow.
                if bytes[i + 1..].iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(DictionaryError::TrailingCharacters { line: line_number });
                }
                return Ok(token);
            }
            b'\\' => {
                let escape = bytes
                    .get(i + 1)
                    .ok_or(DictionaryError::UnterminatedLiteral { line: line_number })?;
                match escape {
                    b'\\' => {
                        token.push(b'\\');
                        i += 2;
                    }
                    b'"' => {
                        token.push(b'"');
                        i += 2;
                    }
                    b'x' | b'X' => {
                        let (hi, lo) = match (bytes.get(i + 2), bytes.get(i + 3)) {
                            (Some(hi), Some(lo)) => (*hi, *lo),
                            _ => {
                                return Err(DictionaryError::UnterminatedLiteral {
                                    line: line_number,
                                });
                            }
                        };
                        let value = (from_hex(hi, line_number)? << 4) | from_hex(lo, line_number)?;
                        token.push(value);
                        i += 4;
                    }
                    _ => return Err(DictionaryError::InvalidEscape { line: line_number }),
                }
            }
            other => {
                token.push(other);
                i += 1;
            }
        }
    }
    Err(DictionaryError::UnterminatedLiteral { line: line_number })
}
