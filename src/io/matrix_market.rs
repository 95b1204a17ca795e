//! Matrix Market reader
//!
//! Reads the coordinate and array flavours of the Matrix Market exchange
//! format into a `sprs` triplet matrix. Supported fields are `real`,
//! `integer` and `pattern`; supported symmetries are `general`,
//! `symmetric` and `skew-symmetric`. Symmetric storage is expanded on
//! load so the triplet matrix always holds every entry of the full matrix.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::{Array2, ShapeBuilder};
use sprs::TriMat;
use tracing::{debug, info, warn};

use crate::error::{Result, SpyError};

/// Upper bound on storage reserved up front from a declared entry count;
/// beyond this the buffers grow as entries are actually read
pub const MAX_PREALLOCATED_ENTRIES: usize = 1 << 20;

/// Storage layout declared in the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    /// One `row col [value]` line per stored entry
    Coordinate,
    /// Every value listed in column-major order
    Array,
}

/// Value type declared in the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixField {
    Real,
    Integer,
    /// Structure only; every stored entry has value 1.0
    Pattern,
}

/// Symmetry declared in the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSymmetry {
    General,
    /// Only the lower triangle is stored; a(j, i) = a(i, j)
    Symmetric,
    /// Only the strictly lower triangle is stored; a(j, i) = -a(i, j)
    SkewSymmetric,
}

impl MatrixSymmetry {
    fn mirror(self, value: f64) -> Option<f64> {
        match self {
            MatrixSymmetry::General => None,
            MatrixSymmetry::Symmetric => Some(value),
            MatrixSymmetry::SkewSymmetric => Some(-value),
        }
    }
}

/// Parsed banner and size line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixMarketHeader {
    pub format: MatrixFormat,
    pub field: MatrixField,
    pub symmetry: MatrixSymmetry,
    pub rows: usize,
    pub cols: usize,
    /// Number of data entries declared by the file (before symmetric expansion)
    pub entries: usize,
}

impl fmt::Display for MatrixMarketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} {:?} {} x {} ({} entries)",
            self.format, self.field, self.symmetry, self.rows, self.cols, self.entries
        )
    }
}

/// A matrix loaded from a Matrix Market file, in coordinate form
#[derive(Debug)]
pub struct MatrixMarket {
    pub header: MatrixMarketHeader,
    pub triplets: TriMat<f64>,
}

impl MatrixMarket {
    /// Returns `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.triplets.rows(), self.triplets.cols())
    }

    /// Number of stored triplets, after symmetric expansion
    pub fn nnz(&self) -> usize {
        self.triplets.nnz()
    }

    pub fn into_triplets(self) -> TriMat<f64> {
        self.triplets
    }
}

/// Reads a Matrix Market file from disk
pub fn read_matrix_market<P: AsRef<Path>>(path: P) -> Result<MatrixMarket> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SpyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "loading Matrix Market file");
    parse(BufReader::new(file), path)
}

/// Reads Matrix Market content from any buffered reader
pub fn read_matrix_market_from<R: BufRead>(reader: R) -> Result<MatrixMarket> {
    parse(reader, Path::new("<reader>"))
}

fn parse<R: BufRead>(reader: R, origin: &Path) -> Result<MatrixMarket> {
    let mut lines = NumberedLines::new(reader, origin);

    let (format, field, symmetry) = parse_banner(&mut lines)?;

    let size_line = lines
        .next_data()?
        .ok_or_else(|| SpyError::parse(lines.line_no(), "missing size line"))?;
    let header = parse_size_line(&size_line, lines.line_no(), format, field, symmetry)?;
    debug!(%header, "parsed Matrix Market header");

    let triplets = match format {
        MatrixFormat::Coordinate => read_coordinate(&mut lines, &header)?,
        MatrixFormat::Array => read_array(&mut lines, &header)?,
    };

    info!(
        rows = header.rows,
        cols = header.cols,
        nnz = triplets.nnz(),
        "loaded matrix"
    );

    Ok(MatrixMarket { header, triplets })
}

/// Line reader that tracks 1-based line numbers
struct NumberedLines<R> {
    inner: std::io::Lines<R>,
    line_no: usize,
    origin: PathBuf,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R, origin: &Path) -> Self {
        Self {
            inner: reader.lines(),
            line_no: 0,
            origin: origin.to_path_buf(),
        }
    }

    fn line_no(&self) -> usize {
        self.line_no.max(1)
    }

    fn next_raw(&mut self) -> Result<Option<String>> {
        match self.inner.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                line.map(Some).map_err(|source| SpyError::Io {
                    path: self.origin.clone(),
                    source,
                })
            }
        }
    }

    /// Next line that is neither blank nor a `%` comment
    fn next_data(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.next_raw()? {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }
}

fn parse_banner<R: BufRead>(
    lines: &mut NumberedLines<R>,
) -> Result<(MatrixFormat, MatrixField, MatrixSymmetry)> {
    let banner = lines
        .next_raw()?
        .ok_or_else(|| SpyError::parse(1, "empty file"))?;
    let line = lines.line_no();

    let tokens: Vec<String> = banner
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();

    if tokens.first().map(String::as_str) != Some("%%matrixmarket") {
        return Err(SpyError::parse(line, "missing %%MatrixMarket banner"));
    }
    if tokens.len() != 5 {
        return Err(SpyError::parse(
            line,
            format!("banner must have 5 fields, found {}", tokens.len()),
        ));
    }
    if tokens[1] != "matrix" {
        return Err(SpyError::UnsupportedFormat(format!("object '{}'", tokens[1])));
    }

    let format = match tokens[2].as_str() {
        "coordinate" => MatrixFormat::Coordinate,
        "array" => MatrixFormat::Array,
        other => return Err(SpyError::parse(line, format!("unknown format '{}'", other))),
    };

    let field = match tokens[3].as_str() {
        "real" | "double" => MatrixField::Real,
        "integer" => MatrixField::Integer,
        "pattern" => MatrixField::Pattern,
        "complex" => return Err(SpyError::UnsupportedFormat("complex field".to_string())),
        other => return Err(SpyError::parse(line, format!("unknown field '{}'", other))),
    };

    let symmetry = match tokens[4].as_str() {
        "general" => MatrixSymmetry::General,
        "symmetric" => MatrixSymmetry::Symmetric,
        "skew-symmetric" => MatrixSymmetry::SkewSymmetric,
        "hermitian" => {
            return Err(SpyError::UnsupportedFormat("hermitian symmetry".to_string()))
        }
        other => return Err(SpyError::parse(line, format!("unknown symmetry '{}'", other))),
    };

    if field == MatrixField::Pattern && format == MatrixFormat::Array {
        return Err(SpyError::parse(line, "pattern field requires coordinate format"));
    }
    if field == MatrixField::Pattern && symmetry == MatrixSymmetry::SkewSymmetric {
        return Err(SpyError::parse(line, "pattern matrices cannot be skew-symmetric"));
    }

    Ok((format, field, symmetry))
}

fn parse_size_line(
    text: &str,
    line: usize,
    format: MatrixFormat,
    field: MatrixField,
    symmetry: MatrixSymmetry,
) -> Result<MatrixMarketHeader> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let expected = match format {
        MatrixFormat::Coordinate => 3,
        MatrixFormat::Array => 2,
    };
    if parts.len() != expected {
        return Err(SpyError::parse(
            line,
            format!("size line must have {} fields, found {}", expected, parts.len()),
        ));
    }

    let rows = parse_count(parts[0], line, "number of rows")?;
    let cols = parse_count(parts[1], line, "number of columns")?;

    if symmetry != MatrixSymmetry::General && rows != cols {
        return Err(SpyError::parse(
            line,
            format!("{:?} matrix must be square, got {} x {}", symmetry, rows, cols),
        ));
    }

    let entries = match format {
        MatrixFormat::Coordinate => parse_count(parts[2], line, "number of entries")?,
        MatrixFormat::Array => {
            let count = match symmetry {
                MatrixSymmetry::General => rows.checked_mul(cols),
                MatrixSymmetry::Symmetric => rows
                    .checked_add(1)
                    .and_then(|r| rows.checked_mul(r))
                    .map(|n| n / 2),
                MatrixSymmetry::SkewSymmetric => {
                    rows.checked_mul(rows.saturating_sub(1)).map(|n| n / 2)
                }
            };
            count.ok_or_else(|| {
                SpyError::parse(line, format!("{} x {} array is too large", rows, cols))
            })?
        }
    };

    Ok(MatrixMarketHeader {
        format,
        field,
        symmetry,
        rows,
        cols,
        entries,
    })
}

/// Storage to reserve for `declared` entries
fn initial_capacity(declared: usize) -> usize {
    if declared > MAX_PREALLOCATED_ENTRIES {
        warn!(
            declared,
            reserved = MAX_PREALLOCATED_ENTRIES,
            "declared entry count is very large; reserving less up front"
        );
    }
    declared.min(MAX_PREALLOCATED_ENTRIES)
}

fn parse_count(token: &str, line: usize, what: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| SpyError::parse(line, format!("invalid {} '{}'", what, token)))
}

/// Parses a 1-based index and converts it to 0-based
fn parse_index(token: &str, bound: usize, line: usize, what: &str) -> Result<usize> {
    let index: usize = token
        .parse()
        .map_err(|_| SpyError::parse(line, format!("invalid {} index '{}'", what, token)))?;
    if index == 0 || index > bound {
        return Err(SpyError::parse(
            line,
            format!("{} index {} outside 1..={}", what, index, bound),
        ));
    }
    Ok(index - 1)
}

fn parse_value(token: &str, field: MatrixField, line: usize) -> Result<f64> {
    let invalid = || SpyError::parse(line, format!("invalid value '{}'", token));
    match field {
        MatrixField::Integer => token.parse::<i64>().map(|v| v as f64).map_err(|_| invalid()),
        _ => token.parse::<f64>().map_err(|_| invalid()),
    }
}

fn read_coordinate<R: BufRead>(
    lines: &mut NumberedLines<R>,
    header: &MatrixMarketHeader,
) -> Result<TriMat<f64>> {
    let declared = match header.symmetry {
        MatrixSymmetry::General => header.entries,
        _ => header.entries.saturating_mul(2),
    };
    let mut triplets =
        TriMat::with_capacity((header.rows, header.cols), initial_capacity(declared));
    let mut read = 0;

    while let Some(text) = lines.next_data()? {
        let line = lines.line_no();
        if read == header.entries {
            return Err(SpyError::parse(
                line,
                format!("more entries than the {} declared", header.entries),
            ));
        }

        let parts: Vec<&str> = text.split_whitespace().collect();
        let needed = if header.field == MatrixField::Pattern { 2 } else { 3 };
        if parts.len() < needed {
            return Err(SpyError::parse(
                line,
                format!("expected {} fields, found {}", needed, parts.len()),
            ));
        }

        let row = parse_index(parts[0], header.rows, line, "row")?;
        let col = parse_index(parts[1], header.cols, line, "column")?;
        let value = match header.field {
            MatrixField::Pattern => 1.0,
            field => parse_value(parts[2], field, line)?,
        };

        triplets.add_triplet(row, col, value);
        if row != col {
            if let Some(mirrored) = header.symmetry.mirror(value) {
                triplets.add_triplet(col, row, mirrored);
            }
        }
        read += 1;
    }

    if read < header.entries {
        return Err(SpyError::parse(
            lines.line_no(),
            format!("expected {} entries, found {}", header.entries, read),
        ));
    }

    Ok(triplets)
}

fn read_array<R: BufRead>(
    lines: &mut NumberedLines<R>,
    header: &MatrixMarketHeader,
) -> Result<TriMat<f64>> {
    let mut values = Vec::with_capacity(initial_capacity(header.entries));

    while let Some(text) = lines.next_data()? {
        let line = lines.line_no();
        for token in text.split_whitespace() {
            if values.len() == header.entries {
                return Err(SpyError::parse(
                    line,
                    format!("more values than the {} expected", header.entries),
                ));
            }
            values.push(parse_value(token, header.field, line)?);
        }
    }

    if values.len() < header.entries {
        return Err(SpyError::parse(
            lines.line_no(),
            format!("expected {} values, found {}", header.entries, values.len()),
        ));
    }

    let dense = match header.symmetry {
        MatrixSymmetry::General => Array2::from_shape_vec((header.rows, header.cols).f(), values)
            .map_err(|e| SpyError::parse(lines.line_no(), e.to_string()))?,
        symmetry => {
            let n = header.rows;
            let strict = symmetry == MatrixSymmetry::SkewSymmetric;
            let mut dense = Array2::<f64>::zeros((n, n));
            let mut values = values.into_iter();
            for j in 0..n {
                let first = if strict { j + 1 } else { j };
                for i in first..n {
                    // Length was checked above
                    let value = values.next().unwrap_or_default();
                    dense[[i, j]] = value;
                    if i != j {
                        if let Some(mirrored) = symmetry.mirror(value) {
                            dense[[j, i]] = mirrored;
                        }
                    }
                }
            }
            dense
        }
    };

    let mut triplets = TriMat::new((header.rows, header.cols));
    for ((i, j), &value) in dense.indexed_iter() {
        if value != 0.0 {
            triplets.add_triplet(i, j, value);
        }
    }

    Ok(triplets)
}
