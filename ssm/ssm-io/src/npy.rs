//! Minimal NPY reader for the mode-matrix artifact.
//!
//! Mode matrices ship as NPY version 1.x files holding a 2-D `float64`
//! array. Only what those artifacts actually use is supported: little-endian
//! `f8`, two dimensions, C or Fortran order. Anything else is rejected with
//! [`IoError::UnsupportedNpy`].
//!
//! The array's logical orientation (modes as rows vs. columns) differs
//! between model releases and cannot be read off the header alone. It is
//! resolved in [`load_mode_matrix`] by matching the dimensions against the
//! flat coordinate count `3N` of the already-loaded mean mesh.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ssm_core::{ModeOrientation, ShapeModel};
use ssm_types::LimbMesh;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// NPY magic string.
const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// A 2-D `float64` array read from an NPY file.
#[derive(Debug, Clone)]
pub struct NpyMatrix {
    /// Array dimensions as stored in the header, `(rows, cols)`.
    pub shape: (usize, usize),
    /// Whether the data is stored in Fortran (column-major) order.
    pub fortran_order: bool,
    /// The raw element data in file order.
    pub data: Vec<f64>,
}

impl NpyMatrix {
    /// The data relaid in C (row-major) order regardless of storage order.
    #[must_use]
    pub fn to_row_major(&self) -> Vec<f64> {
        if !self.fortran_order {
            return self.data.clone();
        }
        let (rows, cols) = self.shape;
        let mut out = Vec::with_capacity(self.data.len());
        for r in 0..rows {
            for c in 0..cols {
                out.push(self.data[c * rows + r]);
            }
        }
        out
    }
}

/// Read a 2-D `float64` NPY file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not NPY, or stores
/// anything other than a little-endian `f8` 2-D array.
pub fn load_npy<P: AsRef<Path>>(path: P) -> IoResult<NpyMatrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mut reader = BufReader::new(file);

    let mut preamble = [0u8; 10];
    reader
        .read_exact(&mut preamble)
        .map_err(|_| IoError::UnexpectedEof { position: 0 })?;
    if &preamble[..6] != MAGIC {
        return Err(IoError::invalid_content("missing NPY magic bytes"));
    }
    let major = preamble[6];
    if major != 1 {
        return Err(IoError::UnsupportedNpy(format!(
            "NPY format version {major}.x; only 1.x is supported"
        )));
    }
    let header_len = u16::from_le_bytes([preamble[8], preamble[9]]) as usize;

    let mut header = vec![0u8; header_len];
    reader
        .read_exact(&mut header)
        .map_err(|_| IoError::UnexpectedEof { position: 10 })?;
    let header = String::from_utf8_lossy(&header);

    let descr = dict_value(&header, "descr")?;
    if descr != "<f8" {
        return Err(IoError::UnsupportedNpy(format!(
            "dtype {descr}; only little-endian float64 is supported"
        )));
    }

    let fortran_order = match dict_value(&header, "fortran_order")?.as_str() {
        "True" => true,
        "False" => false,
        other => {
            return Err(IoError::invalid_content(format!(
                "bad fortran_order value: {other}"
            )))
        }
    };

    let shape = parse_shape(&dict_value(&header, "shape")?)?;
    let element_count = shape
        .0
        .checked_mul(shape.1)
        .ok_or_else(|| IoError::invalid_content("shape overflows element count"))?;

    let mut data = Vec::with_capacity(element_count);
    let mut buf = [0u8; 8];
    for i in 0..element_count {
        reader.read_exact(&mut buf).map_err(|_| IoError::UnexpectedEof {
            position: (10 + header_len + i * 8) as u64,
        })?;
        data.push(f64::from_le_bytes(buf));
    }

    debug!(
        rows = shape.0,
        cols = shape.1,
        fortran_order,
        path = %path.display(),
        "loaded NPY matrix"
    );

    Ok(NpyMatrix {
        shape,
        fortran_order,
        data,
    })
}

/// Load a mode-matrix NPY and assemble it with the mean mesh into a model.
///
/// The matrix must be `M x 3N` or `3N x M`, with `3N` taken from the mean.
/// Which axis holds the modes is decided by matching dimensions: the axis
/// equal to `3N` is the coordinate axis, the other is `M`. A square matrix
/// (`M == 3N`) cannot be disambiguated and is rejected; no shipped release
/// has ever been square.
///
/// # Errors
///
/// Returns an error if the file is unreadable, is not a supported NPY
/// array, or neither axis matches the mean's coordinate count.
pub fn load_mode_matrix<P: AsRef<Path>>(mean: LimbMesh, path: P) -> IoResult<ShapeModel> {
    let matrix = load_npy(path)?;
    let coord_count = mean.vertex_count() * 3;
    let (rows, cols) = matrix.shape;

    let (mode_count, modes_are_rows) = match (rows == coord_count, cols == coord_count) {
        (true, true) => {
            return Err(IoError::UnsupportedNpy(format!(
                "square {rows}x{cols} mode matrix cannot be oriented"
            )))
        }
        (false, true) => (rows, true),
        (true, false) => (cols, false),
        (false, false) => {
            return Err(IoError::invalid_content(format!(
                "mode matrix is {rows}x{cols} but the mean mesh has {coord_count} coordinates"
            )))
        }
    };

    // Row-major storage of an (M, 3N) array walks modes contiguously;
    // every other storage/axis combination interleaves them.
    let orientation = match (modes_are_rows, matrix.fortran_order) {
        (true, false) | (false, true) => ModeOrientation::RowMajor,
        (true, true) | (false, false) => ModeOrientation::ColumnMajor,
    };

    debug!(mode_count, ?orientation, "resolved mode matrix layout");
    ShapeModel::from_matrix(mean, &matrix.data, mode_count, orientation).map_err(IoError::from)
}

/// Pull one value out of the header's Python dict literal.
fn dict_value(header: &str, key: &str) -> IoResult<String> {
    let pattern = format!("'{key}':");
    let start = header
        .find(&pattern)
        .ok_or_else(|| IoError::invalid_content(format!("NPY header missing '{key}'")))?
        + pattern.len();
    let rest = header[start..].trim_start();

    let value = if let Some(stripped) = rest.strip_prefix('\'') {
        let end = stripped
            .find('\'')
            .ok_or_else(|| IoError::invalid_content("unterminated string in NPY header"))?;
        &stripped[..end]
    } else if rest.starts_with('(') {
        let end = rest
            .find(')')
            .ok_or_else(|| IoError::invalid_content("unterminated tuple in NPY header"))?;
        &rest[..=end]
    } else {
        let end = rest
            .find([',', '}'])
            .ok_or_else(|| IoError::invalid_content("malformed NPY header dict"))?;
        rest[..end].trim_end()
    };
    Ok(value.to_string())
}

/// Parse a Python shape tuple like `(34, 295236)` into two dimensions.
fn parse_shape(tuple: &str) -> IoResult<(usize, usize)> {
    let inner = tuple
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| IoError::invalid_content(format!("bad shape tuple: {tuple}")))?;
    let dims: Vec<usize> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| IoError::invalid_content(format!("bad shape dimension: {s}")))
        })
        .collect::<IoResult<_>>()?;

    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        other => Err(IoError::UnsupportedNpy(format!(
            "{}-dimensional array; mode matrices are 2-D",
            other.len()
        ))),
    }
}
