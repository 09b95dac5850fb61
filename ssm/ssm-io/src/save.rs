//! Incremental output naming for generated shapes.
//!
//! Generated meshes are saved as `Random1.stl`, `Random2.stl`, ... in the
//! output directory, always taking the lowest unused positive index. Gaps
//! left by deleted files are refilled before the sequence is extended.

use std::path::{Path, PathBuf};

use crate::error::{IoError, IoResult};

/// Stem shared by all generated output files.
const OUTPUT_STEM: &str = "Random";

/// The next free `Random<i>.<extension>` path in `dir`.
///
/// Scans upward from index 1 and returns the first path that does not yet
/// exist, so repeated runs never overwrite earlier output. The scan is not
/// atomic against concurrent writers; callers running generations in
/// parallel into one directory should hand out indices themselves.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or is not a directory.
///
/// # Example
///
/// ```no_run
/// use ssm_io::next_random_path;
///
/// let path = next_random_path("out", "stl").unwrap();
/// assert!(path.ends_with("Random1.stl"));
/// ```
pub fn next_random_path<P: AsRef<Path>>(dir: P, extension: &str) -> IoResult<PathBuf> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(IoError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    for index in 1.. {
        let candidate = dir.join(format!("{OUTPUT_STEM}{index}.{extension}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    unreachable!("index space exhausted")
}
