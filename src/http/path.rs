//! Path segment extraction for the existence endpoint.
//!
//! # Responsibilities
//! - Split a request path below a fixed prefix into decoded segments
//! - Validate the `/exists/{namespace}/{pvc}` shape
//!
//! # Design Decisions
//! - Segments are percent-decoded; a decoded segment may not contain '/'
//! - Empty segments are rejected, so trailing slashes are invalid
//! - Exactly two segments; deeper paths are rejected rather than folded into the PVC

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Prefix of the existence endpoint.
pub const EXISTS_PREFIX: &str = "/exists";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path format, expected /exists/{{namespace}}/{{pvc}}")]
pub struct InvalidPath;

/// Namespace/PVC pair addressed by an existence request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTarget {
    pub namespace: String,
    pub pvc: String,
}

/// Split `path` below `prefix` into percent-decoded segments.
///
/// Returns `None` if `path` is not under `prefix`, or if a segment is not
/// valid UTF-8 once decoded.
pub fn split_segments(path: &str, prefix: &str) -> Option<Vec<String>> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let rest = rest.strip_prefix('/')?;

    rest.split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .ok()
                .map(|s| s.into_owned())
        })
        .collect()
}

/// Parse `/exists/{namespace}/{pvc}`.
pub fn parse_exists_path(path: &str) -> Result<BackupTarget, InvalidPath> {
    let segments = split_segments(path, EXISTS_PREFIX).ok_or(InvalidPath)?;

    match segments.as_slice() {
        [namespace, pvc] if valid_segment(namespace) && valid_segment(pvc) => Ok(BackupTarget {
            namespace: namespace.clone(),
            pvc: pvc.clone(),
        }),
        _ => Err(InvalidPath),
    }
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}
