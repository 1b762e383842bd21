//! Adjacency template loading.
//!
//! A template is a list of landmark index pairs, as published alongside a
//! landmark detector (for example a face tessellation connection list).
//! Two encodings are accepted:
//!
//! - JSON: an array of two-element arrays, `[[0, 1], [1, 2], ...]`
//! - Text: one pair per line, separated by whitespace or a comma. Blank
//!   lines and `#` comments are ignored.
//!
//! Files ending in `.json` are decoded as JSON, everything else as text.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{TopologyError, TopologyResult};
use crate::EdgeAdjacency;

/// Load a directed adjacency template from a file.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is
/// malformed.
///
/// # Example
///
/// ```no_run
/// use face_topology::load_template;
///
/// let adjacency = load_template("tessellation.json").unwrap();
/// println!("{} indices with neighbors", adjacency.len());
/// ```
pub fn load_template<P: AsRef<Path>>(path: P) -> TopologyResult<EdgeAdjacency> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TopologyError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let pairs = if is_json {
        parse_json_pairs(&content)?
    } else {
        parse_text_pairs(&content)?
    };

    let adjacency = EdgeAdjacency::from_pairs(pairs.iter().copied());
    info!(
        path = %path.display(),
        pairs = pairs.len(),
        indices = adjacency.len(),
        "Loaded adjacency template"
    );
    Ok(adjacency)
}

/// Decode pairs from a JSON array of `[a, b]` arrays.
///
/// # Errors
///
/// Returns [`TopologyError::Json`] if the text is not an array of
/// two-element unsigned integer arrays.
pub fn parse_json_pairs(content: &str) -> TopologyResult<Vec<(u32, u32)>> {
    let raw: Vec<[u32; 2]> = serde_json::from_str(content)?;
    Ok(raw.into_iter().map(|[a, b]| (a, b)).collect())
}

/// Decode pairs from line-oriented text.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidLine`] for a line that does not hold
/// exactly two unsigned integers.
///
/// # Example
///
/// ```
/// use face_topology::parse_text_pairs;
///
/// let pairs = parse_text_pairs("# lips\n0 37\n37, 0\n\n").unwrap();
/// assert_eq!(pairs, vec![(0, 37), (37, 0)]);
/// ```
pub fn parse_text_pairs(content: &str) -> TopologyResult<Vec<(u32, u32)>> {
    let mut pairs = Vec::new();

    for (line_idx, raw_line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [a, b] = fields.as_slice() else {
            return Err(TopologyError::invalid_line(
                line_no,
                format!("expected 2 indices, found {}", fields.len()),
            ));
        };

        let parse = |s: &str| {
            s.parse::<u32>()
                .map_err(|e| TopologyError::invalid_line(line_no, format!("'{s}': {e}")))
        };
        pairs.push((parse(*a)?, parse(*b)?));
    }

    debug!(pairs = pairs.len(), "Parsed text template");
    Ok(pairs)
}
