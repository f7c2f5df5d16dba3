//! Subcommand implementations.

pub mod ls;
pub mod serve;

/// Split a share path like `/docs/report.txt` into its segments.
///
/// Empty segments from leading, trailing or doubled slashes are dropped.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
