//! Deterministic file names and page paths for rendered combinations.
//!
//! Tool and mirror keys are restricted to `[a-z0-9]+`, so `-` only ever
//! separates components. Two OS keys of the same tool can still normalize to
//! the same string (`ubuntu-22.04` and `ubuntu-2-204`); callers that write
//! files must check for that rather than assume it away.

/// Strip `.` and `-` from an OS key: `ubuntu-22.04` becomes `ubuntu2204`.
#[must_use]
pub fn normalize_os_version(os: &str) -> String {
    os.chars().filter(|c| !matches!(c, '.' | '-')).collect()
}

/// `{tool}-{mirror}.sh`, or `{tool}-{normalizedOs}-{mirror}.sh` with an OS.
#[must_use]
pub fn script_file_name(tool: &str, mirror: &str, os: Option<&str>) -> String {
    match os {
        Some(os) => format!("{tool}-{}-{mirror}.sh", normalize_os_version(os)),
        None => format!("{tool}-{mirror}.sh"),
    }
}

/// `tools/{tool}/{mirror}/`, or `tools/{tool}/{os}/{mirror}/` with an OS.
#[must_use]
pub fn page_path(tool: &str, mirror: &str, os: Option<&str>) -> String {
    match os {
        Some(os) => format!("tools/{tool}/{os}/{mirror}/"),
        None => format!("tools/{tool}/{mirror}/"),
    }
}

/// Site-relative page path of a tool's landing page
#[must_use]
pub fn tool_page_path(tool: &str) -> String {
    format!("tools/{tool}/")
}
