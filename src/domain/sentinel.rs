use std::fmt;

/// Reserved placeholder values standing in for "no usable data".
///
/// Upstream services regularly return records with fields missing or empty;
/// consumers render these placeholders instead of branching on absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// A field that arrived empty, null or absent.
    NoData,
    /// A record whose identity field is missing. Records carrying this name
    /// are unusable and get filtered out of final collections.
    UnknownName,
    /// Every informational field of a fallback record reads this.
    ServerError,
}

impl Sentinel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Sentinel::NoData => "N/A",
            Sentinel::UnknownName => "Unknown Competitor",
            Sentinel::ServerError => "No data available due to server error",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
