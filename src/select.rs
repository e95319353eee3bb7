use crate::model::{SelectionResult, TrackListing};

/// Which tracks take part in a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFilter<'a> {
    Any,
    Named(&'a str),
}

impl TrackFilter<'_> {
    pub fn matches(&self, track: &str) -> bool {
        match self {
            TrackFilter::Any => true,
            TrackFilter::Named(name) => *name == track,
        }
    }
}

/// Returns the release holding the highest version code on the tracks the
/// filter accepts.
///
/// Listing order is tracks, then releases, then codes. An equal code found
/// later never replaces an earlier one. Returns the zero value when nothing
/// matches.
pub fn select_max(listing: &TrackListing, filter: TrackFilter<'_>) -> SelectionResult {
    let mut result = SelectionResult::default();
    for track in listing.tracks.iter().filter(|t| filter.matches(&t.track)) {
        for release in &track.releases {
            for &code in &release.version_codes {
                if result.code < code {
                    result = SelectionResult {
                        track: track.track.clone(),
                        name: release.name.clone(),
                        code,
                    };
                }
            }
        }
    }
    result
}
