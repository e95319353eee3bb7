use crate::{
    error::{Error, Result},
    model::TrackListing,
    output::Output,
    select::{TrackFilter, select_max},
};

/// Tracks every Play app has. Each one is also an output style.
pub const WELL_KNOWN_TRACKS: &[&str] = &["production", "beta", "alpha", "internal"];

/// Output style names accepted by [`View::resolve`], as shown to users.
pub const OUTPUT_STYLES: &[&str] = &[
    "highest",
    "production",
    "beta",
    "alpha",
    "internal",
    "response",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Highest version code across all tracks.
    Highest,
    /// Highest version code on one track.
    Track(&'static str),
    /// The listing exactly as the API returned it.
    Response,
}

impl View {
    /// Resolves an output style name. Matching is case-sensitive and the empty
    /// string means "highest".
    pub fn resolve(style: &str) -> Result<Self> {
        match style {
            "" | "highest" => Ok(View::Highest),
            "response" => Ok(View::Response),
            _ => WELL_KNOWN_TRACKS
                .iter()
                .copied()
                .find(|t| *t == style)
                .map(View::Track)
                .ok_or_else(|| Error::UnknownOutputStyle {
                    style: style.to_string(),
                    allowed: OUTPUT_STYLES,
                }),
        }
    }

    pub fn filter(&self) -> Option<TrackFilter<'static>> {
        match self {
            View::Highest => Some(TrackFilter::Any),
            View::Track(name) => Some(TrackFilter::Named(*name)),
            View::Response => None,
        }
    }

    pub fn render(&self, listing: TrackListing) -> Output {
        match self.filter() {
            Some(filter) => Output::Selection(select_max(&listing, filter)),
            None => Output::Listing(listing),
        }
    }
}
