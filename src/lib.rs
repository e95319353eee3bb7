pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod play;
pub mod select;
pub mod view;

pub use config::{Config, ServiceAccountKey, resolve_credentials};
pub use error::{Error, Result};
pub use model::{Release, SelectionResult, Track, TrackListing};
pub use output::{Output, emit, project, to_json_string};
pub use select::{TrackFilter, select_max};
pub use view::View;
