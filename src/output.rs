use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::Result,
    model::{SelectionResult, TrackListing},
};

/// Log target for projection warnings. Always enabled, whatever `RUST_LOG` says.
pub const PROJECTION_LOG_TARGET: &str = "playtracks::projection";

/// A rendered view, ready to be projected and written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Selection(SelectionResult),
    Listing(TrackListing),
    Projected(Value),
}

/// Re-shapes `output` with a JMESPath expression.
///
/// An empty expression leaves the output alone. A bad expression is logged
/// and the unprojected output is returned, so a typo never hides the result.
pub fn project(output: Output, expr: &str) -> Output {
    if expr.is_empty() {
        return output;
    }
    match search(&output, expr) {
        Ok(value) => Output::Projected(value),
        Err(e) => {
            tracing::warn!(target: PROJECTION_LOG_TARGET, "{e}, expr={expr:?}");
            output
        }
    }
}

fn search(output: &Output, expr: &str) -> std::result::Result<Value, String> {
    let compiled = jmespath::compile(expr).map_err(|e| e.to_string())?;
    // Codes go in as numbers so expressions like max() compare them numerically.
    let data = match output {
        Output::Listing(listing) => listing.to_numeric_value(),
        other => serde_json::to_value(other),
    }
    .map_err(|e| e.to_string())?;
    let found = compiled.search(&data).map_err(|e| e.to_string())?;
    serde_json::to_value(&*found).map_err(|e| e.to_string())
}

/// Writes `output` as indented JSON followed by a newline.
pub fn emit<W: Write>(output: &Output, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, output)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Renders `output` to a string, the same way [`emit`] writes it.
pub fn to_json_string(output: &Output) -> Result<String> {
    let mut buf = Vec::new();
    emit(output, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
