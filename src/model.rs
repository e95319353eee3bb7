use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

/// Response of `edits.tracks.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track name as reported by the service ("production", "beta", ...).
    #[serde(default)]
    pub track: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<Release>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "codes_as_strings",
        deserialize_with = "codes_from_strings_or_numbers"
    )]
    pub version_codes: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackListing {
    /// JSON form of the listing with version codes as numbers rather than the
    /// strings the API uses.
    pub fn to_numeric_value(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        for (t, track) in self.tracks.iter().enumerate() {
            for (r, release) in track.releases.iter().enumerate() {
                let pointer = format!("/tracks/{t}/releases/{r}/versionCodes");
                if let Some(codes) = value.pointer_mut(&pointer) {
                    *codes = Value::from(release.version_codes.clone());
                }
            }
        }
        Ok(value)
    }
}

impl Track {
    pub fn new(name: impl Into<String>, releases: Vec<Release>) -> Self {
        Self {
            track: name.into(),
            releases,
            extra: Map::new(),
        }
    }
}

impl Release {
    pub fn new(name: impl Into<String>, version_codes: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            version_codes,
            extra: Map::new(),
        }
    }
}

// The API encodes int64 fields as JSON strings.
fn codes_as_strings<S: Serializer>(codes: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(codes.iter().map(|c| c.to_string()))
}

fn codes_from_strings_or_numbers<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i64),
        Text(String),
    }

    Vec::<Code>::deserialize(deserializer)?
        .into_iter()
        .map(|c| match c {
            Code::Number(n) => Ok(n),
            Code::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| de::Error::custom(format!("invalid version code {s:?}: {e}"))),
        })
        .collect()
}

/// Highest version code found under a track filter.
///
/// The zero value means nothing matched; every field is then omitted when
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub track: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub code: i64,
}

fn is_zero(code: &i64) -> bool {
    *code == 0
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
