use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use strum_macros::Display;

/// One level of the PSGC hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Region,
    Province,
    City,
    Barangay,
}

impl Level {
    /// Collection name used both as the endpoint segment and as the cache key prefix.
    pub fn collection(self) -> &'static str {
        match self {
            Level::Region => "regions",
            Level::Province => "provinces",
            Level::City => "cities",
            Level::Barangay => "barangays",
        }
    }

    /// The level whose code selects this collection, if any.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Region => None,
            Level::Province => Some(Level::Region),
            Level::City => Some(Level::Province),
            Level::Barangay => Some(Level::City),
        }
    }

    /// `"regions"` or `"<collection>-<parentCode>"`.
    pub fn cache_key(self, parent_code: Option<&str>) -> String {
        match parent_code {
            Some(code) => format!("{}-{}", self.collection(), code),
            None => self.collection().to_string(),
        }
    }

    pub fn endpoint(self, parent_code: Option<&str>) -> String {
        match parent_code {
            Some(code) => format!("/{}/{}", self.collection(), urlencoding::encode(code)),
            None => format!("/{}", self.collection()),
        }
    }
}

/// Common view over the four record types.
///
/// Records are passthrough payloads: apart from `name`, every field stays in the raw map
/// exactly as the API sent it, so re-serializing a record reproduces its input.
pub trait Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const LEVEL: Level;
    /// Keys that may carry the record's own code, in lookup order.
    const CODE_FIELDS: &'static [&'static str];

    fn name(&self) -> &str;
    fn fields(&self) -> &Map<String, Value>;

    /// The record's code, or `""` when the payload carries none.
    ///
    /// Numeric codes are rendered in their JSON form.
    fn code(&self) -> Cow<'_, str> {
        Self::CODE_FIELDS
            .iter()
            .find_map(|key| text_field(self.fields(), key))
            .unwrap_or(Cow::Borrowed(""))
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<Cow<'a, str>> {
    match fields.get(key)? {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        _ => None,
    }
}

fn flag_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Province {
    pub fn region_code(&self) -> Option<Cow<'_, str>> {
        text_field(&self.extra, "regionCode")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl City {
    pub fn province_code(&self) -> Option<Cow<'_, str>> {
        text_field(&self.extra, "provinceCode")
    }

    pub fn is_capital(&self) -> Option<bool> {
        flag_field(&self.extra, "isCapital")
    }

    pub fn is_city(&self) -> Option<bool> {
        flag_field(&self.extra, "isCity")
    }

    pub fn is_municipality(&self) -> Option<bool> {
        flag_field(&self.extra, "isMunicipality")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barangay {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Barangay {
    pub fn city_code(&self) -> Option<Cow<'_, str>> {
        text_field(&self.extra, "cityCode")
    }
}

impl Record for Region {
    const LEVEL: Level = Level::Region;
    const CODE_FIELDS: &'static [&'static str] = &["psgcCode", "code", "id"];

    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Record for Province {
    const LEVEL: Level = Level::Province;
    const CODE_FIELDS: &'static [&'static str] = &["id", "code", "psgcCode"];

    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Record for City {
    const LEVEL: Level = Level::City;
    const CODE_FIELDS: &'static [&'static str] = &["id", "code", "psgcCode"];

    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Record for Barangay {
    const LEVEL: Level = Level::Barangay;
    const CODE_FIELDS: &'static [&'static str] = &["id", "code", "psgcCode"];

    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}
