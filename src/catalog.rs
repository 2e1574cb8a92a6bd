use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// 24-bit fill color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Fill used for countries that are not in the catalog
    pub const NEUTRAL: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    /// Country border stroke
    pub const STROKE: Rgb = Rgb(0xD1, 0xD5, 0xDB);
    /// Border stroke of the hovered country
    pub const STROKE_HOVER: Rgb = Rgb(0x6B, 0x72, 0x80);
    /// Ocean / page background
    pub const BACKGROUND: Rgb = Rgb(0xF8, 0xF9, 0xFB);
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a #RRGGBB color, got {0:?}")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Revenue figures for one country
#[derive(Clone, Debug, PartialEq)]
pub struct CountryRecord {
    /// ISO-3166 alpha-3 code
    pub code: String,
    pub display_name: String,
    pub revenue_amount: u64,
    pub fill_color: Rgb,
    pub flag_glyph: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid country code {0:?} (expected three uppercase letters)")]
    InvalidCode(String),
    #[error("invalid color for {code}: {source}")]
    InvalidColor {
        code: String,
        #[source]
        source: ColorParseError,
    },
    #[error("country {0} is listed more than once")]
    Duplicate(String),
}

/// On-disk layout: a list of `[[country]]` tables
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "country")]
    countries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    code: String,
    name: String,
    revenue: u64,
    color: String,
    flag: String,
}

/// Immutable code -> record table. Built once at startup and shared.
#[derive(Clone, Debug, Default)]
pub struct RevenueCatalog {
    records: HashMap<String, CountryRecord>,
}

impl RevenueCatalog {
    /// The five countries shipped with the dashboard
    pub fn builtin() -> Self {
        const ENTRIES: [(&str, &str, u64, Rgb, &str); 5] = [
            ("CAN", "Canada", 4281, Rgb(0x9D, 0xCE, 0xDC), "🇨🇦"),
            ("DEU", "Germany", 2281, Rgb(0xA3, 0xB4, 0xD4), "🇩🇪"),
            ("IND", "India", 27360, Rgb(0xB8, 0xA7, 0xDC), "🇮🇳"),
            ("BRA", "Brazil", 27360, Rgb(0x8F, 0xD4, 0xA0), "🇧🇷"),
            ("AUS", "Australia", 16001, Rgb(0xFF, 0xE5, 0x99), "🇦🇺"),
        ];

        let records = ENTRIES
            .iter()
            .map(|&(code, name, revenue, color, flag)| {
                let record = CountryRecord {
                    code: code.to_string(),
                    display_name: name.to_string(),
                    revenue_amount: revenue,
                    fill_color: color,
                    flag_glyph: flag.to_string(),
                };
                (record.code.clone(), record)
            })
            .collect();

        Self { records }
    }

    /// Build a catalog from records, rejecting malformed or repeated codes
    pub fn from_records(records: impl IntoIterator<Item = CountryRecord>) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for record in records {
            if !is_alpha3(&record.code) {
                return Err(CatalogError::InvalidCode(record.code));
            }
            if map.contains_key(&record.code) {
                return Err(CatalogError::Duplicate(record.code));
            }
            map.insert(record.code.clone(), record);
        }
        Ok(Self { records: map })
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;

        let mut records = Vec::with_capacity(file.countries.len());
        for entry in file.countries {
            let fill_color = entry.color.parse().map_err(|source| CatalogError::InvalidColor {
                code: entry.code.clone(),
                source,
            })?;
            records.push(CountryRecord {
                code: entry.code,
                display_name: entry.name,
                revenue_amount: entry.revenue,
                fill_color,
                flag_glyph: entry.flag,
            });
        }

        Self::from_records(records)
    }

    /// Read and parse a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Exact-match lookup. Absence is the normal case for most countries.
    #[inline]
    pub fn lookup(&self, code: &str) -> Option<&CountryRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_alpha3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
