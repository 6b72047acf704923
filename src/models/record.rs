use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// Identifies a record in a store: national dex number or lowercase name.
///
/// The display form doubles as the storage stem (`25.json`, `pikachu.png`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Id(u32),
    Name(String),
}

impl RecordKey {
    /// Parse user input: all digits is an id, anything else a name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(id) => RecordKey::Id(id),
            Err(_) => RecordKey::Name(trimmed.to_lowercase()),
        }
    }

    /// Whether this key refers to `record`.
    pub fn matches(&self, record: &EntityRecord) -> bool {
        match self {
            RecordKey::Id(id) => record.id == *id,
            RecordKey::Name(name) => record.name.eq_ignore_ascii_case(name),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "{id}"),
            RecordKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for RecordKey {
    fn from(id: u32) -> Self {
        RecordKey::Id(id)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey::parse(s)
    }
}

/// A category (type) slot of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub slot: u32,
    pub name: String,
}

/// Everything the composer needs to know about one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: u32,
    pub name: String,
    /// Ordered by slot
    pub categories: Vec<Category>,
    /// Normalized and deduplicated, first-seen order
    pub description_candidates: Vec<String>,
}

impl EntityRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            categories: Vec::new(),
            description_candidates: Vec::new(),
        }
    }

    pub fn with_category(mut self, slot: u32, name: impl Into<String>) -> Self {
        self.categories.push(Category {
            slot,
            name: name.into(),
        });
        self.categories.sort_by_key(|c| c.slot);
        self
    }

    /// Add description candidates, normalizing whitespace and skipping repeats.
    pub fn with_descriptions<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.description_candidates.iter().cloned().collect();
        for text in texts {
            let normalized = normalize_whitespace(text.as_ref());
            if !normalized.is_empty() && seen.insert(normalized.clone()) {
                self.description_candidates.push(normalized);
            }
        }
        self
    }

    /// Name with the first letter upper-cased, as shown on the display.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Parse a PokeAPI `pokemon-species`-style document, keeping flavor texts
    /// in `language` only.
    pub fn from_pokeapi_json(json: &str, language: &str) -> Result<Self, serde_json::Error> {
        let doc: PokeApiDocument = serde_json::from_str(json)?;

        let mut record = EntityRecord::new(doc.id, doc.name);
        for entry in doc.types {
            record = record.with_category(entry.slot, entry.kind.name);
        }
        let texts = doc
            .flavor_text_entries
            .into_iter()
            .filter(|e| e.language.name == language)
            .map(|e| e.flavor_text);
        Ok(record.with_descriptions(texts))
    }
}

/// Whether `stem` can be joined onto a directory as a plain file name:
/// non-empty, not `.` or `..`, and free of path separators and NUL.
pub fn is_safe_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem != "."
        && stem != ".."
        && !stem.contains(['/', '\\', ':', '\0'])
}

/// Collapse every run of whitespace, including newlines and form feeds, to a
/// single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Deserialize)]
struct PokeApiDocument {
    id: u32,
    name: String,
    #[serde(default)]
    types: Vec<PokeApiTypeSlot>,
    #[serde(default)]
    flavor_text_entries: Vec<PokeApiFlavorText>,
}

#[derive(Deserialize)]
struct PokeApiTypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    kind: PokeApiNamed,
}

#[derive(Deserialize)]
struct PokeApiFlavorText {
    flavor_text: String,
    language: PokeApiNamed,
}

#[derive(Deserialize)]
struct PokeApiNamed {
    name: String,
}
