use std::fs;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_CATALOG: &str = include_str!("../data/sample_catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Textbook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

/// Read-only textbook collection, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub textbooks: Vec<Textbook>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Catalog {
    /// Loads the catalog at `path`, or the bundled sample when no path is configured.
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.to_string(),
                    source,
                })?;
                let catalog = Self::from_json_str(&raw)?;
                tracing::info!(
                    path,
                    textbooks = catalog.textbooks.len(),
                    units = catalog.total_units(),
                    "Catalog loaded"
                );
                Ok(catalog)
            }
            None => Self::bundled(),
        }
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn textbook(&self, textbook_id: &str) -> Option<&Textbook> {
        self.textbooks.iter().find(|book| book.id == textbook_id)
    }

    pub fn find_unit(&self, textbook_id: &str, unit_id: &str) -> Option<(&Textbook, &Unit)> {
        let book = self.textbook(textbook_id)?;
        let unit = book.units.iter().find(|unit| unit.id == unit_id)?;
        Some((book, unit))
    }

    /// Looks a unit up by id alone; progress maps are keyed without the textbook.
    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.textbooks
            .iter()
            .flat_map(|book| book.units.iter())
            .find(|unit| unit.id == unit_id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.textbooks.iter().flat_map(|book| book.units.iter())
    }

    pub fn total_units(&self) -> usize {
        self.textbooks.iter().map(|book| book.units.len()).sum()
    }
}
