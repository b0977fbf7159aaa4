use crate::domain::model::CatalogEntry;
use crate::domain::ports::CatalogLookup;
use crate::utils::error::{Result, SherpaError};
use std::io::Read;
use std::path::Path;

/// Catalog held in memory, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Showroom stock used when no catalog file is configured.
    pub fn dealership_stock() -> Self {
        let entry = |id: &str, name: &str, price: u64| CatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
            price,
            fuel: "petrol".to_string(),
        };

        Self::new(vec![
            entry("nexon", "Tata Nexon", 999_900),
            entry("creta", "Hyundai Creta", 1_399_000),
            entry("seltos", "Kia Seltos", 1_299_000),
        ])
    }

    /// Parse a CSV with the header `id,name,price,fuel`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize() {
            let entry: CatalogEntry = row?;
            if entry.id.is_empty() {
                return Err(SherpaError::validation("catalog row with empty id"));
            }
            entries.push(entry);
        }

        tracing::debug!("Loaded {} catalog entries", entries.len());
        Ok(Self::new(entries))
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Filter by brand (case-insensitive substring of the display name) and
    /// maximum price. A budget of zero means no budget filter.
    pub fn search(&self, brand: Option<&str>, budget_lt: Option<u64>) -> Vec<CatalogEntry> {
        let brand = brand
            .filter(|b| !b.is_empty())
            .map(|b| b.to_lowercase());
        let budget = budget_lt.filter(|b| *b > 0);

        self.entries
            .iter()
            .filter(|car| match &brand {
                Some(brand) => car.name.to_lowercase().contains(brand),
                None => true,
            })
            .filter(|car| budget.map_or(true, |budget| car.price <= budget))
            .cloned()
            .collect()
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn lookup(&self, model_id: &str) -> Option<CatalogEntry> {
        self.entries.iter().find(|car| car.id == model_id).cloned()
    }
}
