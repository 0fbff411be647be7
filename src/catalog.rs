//! # Ingredient Catalog
//!
//! Parses the delimited reference table of known ingredients and keeps it
//! loaded for the lifetime of the process.
//!
//! ## Resource Format
//!
//! ```text
//! e_code,status,name_ru,name_en,note
//! E471,halal,"Моно- и диглицериды",Mono- and diglycerides,
//! ,haram,Желатин свиной,Pork gelatin,"Из свиной кожи, костей"
//! ```
//!
//! Fields may be double-quoted to embed commas. Rows with fewer than four
//! fields or an unrecognized status keyword are skipped. A resource with no
//! data rows is rejected as a whole.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::{error_logging, CatalogLoadError};
use crate::matcher::NamePattern;
use crate::models::{Ingredient, IngredientId, IngredientStatus};
use crate::observability;

/// Field delimiter of the catalog resource
pub const FIELD_DELIMITER: char = ',';
/// Quote character toggling literal mode for the delimiter
pub const QUOTE: char = '"';
/// Minimum number of fields a data row needs
pub const MIN_ROW_FIELDS: usize = 4;

/// Split one catalog line into trimmed fields, honoring quoted spans
///
/// Every quote character toggles the in-quotes state and is dropped; while
/// inside quotes the delimiter is kept literally.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE => inside_quotes = !inside_quotes,
            FIELD_DELIMITER if !inside_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Catalog record together with its precompiled name patterns
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    ingredient: Ingredient,
    names: Vec<NamePattern>,
}

impl CatalogEntry {
    fn new(ingredient: Ingredient) -> Self {
        let names = [&ingredient.name_ru, &ingredient.name_en]
            .into_iter()
            .filter_map(|name| NamePattern::compile(name))
            .collect();
        Self { ingredient, names }
    }

    pub fn ingredient(&self) -> &Ingredient {
        &self.ingredient
    }

    /// Compiled Russian and English names (blank names are omitted)
    pub fn names(&self) -> &[NamePattern] {
        &self.names
    }
}

/// Read-only collection of known ingredients
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// Upper-cased code -> index of the first entry carrying it
    code_index: HashMap<String, usize>,
    skipped_rows: usize,
}

impl Catalog {
    /// A catalog with no entries; analysis against it detects nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the full text of a catalog resource
    pub fn parse(text: &str) -> Result<Self, CatalogLoadError> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        if lines.len() <= 1 {
            return Err(CatalogLoadError::InvalidFormat(format!(
                "expected a header and at least one data row, found {} line(s)",
                lines.len()
            )));
        }

        let mut ingredients = Vec::with_capacity(lines.len() - 1);
        let mut skipped_rows = 0;

        for (line_number, line) in lines.iter().enumerate().skip(1) {
            match parse_row(line, ingredients.len()) {
                Some(ingredient) => ingredients.push(ingredient),
                None => {
                    debug!(line_number, line = %line, "Skipping malformed catalog row");
                    skipped_rows += 1;
                }
            }
        }

        let mut catalog = Self::from_ingredients(ingredients);
        catalog.skipped_rows = skipped_rows;
        Ok(catalog)
    }

    /// Build a catalog from already parsed records, reassigning ids in order
    pub fn from_ingredients(ingredients: Vec<Ingredient>) -> Self {
        let mut code_index = HashMap::new();
        let entries: Vec<CatalogEntry> = ingredients
            .into_iter()
            .enumerate()
            .map(|(index, mut ingredient)| {
                ingredient.id = IngredientId(index as u32);
                if let Some(code) = ingredient.canonical_code() {
                    code_index.entry(code).or_insert(index);
                }
                CatalogEntry::new(ingredient)
            })
            .collect();

        Self {
            entries,
            code_index,
            skipped_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of data rows dropped while parsing
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn get(&self, id: IngredientId) -> Option<&Ingredient> {
        self.entries.get(id.0 as usize).map(CatalogEntry::ingredient)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.entries.iter().map(CatalogEntry::ingredient)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an ingredient by additive code, case-insensitively
    pub fn find_by_code(&self, code: &str) -> Option<&Ingredient> {
        self.code_index
            .get(&code.trim().to_uppercase())
            .and_then(|&index| self.entries.get(index))
            .map(CatalogEntry::ingredient)
    }
}

fn parse_row(line: &str, index: usize) -> Option<Ingredient> {
    let mut fields = parse_line(line).into_iter();
    if fields.len() < MIN_ROW_FIELDS {
        return None;
    }

    let e_code = fields.next().filter(|code| !code.is_empty());
    let status = IngredientStatus::from_keyword(&fields.next()?)?;
    let name_ru = fields.next()?;
    let name_en = fields.next()?;
    let note = fields.next().filter(|note| !note.is_empty());

    Some(Ingredient {
        id: IngredientId(index as u32),
        e_code,
        status,
        name_ru,
        name_en,
        note,
    })
}

/// Where the catalog text comes from
pub trait CatalogSource: Send + Sync {
    /// Human-readable description used in logs
    fn describe(&self) -> String;

    /// Read the whole resource as UTF-8 text
    fn read_to_string(&self) -> Result<String, CatalogLoadError>;
}

/// Catalog stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_to_string(&self) -> Result<String, CatalogLoadError> {
        if !self.path.exists() {
            return Err(CatalogLoadError::NotFound(self.describe()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Catalog text held in memory (bundled data, tests)
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    name: String,
    text: Arc<str>,
}

impl StaticCatalogSource {
    pub fn new(name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn read_to_string(&self) -> Result<String, CatalogLoadError> {
        Ok(self.text.to_string())
    }
}

/// Loads the catalog at most once and shares it afterwards
///
/// Concurrent callers of [`CatalogLoader::load`] wait on the same in-flight
/// parse. A failed attempt leaves the loader empty so a later call retries.
/// Reading and parsing run on the blocking thread pool.
pub struct CatalogLoader<S: CatalogSource + 'static> {
    source: Arc<S>,
    catalog: OnceCell<Arc<Catalog>>,
}

impl<S: CatalogSource + 'static> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            catalog: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// The catalog if it has already been loaded
    pub fn get(&self) -> Option<Arc<Catalog>> {
        self.catalog.get().cloned()
    }

    /// Load the catalog, or return the cached one
    pub async fn load(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let source = Arc::clone(&self.source);
                tokio::task::spawn_blocking(move || load_from(&*source))
                    .await
                    .map_err(|e| {
                        error_logging::log_internal_error(&e, "catalog", "load");
                        CatalogLoadError::ReadFailed(format!("catalog load task failed: {}", e))
                    })?
            })
            .await?;
        Ok(Arc::clone(catalog))
    }
}

fn load_from<S: CatalogSource>(source: &S) -> Result<Arc<Catalog>, CatalogLoadError> {
    let description = source.describe();
    let result = source
        .read_to_string()
        .and_then(|text| Catalog::parse(&text));

    match result {
        Ok(catalog) => {
            info!(
                source = %description,
                ingredients = catalog.len(),
                skipped_rows = catalog.skipped_rows(),
                "Ingredient catalog loaded"
            );
            observability::record_catalog_load_metrics(true, catalog.skipped_rows());
            Ok(Arc::new(catalog))
        }
        Err(e) => {
            error_logging::log_catalog_error(&e, "load", &description);
            observability::record_catalog_load_metrics(false, 0);
            Err(e)
        }
    }
}
