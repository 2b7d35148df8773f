//! Reading recipes and writing JSON artefacts.

use crate::error::CliError;
use powerbox_core::{Field, Recipe, TracerCatalogue};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// A realised field together with the recipe that reproduces it.
#[derive(Serialize)]
pub struct FieldDocument<'a> {
    pub recipe: &'a Recipe,
    pub field: &'a Field,
}

/// A tracer catalogue together with the recipe that reproduces it.
#[derive(Serialize)]
pub struct CatalogueDocument<'a> {
    pub recipe: &'a Recipe,
    pub nbar: f64,
    pub catalogue: &'a TracerCatalogue,
}

/// Loads a recipe from a JSON file.
pub fn read_recipe(path: &Path) -> Result<Recipe, CliError> {
    let file = File::open(path)
        .map_err(|e| CliError::Io(format!("failed to open {}: {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CliError::Input(format!("invalid recipe {}: {e}", path.display())))
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), CliError> {
    let file = File::create(path)
        .map_err(|e| CliError::Io(format!("failed to create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer
        .flush()
        .map_err(|e| CliError::Io(format!("failed to write {}: {e}", path.display())))
}
