//! Invariant catalog parsing.
//!
//! Catalog layout:
//!
//! ```text
//! ===========================================================================
//! ..foo(int):::ENTER
//! x > 0
//! ===========================================================================
//! ..foo(int):::EXIT
//! x == orig(x)
//! Exiting Daikon.
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::errors::{ValidatorError, ValidatorResult};
use crate::domain::models::{Invariant, InvariantCatalog, ProgramPoint};
use crate::services::predicate_classifier::classify;

/// Load and parse a catalog file.
pub fn load_catalog(path: &Path) -> ValidatorResult<InvariantCatalog> {
    let unreadable = |source| ValidatorError::CatalogUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let catalog = parse_catalog(BufReader::new(file)).map_err(unreadable)?;

    tracing::info!(
        path = %path.display(),
        points = catalog.point_count(),
        invariants = catalog.invariant_count(),
        "Loaded invariant catalog"
    );
    Ok(catalog)
}

/// Parse a catalog from any line source.
pub fn parse_catalog(reader: impl BufRead) -> std::io::Result<InvariantCatalog> {
    let mut in_section = false;
    let mut current: Option<ProgramPoint> = None;
    let mut entries: HashMap<ProgramPoint, Vec<Invariant>> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.starts_with("==") {
            in_section = true;
        } else if line.starts_with("Exiting") {
            break;
        } else if !in_section || line.trim().is_empty() {
            continue;
        } else if let Some(point) = ProgramPoint::parse_header(line) {
            entries.insert(point.clone(), Vec::new());
            current = Some(point);
        } else if let Some(point) = &current {
            let (predicate, kind) = classify(line);
            if let Some(list) = entries.get_mut(point) {
                list.push(Invariant::new(predicate, kind));
            }
        } else {
            tracing::warn!(
                line = index + 1,
                predicate = line,
                "Predicate before any program point header, skipping"
            );
        }
    }

    Ok(InvariantCatalog::new(entries))
}
