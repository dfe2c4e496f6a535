//! Country folder discovery
//!
//! A country is any directory under the data directory that has a `data/` subfolder. The
//! places table is the first `*_places.csv` file (by name) inside that subfolder.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const DATA_SUBDIR: &str = "data";
const PLACES_SUFFIX: &str = "_places.csv";

/// A discovered country folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    /// 1-based position in the sorted listing
    pub number: usize,
    /// Display name: the folder name capitalized
    pub name: String,
    pub dir: PathBuf,
}

impl Country {
    pub fn data_dir(&self) -> PathBuf {
        self.dir.join(DATA_SUBDIR)
    }

    /// First `*_places.csv` in the country's data folder
    pub fn places_file(&self) -> Result<Option<PathBuf>> {
        find_places_file(&self.data_dir())
    }
}

/// List country folders under `root`, sorted by folder name and numbered from 1
pub fn discover_countries(root: &Path) -> Result<Vec<Country>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read data directory {}", root.display()))?;

    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.join(DATA_SUBDIR).is_dir() {
            continue;
        }
        let folder = entry.file_name().to_string_lossy().into_owned();
        dirs.push((folder, path));
    }
    dirs.sort();

    Ok(dirs
        .into_iter()
        .enumerate()
        .map(|(i, (folder, dir))| Country { number: i + 1, name: capitalize(&folder), dir })
        .collect())
}

/// Find a country by its number or by name (case-insensitive)
pub fn resolve<'a>(countries: &'a [Country], selector: &str) -> Option<&'a Country> {
    let selector = selector.trim();
    if let Ok(number) = selector.parse::<usize>() {
        return countries.iter().find(|c| c.number == number);
    }
    let wanted = selector.to_lowercase();
    countries.iter().find(|c| c.name.to_lowercase() == wanted)
}

/// First `*_places.csv` (by file name) in `dir`, if any
pub fn find_places_file(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(PLACES_SUFFIX))
        })
        .collect();
    candidates.sort();

    Ok(candidates.into_iter().next())
}

/// Country name implied by a `<country>_places.csv` file name
pub fn country_from_places_file(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let country = name.strip_suffix(PLACES_SUFFIX)?;
    if country.is_empty() {
        None
    } else {
        Some(capitalize(country))
    }
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
