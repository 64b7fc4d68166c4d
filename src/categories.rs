//! Category sources: the built-in network table, a TOML override, or a
//! directory listing discovered at runtime.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::feeds;
use crate::types::DirEntry;

/// A named token list and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySource {
    /// Known up front; no discovery request.
    Static(Vec<Category>),
    /// Enumerated from a directory listing.
    Discovered {
        listing_url: String,
        raw_base_url: String,
    },
}

impl CategorySource {
    pub fn is_static(&self) -> bool {
        matches!(self, CategorySource::Static(_))
    }
}

/// The four networks every build knows about.
pub fn builtin_table() -> Vec<Category> {
    feeds::STATIC_NETWORKS
        .iter()
        .map(|(name, file)| Category::new(*name, format!("{}{}", feeds::RAW_BASE_URL, file)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct CategoriesFile {
    categories: toml::Table,
}

/// Parse a `[categories]` table (`Name = "url"`), keeping declaration order.
pub fn parse_table_toml(contents: &str) -> Result<Vec<Category>> {
    let file: CategoriesFile = toml::from_str(contents).context("Invalid categories file")?;
    let mut out = Vec::with_capacity(file.categories.len());
    for (name, value) in file.categories {
        let url = value
            .as_str()
            .ok_or_else(|| anyhow!("Category '{name}' must map to a URL string"))?;
        out.push(Category::new(name, url));
    }
    if out.is_empty() {
        return Err(anyhow!("Categories file defines no categories"));
    }
    Ok(out)
}

pub fn load_table(path: &Path) -> Result<Vec<Category>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read categories file {}", path.display()))?;
    parse_table_toml(&contents)
}

/// Turn listing entries into categories: keep `*.json`, strip the extension.
pub fn from_listing(entries: &[DirEntry], raw_base_url: &str) -> Vec<Category> {
    let base = if raw_base_url.ends_with('/') {
        raw_base_url.to_string()
    } else {
        format!("{raw_base_url}/")
    };
    entries
        .iter()
        .filter_map(|e| {
            let stem = e.name.strip_suffix(".json")?;
            if stem.is_empty() {
                return None;
            }
            Some(Category::new(stem, format!("{base}{}", e.name)))
        })
        .collect()
}

/// Outcome of matching a requested category against the available ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Requested category exists under this canonical name.
    Found(String),
    /// Requested category missing or unknown; use this one and rewrite the route.
    Redirect(String),
    /// Nothing to select.
    Unavailable,
}

pub fn resolve(requested: Option<&str>, available: &[Category]) -> Resolution {
    let Some(first) = available.first() else {
        return Resolution::Unavailable;
    };
    let Some(requested) = requested else {
        return Resolution::Redirect(first.name.clone());
    };
    if let Some(c) = available.iter().find(|c| c.name == requested) {
        return Resolution::Found(c.name.clone());
    }
    if let Some(c) = available
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(requested))
    {
        return Resolution::Found(c.name.clone());
    }
    Resolution::Redirect(first.name.clone())
}

pub fn find<'a>(available: &'a [Category], name: &str) -> Option<&'a Category> {
    available.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> DirEntry {
        DirEntry { name: name.into() }
    }

    #[test]
    fn builtin_has_four_networks() {
        let t = builtin_table();
        let names: Vec<_> = t.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Ethereum", "Arbitrum", "Optimism", "Bsc"]);
        assert!(t[1].url.ends_with("/tokenlists/arbitrum.json"));
    }

    #[test]
    fn listing_keeps_json_and_strips_extension() {
        let entries = [entry("ethereum.json"), entry("README.md"), entry("polygon.json"), entry(".json")];
        let cats = from_listing(&entries, "https://raw.example/lists");
        assert_eq!(
            cats,
            vec![
                Category::new("ethereum", "https://raw.example/lists/ethereum.json"),
                Category::new("polygon", "https://raw.example/lists/polygon.json"),
            ]
        );
    }

    #[test]
    fn resolve_found_redirect_unavailable() {
        let cats = builtin_table();
        assert_eq!(resolve(Some("Bsc"), &cats), Resolution::Found("Bsc".into()));
        assert_eq!(resolve(Some("arbitrum"), &cats), Resolution::Found("Arbitrum".into()));
        assert_eq!(resolve(Some("Solana"), &cats), Resolution::Redirect("Ethereum".into()));
        assert_eq!(resolve(None, &cats), Resolution::Redirect("Ethereum".into()));
        assert_eq!(resolve(Some("Bsc"), &[]), Resolution::Unavailable);
    }

    #[test]
    fn toml_table_preserves_order() {
        let cats = parse_table_toml(
            r#"
            [categories]
            Polygon = "https://lists.test/polygon.json"
            Avalanche = "https://lists.test/avax.json"
            "#,
        )
        .unwrap();
        assert_eq!(cats[0].name, "Polygon");
        assert_eq!(cats[1].url, "https://lists.test/avax.json");
    }

    #[test]
    fn toml_rejects_non_string_and_empty() {
        assert!(parse_table_toml("[categories]\nPolygon = 1\n").is_err());
        assert!(parse_table_toml("[categories]\n").is_err());
    }
}
