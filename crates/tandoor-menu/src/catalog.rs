//! Catalog loading and lookup.
//!
//! Loaded once at process start from TOML and immutable thereafter. A
//! default menu is bundled with the crate and used when no path is
//! configured.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::MenuError;
use crate::normalize;

/// Bundled default menu, used when no `menu.path` is configured.
const DEFAULT_MENU_TOML: &str = include_str!("../menu.toml");

/// On-disk menu shape. Prices are strings so they parse as exact decimals
/// rather than going through a float.
#[derive(Debug, Deserialize)]
struct MenuFile {
    tax_rate: Decimal,
    #[serde(default)]
    spice_keywords: Vec<String>,
    #[serde(default)]
    items: BTreeMap<String, Decimal>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// The static menu catalog: canonical items with prices, alias phrasings,
/// and the keyword rule for spice-required items.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: BTreeMap<String, Decimal>,
    aliases: BTreeMap<String, String>,
    spice_keywords: Vec<String>,
    tax_rate: Decimal,
}

impl MenuCatalog {
    /// Loads a catalog from the given TOML file, or the bundled default
    /// menu when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `MenuError` if the file cannot be read or parsed, or if the
    /// menu fails validation.
    pub fn load(path: Option<&str>) -> Result<Self, MenuError> {
        match path {
            Some(p) => {
                let contents = std::fs::read_to_string(p)?;
                Self::from_toml_str(&contents)
            }
            None => Self::from_toml_str(DEFAULT_MENU_TOML),
        }
    }

    /// Parses and validates a catalog from TOML text.
    ///
    /// Validation rules: all prices positive, every alias target must be a
    /// canonical item, and no alias may be keyed by a canonical name
    /// (canonical names never self-map).
    pub fn from_toml_str(contents: &str) -> Result<Self, MenuError> {
        let file: MenuFile = toml::from_str(contents)?;

        let items: BTreeMap<String, Decimal> = file
            .items
            .into_iter()
            .map(|(name, price)| (name.trim().to_lowercase(), price))
            .collect();
        let aliases: BTreeMap<String, String> = file
            .aliases
            .into_iter()
            .map(|(alias, target)| (alias.trim().to_lowercase(), target.trim().to_lowercase()))
            .collect();

        if items.is_empty() {
            return Err(MenuError::Invalid("menu has no items".to_string()));
        }
        for (name, price) in &items {
            if *price <= Decimal::ZERO {
                return Err(MenuError::Invalid(format!(
                    "item '{name}' has non-positive price {price}"
                )));
            }
        }
        for (alias, target) in &aliases {
            if !items.contains_key(target) {
                return Err(MenuError::Invalid(format!(
                    "alias '{alias}' points at unknown item '{target}'"
                )));
            }
            if items.contains_key(alias) {
                return Err(MenuError::Invalid(format!(
                    "alias '{alias}' shadows a canonical item"
                )));
            }
        }
        if file.tax_rate < Decimal::ZERO || file.tax_rate >= Decimal::ONE {
            return Err(MenuError::Invalid(format!(
                "tax rate {} out of range",
                file.tax_rate
            )));
        }

        Ok(Self {
            items,
            aliases,
            spice_keywords: file
                .spice_keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
            tax_rate: file.tax_rate,
        })
    }

    /// Unit price for a canonical name, if present.
    pub fn price(&self, canonical: &str) -> Option<Decimal> {
        self.items.get(canonical).copied()
    }

    /// Whether the canonical name mandates a spice-level modifier.
    ///
    /// Evaluated on the canonical name, never on a raw alias.
    pub fn requires_spice(&self, canonical: &str) -> bool {
        self.spice_keywords
            .iter()
            .any(|keyword| canonical.contains(keyword.as_str()))
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Iterates all alias → canonical pairs.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    /// Iterates all canonical names.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Resolves free speech text to a canonical name.
    ///
    /// See [`normalize::clean_item_text`] for the cleanup pipeline. The
    /// cleaned text is looked up in the alias table first, then directly in
    /// the item table; a trailing plural "s" is retried once. Returns
    /// `None` when nothing matches.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        let cleaned = normalize::clean_item_text(text);
        if cleaned.is_empty() {
            return None;
        }
        if let Some(found) = self.lookup(&cleaned) {
            return Some(found);
        }
        // Simple plural: "samosas" -> "samosa".
        cleaned
            .strip_suffix('s')
            .and_then(|singular| self.lookup(singular))
    }

    /// [`resolve`](Self::resolve) plus the price lookup in one step.
    pub fn resolve_priced(&self, text: &str) -> Option<(&str, Decimal)> {
        let name = self.resolve(text)?;
        let price = self.price(name)?;
        Some((name, price))
    }

    fn lookup(&self, cleaned: &str) -> Option<&str> {
        if let Some(target) = self.aliases.get(cleaned) {
            return Some(target.as_str());
        }
        self.items
            .get_key_value(cleaned)
            .map(|(name, _)| name.as_str())
    }

    /// Nearest-neighbor suggestion for an unresolved phrase, by shared
    /// word count against canonical names. Used only in log lines.
    pub fn suggest(&self, text: &str) -> Option<&str> {
        let cleaned = normalize::clean_item_text(text);
        let words: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|w| w.len() > 2)
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut best: Option<(&str, usize)> = None;
        for name in self.items.keys() {
            let shared = words.iter().filter(|w| name.contains(*w)).count();
            if shared > 0 && best.map_or(true, |(_, count)| shared > count) {
                best = Some((name.as_str(), shared));
            }
        }
        best.map(|(name, _)| name)
    }
}
