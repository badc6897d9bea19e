//! Block catalog: the closed set of Markdown templates a README is built from

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::CatalogConfig;

const BUILTIN_CATALOG: &str = include_str!("../catalog/blocks.toml");

/// Section of the catalog a template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Project,
    Personal,
}

impl Category {
    fn as_str(&self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Personal => "personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Ok(Category::Project),
            "personal" => Ok(Category::Personal),
            other => anyhow::bail!("unknown category '{}' (expected project or personal)", other),
        }
    }
}

/// Shape of a template. Carried as metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Single,
    Composite,
}

/// A named, immutable unit of predefined Markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub kind: BlockKind,
    pub markdown: String,
}

impl BlockTemplate {
    pub fn new(name: impl Into<String>, category: Category, markdown: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            kind: BlockKind::Single,
            markdown: markdown.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "block", default)]
    blocks: Vec<BlockTemplate>,
}

/// Ordered, name-unique collection of block templates
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<BlockTemplate>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG).context("Failed to parse builtin block catalog")
    }

    /// Parse a catalog from `[[block]]` TOML tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::from_templates(file.blocks))
    }

    /// Load a user catalog file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
    }

    /// Build the catalog described by the configuration
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut catalog = if config.include_builtin {
            Self::builtin()?
        } else {
            Self::default()
        };

        if let Some(path) = &config.path {
            catalog.merge(Self::load_from(path)?);
        }

        Ok(catalog)
    }

    /// Collect templates, collapsing duplicate names.
    ///
    /// A later template with a name already seen replaces the earlier one but
    /// keeps the earlier position.
    pub fn from_templates(templates: impl IntoIterator<Item = BlockTemplate>) -> Self {
        let mut catalog = Self::default();
        for template in templates {
            catalog.upsert(template);
        }
        catalog
    }

    /// Overlay another catalog on top of this one (same-name entries win)
    pub fn merge(&mut self, other: Catalog) {
        for template in other.templates {
            self.upsert(template);
        }
    }

    fn upsert(&mut self, template: BlockTemplate) {
        match self.by_name.get(&template.name) {
            Some(&idx) => {
                log::warn!("duplicate catalog block '{}', keeping the last definition", template.name);
                self.templates[idx] = template;
            }
            None => {
                self.by_name.insert(template.name.clone(), self.templates.len());
                self.templates.push(template);
            }
        }
    }

    /// Templates in catalog order, optionally restricted to one category.
    ///
    /// A category with no templates yields an empty list.
    pub fn list_templates(&self, filter: Option<Category>) -> Vec<&BlockTemplate> {
        self.templates
            .iter()
            .filter(|t| filter.map_or(true, |category| t.category == category))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&BlockTemplate> {
        self.by_name.get(name).map(|&idx| &self.templates[idx])
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for template in &self.templates {
            if !seen.contains(&template.category) {
                seen.push(template.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
