use std::collections::BTreeMap;

use crate::fields::{FieldId, Selection, ValueSource};
use crate::provider::{Catalog, ComputationProvider, ProviderError};

/// Design codes that borrow another code's catalog.
///
/// The substitution applies to catalog lookups only. A field holding an
/// aliased code keeps reporting the code the user picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignCodeAliases {
    aliases: BTreeMap<String, String>,
}

impl DesignCodeAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, code: impl Into<String>, uses: impl Into<String>) -> Self {
        self.aliases.insert(code.into(), uses.into());
        self
    }

    /// The code whose catalog `code` should be looked up in.
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.aliases.get(code).map(String::as_str).unwrap_or(code)
    }
}

/// Item names drawn from provider catalogs, keyed by a design-code field and
/// a category field.
#[derive(Debug, Clone)]
pub struct CatalogValues {
    code_field: FieldId,
    category_field: FieldId,
    aliases: DesignCodeAliases,
    catalogs: BTreeMap<String, Catalog>,
}

impl CatalogValues {
    /// Fetch the catalog of every code in `design_codes` that is not an alias.
    ///
    /// This is the one-time setup a catalog-backed panel performs when it is
    /// first activated.
    pub fn load<'a>(
        provider: &dyn ComputationProvider,
        design_codes: impl IntoIterator<Item = &'a str>,
        aliases: DesignCodeAliases,
        code_field: impl Into<FieldId>,
        category_field: impl Into<FieldId>,
    ) -> Result<Self, ProviderError> {
        let mut catalogs = BTreeMap::new();
        for code in design_codes {
            let resolved = aliases.resolve(code);
            if !catalogs.contains_key(resolved) {
                catalogs.insert(resolved.to_string(), provider.list_catalog_names(resolved)?);
            }
        }
        Ok(Self {
            code_field: code_field.into(),
            category_field: category_field.into(),
            aliases,
            catalogs,
        })
    }

    pub fn names(&self, design_code: &str, category: &str) -> Option<&[String]> {
        self.catalogs
            .get(self.aliases.resolve(design_code))
            .and_then(|catalog| catalog.get(category))
            .map(Vec::as_slice)
    }
}

impl ValueSource for CatalogValues {
    fn allowed_values(&self, upstream: &Selection) -> Vec<String> {
        let code = upstream.get(self.code_field.as_str());
        let category = upstream.get(self.category_field.as_str());
        match (code, category) {
            (Some(code), Some(category)) => self
                .names(code, category)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
