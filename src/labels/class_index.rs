//! Class Index Resolver
//!
//! Loads the persisted `{class_key: index}` table written at training time
//! and inverts it into the order in which the model emits probabilities.

use std::collections::HashMap;
use std::path::Path;

use crate::utils::error::{OncoDataError, Result};

/// Ordered class keys, `classes[i]` is the key for model output `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassIndex {
    classes: Vec<String>,
}

impl ClassIndex {
    /// Load the mapping from a JSON object file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            OncoDataError::Configuration(format!(
                "cannot read class index {}: {}",
                path.display(),
                e
            ))
        })?;

        let mapping: HashMap<String, usize> = serde_json::from_str(&json).map_err(|e| {
            OncoDataError::Configuration(format!(
                "malformed class index {}: {}",
                path.display(),
                e
            ))
        })?;

        let index = Self::from_mapping(mapping)?;
        tracing::debug!(
            "Loaded {} classes from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Invert a key -> index mapping. Indices must be a dense permutation of `[0, N)`.
    pub fn from_mapping(mapping: HashMap<String, usize>) -> Result<Self> {
        let n = mapping.len();
        if n == 0 {
            return Err(OncoDataError::Configuration(
                "class index mapping is empty".to_string(),
            ));
        }

        let mut slots: Vec<Option<String>> = vec![None; n];
        for (key, idx) in mapping {
            let slot = slots.get_mut(idx).ok_or_else(|| {
                OncoDataError::Configuration(format!(
                    "class '{}' has index {} outside [0, {})",
                    key, idx, n
                ))
            })?;
            if let Some(existing) = slot {
                return Err(OncoDataError::Configuration(format!(
                    "index {} assigned to both '{}' and '{}'",
                    idx, existing, key
                )));
            }
            *slot = Some(key);
        }

        // n keys in n distinct slots below n: every slot is filled.
        let classes = slots.into_iter().flatten().collect();
        Ok(Self { classes })
    }

    /// Build directly from an ordered key list
    pub fn from_ordered<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mapping: Vec<String> = keys.into_iter().map(Into::into).collect();
        let n = mapping.len();
        let map: HashMap<String, usize> = mapping
            .into_iter()
            .enumerate()
            .map(|(i, k)| (k, i))
            .collect();
        if map.len() != n {
            return Err(OncoDataError::Configuration(
                "duplicate class key in ordered list".to_string(),
            ));
        }
        Self::from_mapping(map)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.classes.iter().position(|k| k == key)
    }

    /// Serialize back to the `{key: index}` form
    pub fn to_mapping(&self) -> HashMap<String, usize> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_mapping())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
