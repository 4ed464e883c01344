//! Label Registry
//!
//! Static display metadata for every known class key. Lookups never fail:
//! keys without an entry get a title-cased display name and a fixed
//! placeholder description.

use std::collections::BTreeMap;

use serde::Serialize;

/// Description used when a class key has no registry entry
pub const NO_DESCRIPTION: &str = "No description available.";

/// Display metadata for one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    /// Canonical class key, e.g. `"lung_aca"`
    pub key: &'static str,
    /// Human-friendly name shown to users
    pub display_name: &'static str,
    /// One-line description of the tissue type or condition
    pub description: &'static str,
}

impl LabelEntry {
    pub const fn new(
        key: &'static str,
        display_name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            display_name,
            description,
        }
    }
}

/// Reference label table (26 classes across 9 tissue groups)
pub const REFERENCE_LABELS: [LabelEntry; 26] = [
    // Blood (acute lymphoblastic leukemia)
    LabelEntry::new("all_benign", "ALL Benign", "Benign blood cells (non-cancerous)"),
    LabelEntry::new("all_early", "ALL Early", "Early-stage acute lymphoblastic leukemia"),
    LabelEntry::new("all_pre", "ALL Pre-B", "Pre-B cell subtype of leukemia"),
    LabelEntry::new("all_pro", "ALL Pro-B", "Pro-B cell subtype of leukemia"),
    // Brain
    LabelEntry::new("brain_glioma", "Brain Glioma", "Glioma (tumor from glial cells)"),
    LabelEntry::new("brain_menin", "Brain Meningioma", "Meningioma (tumor from meninges)"),
    LabelEntry::new("brain_tumor", "Brain Tumor", "General brain tumor"),
    // Breast
    LabelEntry::new("breast_benign", "Breast Benign", "Benign breast tissue"),
    LabelEntry::new(
        "breast_malignant",
        "Breast Malignant",
        "Malignant breast tissue (cancerous)",
    ),
    // Cervix
    LabelEntry::new(
        "cervix_dyk",
        "Cervix Dyskeratotic",
        "Dyskeratotic cells (abnormal keratinization)",
    ),
    LabelEntry::new(
        "cervix_koc",
        "Cervix Koilocytotic",
        "Koilocytotic cells (HPV-related changes)",
    ),
    LabelEntry::new("cervix_mep", "Cervix Metaplastic", "Metaplastic epithelial cells"),
    LabelEntry::new(
        "cervix_pab",
        "Cervix Parabasal",
        "Parabasal cells (immature squamous cells)",
    ),
    LabelEntry::new(
        "cervix_sfi",
        "Cervix Superficial",
        "Superficial squamous cells (normal)",
    ),
    // Colon
    LabelEntry::new(
        "colon_aca",
        "Colon Adenocarcinoma",
        "Colon adenocarcinoma (colon cancer)",
    ),
    LabelEntry::new("colon_bnt", "Colon Benign Tissue", "Benign colon tissue"),
    // Kidney
    LabelEntry::new("kidney_normal", "Kidney Normal", "Healthy kidney tissue"),
    LabelEntry::new("kidney_tumor", "Kidney Tumor", "Kidney tumor (cancerous)"),
    // Lung
    LabelEntry::new("lung_aca", "Lung Adenocarcinoma", "Lung adenocarcinoma"),
    LabelEntry::new("lung_bnt", "Lung Benign Tissue", "Benign lung tissue"),
    LabelEntry::new(
        "lung_scc",
        "Lung Squamous Cell Carcinoma",
        "Lung squamous cell carcinoma",
    ),
    // Lymph
    LabelEntry::new("lymph_cll", "Lymph CLL", "Chronic lymphocytic leukemia"),
    LabelEntry::new("lymph_fl", "Lymph Follicular Lymphoma", "Follicular lymphoma"),
    LabelEntry::new("lymph_mcl", "Lymph Mantle Cell Lymphoma", "Mantle cell lymphoma"),
    // Oral
    LabelEntry::new("oral_normal", "Oral Normal", "Healthy oral tissue"),
    LabelEntry::new(
        "oral_scc",
        "Oral Squamous Cell Carcinoma",
        "Oral Squamous Cell Carcinoma",
    ),
];

/// Turn a class key into a display name: `_` becomes a space and every
/// word is title-cased (`"lymph_cll"` -> `"Lymph Cll"`).
///
/// A letter is uppercased when the previous character is not a letter and
/// lowercased otherwise, so `"x2y"` becomes `"X2Y"`.
pub fn title_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_is_letter = false;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// Lookup table from class key to display metadata
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    entries: BTreeMap<&'static str, LabelEntry>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::reference()
    }
}

impl LabelRegistry {
    /// Registry holding the reference deployment's labels
    pub fn reference() -> Self {
        Self::new(REFERENCE_LABELS)
    }

    /// Build a registry from custom entries. Later duplicates of a key are ignored.
    pub fn new(entries: impl IntoIterator<Item = LabelEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.entry(entry.key).or_insert(entry);
        }
        Self { entries: map }
    }

    /// Entries ordered by class key
    pub fn entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, key: &str) -> Option<&LabelEntry> {
        self.entries.get(key)
    }

    /// Display name for a key, falling back to [`title_case_key`]
    pub fn display_name(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(entry) => entry.display_name.to_string(),
            None => title_case_key(key),
        }
    }

    /// Description for a key, falling back to [`NO_DESCRIPTION`]
    pub fn description(&self, key: &str) -> &str {
        self.lookup(key)
            .map(|e| e.description)
            .unwrap_or(NO_DESCRIPTION)
    }
}
