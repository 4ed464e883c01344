//! Page navigation state
//!
//! The presentation layer owns a [`Session`] per user and passes it in
//! explicitly; nothing here is global. The access key is kept for display
//! only and is never checked.

use serde::{Deserialize, Serialize};

/// Top-level pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Home,
    Classifier,
    #[serde(rename = "Patient Info")]
    PatientInfo,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Classifier, Page::PatientInfo];

    /// Resolve a page by its title. Unknown names route to `Home`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.title().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Page::Home)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Classifier => "Classifier",
            Page::PatientInfo => "Patient Info",
        }
    }

    /// Pages offered by this page's "choose where to go" selector
    pub fn destinations(&self) -> &'static [Page] {
        match self {
            Page::Home => &[Page::Classifier, Page::PatientInfo],
            Page::Classifier | Page::PatientInfo => &[Page::Home],
        }
    }

    /// Static body text shown for pages without dynamic content
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Page::PatientInfo => Some("Coming soon."),
            _ => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Per-user navigation state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub page: Page,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, page: Page) {
        if self.page != page {
            tracing::debug!("Navigating {} -> {}", self.page, page);
        }
        self.page = page;
    }

    pub fn go_home(&mut self) {
        self.navigate(Page::Home);
    }

    /// Store the access key entered in the sidebar; blank input clears it
    pub fn set_access_key(&mut self, key: &str) {
        self.access_key = if key.trim().is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_home() {
        assert_eq!(Session::new().page, Page::Home);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Page::from_name("Classifier"), Page::Classifier);
        assert_eq!(Page::from_name("patient info"), Page::PatientInfo);
        assert_eq!(Page::from_name("Settings"), Page::Home);
    }

    #[test]
    fn test_navigation() {
        let mut session = Session::new();
        session.navigate(Page::Classifier);
        assert_eq!(session.page, Page::Classifier);
        session.go_home();
        assert_eq!(session.page, Page::Home);
    }

    #[test]
    fn test_home_destinations() {
        assert_eq!(
            Page::Home.destinations(),
            &[Page::Classifier, Page::PatientInfo]
        );
        assert_eq!(Page::PatientInfo.placeholder(), Some("Coming soon."));
    }

    #[test]
    fn test_access_key_stored_only() {
        let mut session = Session::new();
        session.set_access_key("secret");
        assert_eq!(session.access_key.as_deref(), Some("secret"));
        session.set_access_key("   ");
        assert_eq!(session.access_key, None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Session {
            page: Page::PatientInfo,
            access_key: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"page":"Patient Info"}"#);

        let parsed: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.page, Page::Home);
    }
}
