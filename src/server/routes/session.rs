//! Navigation endpoint
//!
//! The client sends its current session with the requested page and gets
//! the updated session back; the server keeps no per-user state.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::session::{Page, Session};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    #[serde(default)]
    pub session: Session,
    /// Page title, e.g. "Classifier"; unknown titles route to Home
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub session: Session,
    pub title: String,
    pub destinations: Vec<Page>,
    pub placeholder: Option<String>,
}

/// POST /session/navigate - Apply a navigation to a caller-supplied session
pub async fn navigate(Json(request): Json<NavigateRequest>) -> Json<NavigateResponse> {
    let mut session = request.session;
    session.navigate(Page::from_name(&request.target));

    let page = session.page;
    Json(NavigateResponse {
        title: page.title().to_string(),
        destinations: page.destinations().to_vec(),
        placeholder: page.placeholder().map(str::to_string),
        session,
    })
}
