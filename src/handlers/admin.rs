use crate::db::{DocumentStore, SeedDocument, read_list};
use crate::error::VerseError;
use crate::middleware::{PageContext, RequireAdmin};
use crate::router::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub users: usize,
    pub anime: usize,
    pub tracker_queue: usize,
    pub notifications: usize,
}

impl DocumentStats {
    pub fn collect(store: &dyn DocumentStore) -> Result<Self, VerseError> {
        let count = |doc: SeedDocument| read_list(store, doc.file_name()).map(|l| l.len());
        Ok(Self {
            users: count(SeedDocument::Users)?,
            anime: count(SeedDocument::AnimeLibrary)?,
            tracker_queue: count(SeedDocument::TrackerQueue)?,
            notifications: count(SeedDocument::Notifications)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub page: PageContext,
    pub stats: DocumentStats,
}

/// GET /admin
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Response, VerseError> {
    let (page, jar) = PageContext::load(state.store.as_ref(), jar)?;
    let stats = DocumentStats::collect(state.store.as_ref())?;
    Ok((jar, Json(Dashboard { page, stats })).into_response())
}
