use crate::data::aggregate::{Ranking, View};
use crate::data::loader::LoadError;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded datasets (None when loading failed).
    pub session: Option<Session>,

    /// Currently selected view.
    pub view: View,

    /// Ranking for `view` (cached until the selection changes).
    pub ranking: Option<Ranking>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Wrap the outcome of loading. A failed load leaves no session, and
    /// every later view selection is refused.
    pub fn from_load(result: Result<Session, LoadError>) -> Self {
        match result {
            Ok(session) => Self {
                session: Some(session),
                ..Self::default()
            },
            Err(e) => Self {
                status_message: Some(format!("Error: {e}")),
                ..Self::default()
            },
        }
    }

    /// Row counts of the loaded datasets, for the top bar.
    pub fn summary(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(format!(
            "{} matches, {} deliveries loaded",
            session.matches.len(),
            session.deliveries.len()
        ))
    }

    pub fn is_halted(&self) -> bool {
        self.session.is_none()
    }

    /// Switch view and recompute its ranking.
    pub fn select_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.view = view;
        self.ranking = None;

        let Some(session) = &self.session else {
            return;
        };
        match view.compute(&session.matches, &session.deliveries) {
            Ok(ranking) => {
                self.ranking = ranking;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("{} failed: {e:#}", view.label());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
