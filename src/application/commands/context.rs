//! Capabilities shared by the commands: model selection and a scoped HTTP session

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ModelSelector;
use crate::infrastructure::traits::{HttpSession, ModelResolver, SessionFactory};
use crate::infrastructure::InfraResult;

/// Access to the selected model.
pub struct ModelContext {
    selector: ModelSelector,
    resolver: Arc<dyn ModelResolver>,
}

impl ModelContext {
    pub fn new(selector: ModelSelector, resolver: Arc<dyn ModelResolver>) -> Self {
        Self { selector, resolver }
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn model_uuid(&self) -> InfraResult<String> {
        self.resolver.model_uuid(&self.selector)
    }
}

/// An HTTP session opened on first use and closed when the scope ends.
///
/// Closing happens on [`HttpScope::close`] or on drop, whichever comes first.
pub struct HttpScope {
    sessions: Arc<dyn SessionFactory>,
    session: Option<Box<dyn HttpSession>>,
}

impl HttpScope {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            sessions,
            session: None,
        }
    }

    /// Return the session, opening it if needed.
    pub fn new_client(&mut self) -> InfraResult<&dyn HttpSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.sessions.open()?,
        };
        Ok(&**self.session.insert(session))
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Close the session if one was opened.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!("releasing http session");
            if let Err(e) = session.close() {
                warn!("failed to close http session: {}", e);
            }
        }
    }
}

impl Drop for HttpScope {
    fn drop(&mut self) {
        self.close();
    }
}
