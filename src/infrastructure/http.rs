//! Authenticated HTTP sessions
//!
//! A session wraps a blocking `reqwest` client that presents the user's macaroon on
//! every request.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::debug;

use crate::infrastructure::traits::{FileSystem, HttpSession, SessionFactory};
use crate::infrastructure::{InfraError, InfraResult};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Session holding a credentialed client.
pub struct BakerySession {
    client: Client,
    closed: bool,
}

impl BakerySession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl HttpSession for BakerySession {
    fn http(&self) -> &Client {
        &self.client
    }

    fn close(&mut self) -> InfraResult<()> {
        if !self.closed {
            debug!("closing http session");
            self.closed = true;
        }
        Ok(())
    }
}

/// Opens [`BakerySession`]s from a configured token or a token file.
///
/// An explicit token wins over the file.
pub struct BakerySessionFactory {
    fs: Arc<dyn FileSystem>,
    token: Option<String>,
    token_file: PathBuf,
}

impl BakerySessionFactory {
    pub fn new(fs: Arc<dyn FileSystem>, token: Option<String>, token_file: PathBuf) -> Self {
        Self {
            fs,
            token,
            token_file,
        }
    }

    fn load_token(&self) -> InfraResult<String> {
        let token = match &self.token {
            Some(token) => token.trim().to_string(),
            None => {
                if !self.fs.exists(&self.token_file) {
                    return Err(InfraError::Credentials(format!(
                        "set BUDGETCTL_TOKEN or write a macaroon to {}",
                        self.token_file.display()
                    )));
                }
                self.fs
                    .read_to_string(&self.token_file)
                    .map_err(|e| {
                        InfraError::io(format!("read {}", self.token_file.display()), e)
                    })?
                    .trim()
                    .to_string()
            }
        };
        if token.is_empty() {
            return Err(InfraError::Credentials("token is empty".into()));
        }
        Ok(token)
    }
}

impl SessionFactory for BakerySessionFactory {
    fn open(&self) -> InfraResult<Box<dyn HttpSession>> {
        let token = self.load_token()?;

        let mut auth = HeaderValue::from_str(&format!("Macaroon {token}"))
            .map_err(|_| InfraError::Credentials("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        debug!("opened http session");
        Ok(Box::new(BakerySession::new(client)))
    }
}
