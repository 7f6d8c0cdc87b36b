//! Authentication state.
//!
//! The logged-in flag is never stored. [`AuthenticationState::is_authenticated`]
//! probes a protected page on every call, so a server-side expiry is noticed
//! by the next operation instead of surfacing as a confusing scrape failure.

use crate::endpoints::Endpoints;
use crate::pages::has_logout_marker;
use crate::tokens::FormTokens;
use crate::transport::{HttpSession, SessionFactory};
use azubi_core::{AzubiError, Result};
use std::sync::Arc;

const FIELD_USERNAME: &str = "ctl00$ContentPlaceHolder1$txt_Benutzername";
const FIELD_PASSWORD: &str = "ctl00$ContentPlaceHolder1$txt_Passwort";
const FIELD_PERSISTENT: &str = "ctl00$ContentPlaceHolder1$chk_Persistent";
const FIELD_LOGIN: &str = "ctl00$ContentPlaceHolder1$cmd_Login";
const FIELD_IS_MOBILE: &str = "ctl00$ContentPlaceHolder1$HiddenField_isMobile";

const FORM_HEADERS: &[(&str, &str)] = &[("content-type", "application/x-www-form-urlencoded")];

/// Owns the network session handle and performs the login/logout handshakes.
///
/// Unauthenticated --login(ok)--> Authenticated --logout--> Unauthenticated.
/// A failed login leaves the state untouched.
pub struct AuthenticationState {
    factory: Arc<dyn SessionFactory>,
    endpoints: Endpoints,
    session: Option<Arc<dyn HttpSession>>,
}

impl AuthenticationState {
    pub fn new(factory: Arc<dyn SessionFactory>, endpoints: Endpoints) -> Self {
        Self {
            factory,
            endpoints,
            session: None,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Probes the protected start page for the logout control.
    ///
    /// Without a session handle this returns `false` without any request.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        let page = session.get(&self.endpoints.start_page()).await?;
        has_logout_marker(&page.body)
    }

    /// Returns the live session after confirming it is still logged in.
    pub async fn authenticated_session(&self) -> Result<Arc<dyn HttpSession>> {
        let session = self.session.clone().ok_or(AzubiError::NotAuthenticated)?;
        if !self.is_authenticated().await? {
            tracing::info!("Session is no longer authenticated on the server");
            return Err(AzubiError::NotAuthenticated);
        }
        Ok(session)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if self.is_authenticated().await? {
            return Err(AzubiError::AlreadyAuthenticated);
        }

        let session = self.factory.open_session()?;

        let login_page = session.get(&self.endpoints.login()).await?;
        let tokens = FormTokens::extract(&login_page.body)?;

        let mut form = tokens.to_fields();
        form.extend([
            (FIELD_USERNAME.to_string(), username.to_string()),
            (FIELD_PASSWORD.to_string(), password.to_string()),
            (FIELD_PERSISTENT.to_string(), "on".to_string()),
            (FIELD_LOGIN.to_string(), "Anmelden".to_string()),
            (FIELD_IS_MOBILE.to_string(), "false".to_string()),
        ]);
        session
            .post_form(&self.endpoints.login(), &form, FORM_HEADERS)
            .await?;

        let probe = session.get(&self.endpoints.start_page()).await?;
        if !has_logout_marker(&probe.body)? {
            return Err(AzubiError::authentication(format!(
                "login for user '{}' was not accepted",
                username
            )));
        }

        // A stale handle from an expired session is replaced here.
        self.session = Some(session);
        tracing::info!("Logged in as '{}'", username);
        Ok(())
    }

    /// Requests the logout page and always drops the local session handle.
    ///
    /// A failed logout request is logged, not returned: the caller must never
    /// be left holding a handle it believes is dead.
    pub async fn logout(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(AzubiError::NotAuthenticated)?;
        match session.get(&self.endpoints.logout()).await {
            Ok(page) if page.is_success() => tracing::info!("Logged out"),
            Ok(page) => tracing::warn!(
                "Logout returned status {}, session handle discarded anyway",
                page.status
            ),
            Err(err) => tracing::warn!("Logout request failed, session handle discarded: {}", err),
        }
        Ok(())
    }
}
