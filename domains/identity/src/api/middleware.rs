//! Identity domain state and auth backend integration

use crate::repository::IdentityRepositories;
use crate::service::AccountService;
use axum::extract::FromRef;
use threadline_auth::AuthBackend;

/// Application state for the identity domain
#[derive(Clone)]
pub struct IdentityState {
    pub repos: IdentityRepositories,
    pub auth: AuthBackend,
}

impl IdentityState {
    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.repos.clone(), self.auth.config().clone())
    }
}

impl FromRef<IdentityState> for AuthBackend {
    fn from_ref(state: &IdentityState) -> Self {
        state.auth.clone()
    }
}
