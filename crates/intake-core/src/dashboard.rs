//! Signed-in session hosting the order form and the tab bar.

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::auth::{AuthService, AuthUser, Subscription};
use crate::controller::OrderFormController;
use crate::error::CoreError;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    Order,
    Bids,
    Track,
    Payments,
    Profile,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Order,
        DashboardTab::Bids,
        DashboardTab::Track,
        DashboardTab::Payments,
        DashboardTab::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Order => "Create Order",
            DashboardTab::Bids => "Manage Bids",
            DashboardTab::Track => "Track Delivery",
            DashboardTab::Payments => "Manage Payments",
            DashboardTab::Profile => "Profile",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            DashboardTab::Order => "order",
            DashboardTab::Bids => "bids",
            DashboardTab::Track => "track",
            DashboardTab::Payments => "payments",
            DashboardTab::Profile => "profile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tab| tab.slug() == needle)
    }

    pub fn is_available(self) -> bool {
        matches!(self, DashboardTab::Order | DashboardTab::Profile)
    }
}

impl fmt::Display for DashboardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    OrderForm,
    ComingSoon(&'static str),
    Profile(AuthUser),
}

pub struct Dashboard {
    auth: Arc<dyn AuthService>,
    controller: OrderFormController,
    tab: DashboardTab,
    viewer: Arc<RwLock<Option<AuthUser>>>,
    _subscription: Subscription,
}

impl Dashboard {
    /// Opens the dashboard for the signed-in user and restores any saved draft.
    pub fn mount(auth: Arc<dyn AuthService>, store: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let user = auth.current_user().ok_or(CoreError::NotAuthenticated)?;
        let viewer = Arc::new(RwLock::new(Some(user.clone())));
        let tracked = Arc::clone(&viewer);
        let subscription = auth.on_auth_state_changed(Box::new(move |user: Option<&AuthUser>| {
            if let Ok(mut slot) = tracked.write() {
                *slot = user.cloned();
            }
        }));
        info!(uid = %user.uid, "dashboard mounted");
        Ok(Self {
            auth,
            controller: OrderFormController::restore(store),
            tab: DashboardTab::default(),
            viewer,
            _subscription: subscription,
        })
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: DashboardTab) -> TabContent {
        self.tab = tab;
        self.tab_content()
    }

    pub fn tab_content(&self) -> TabContent {
        match self.tab {
            DashboardTab::Order => TabContent::OrderForm,
            DashboardTab::Profile => match self.viewer() {
                Some(user) => TabContent::Profile(user),
                None => TabContent::ComingSoon("Sign in to see your profile"),
            },
            other => TabContent::ComingSoon(other.label()),
        }
    }

    /// The user as last reported by the auth service.
    pub fn viewer(&self) -> Option<AuthUser> {
        self.viewer.read().ok().and_then(|user| user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.viewer().is_some()
    }

    pub fn controller(&self) -> &OrderFormController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OrderFormController {
        &mut self.controller
    }

    /// Signs out, then drops the draft and its persisted keys. A failed
    /// sign-out leaves the draft as it was.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.auth.sign_out()?;
        self.controller.clear()?;
        self.tab = DashboardTab::default();
        info!("logged out and cleared draft");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::GuestAuth;
    use crate::storage::MemoryStore;
    use std::time::Duration;

    #[test]
    fn mount_requires_a_user() {
        let store = MemoryStore::new();
        let auth = Arc::new(GuestAuth::with_delay(Arc::new(store.clone()), Duration::ZERO));
        let result = Dashboard::mount(auth, Arc::new(store));
        assert!(matches!(result, Err(CoreError::NotAuthenticated)));
    }

    #[test]
    fn placeholder_tabs_are_coming_soon() {
        let store = MemoryStore::new();
        let auth = Arc::new(GuestAuth::with_delay(Arc::new(store.clone()), Duration::ZERO));
        auth.sign_in_as_guest().unwrap();
        let mut dashboard = Dashboard::mount(auth, Arc::new(store)).unwrap();

        assert_eq!(
            dashboard.select_tab(DashboardTab::Bids),
            TabContent::ComingSoon("Manage Bids")
        );
        assert_eq!(
            dashboard.select_tab(DashboardTab::Profile),
            TabContent::Profile(AuthUser::guest())
        );
        assert!(DashboardTab::ALL.iter().filter(|t| t.is_available()).count() == 2);
    }
}
