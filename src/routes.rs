use crate::models::{Role, User};

/// The navigable screens. Unmatched paths resolve to `NotFound`, which the
/// shell renders as the `/404` redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home,
    Blog(u64),
    Create,
    Edit(u64),
    Profile,
    Admin,
    NotFound,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AdminOnly,
}

/// Result of guarding a route against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    RedirectLogin,
    RedirectHome,
}

impl Route {
    /// Resolve a path to a route. Trailing slashes are tolerated; anything
    /// unrecognized is `NotFound`.
    pub fn resolve(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };

        match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/create" => Route::Create,
            "/profile" => Route::Profile,
            "/admin" => Route::Admin,
            _ => {
                if let Some(id) = path.strip_prefix("/blog/") {
                    match id.parse() {
                        Ok(id) => Route::Blog(id),
                        Err(_) => Route::NotFound,
                    }
                } else if let Some(id) = path.strip_prefix("/edit/") {
                    match id.parse() {
                        Ok(id) => Route::Edit(id),
                        Err(_) => Route::NotFound,
                    }
                } else {
                    Route::NotFound
                }
            }
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register | Route::Home | Route::Blog(_) | Route::NotFound => {
                Access::Public
            }
            Route::Create | Route::Edit(_) | Route::Profile => Access::Authenticated,
            Route::Admin => Access::AdminOnly,
        }
    }

    /// Decide whether the current session may enter. A missing session
    /// redirects to login; an insufficient role falls back to home.
    pub fn guard(&self, session: Option<&User>) -> Guard {
        match self.access() {
            Access::Public => Guard::Allow,
            Access::Authenticated => match session {
                Some(_) => Guard::Allow,
                None => Guard::RedirectLogin,
            },
            Access::AdminOnly => match session {
                Some(user) if user.role == Role::Admin => Guard::Allow,
                Some(_) => Guard::RedirectHome,
                None => Guard::RedirectLogin,
            },
        }
    }
}
