use std::collections::{HashMap, HashSet};

use axum::http::Method;

use super::{Principal, Role};

/// Outcome of evaluating one request against a route's role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    InsufficientRole,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `principal` may use an operation requiring one of `required`.
///
/// An empty set means the operation has no role restriction.
pub fn authorize(principal: &Principal, required: &HashSet<Role>) -> Decision {
    if required.is_empty() || required.contains(&principal.role) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::InsufficientRole)
    }
}

/// What a route demands before its handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No token needed.
    Public,
    /// Any valid token.
    Authenticated,
    /// A valid token whose principal holds one of these roles.
    Roles(HashSet<Role>),
}

impl Access {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Access::Roles(roles.into_iter().collect())
    }

    /// Role set handed to [`authorize`]; `None` for public routes.
    pub fn required_roles(&self) -> Option<HashSet<Role>> {
        match self {
            Access::Public => None,
            Access::Authenticated => Some(HashSet::new()),
            Access::Roles(roles) => Some(roles.clone()),
        }
    }
}

/// Static `(method, route pattern) -> Access` table consulted per request.
///
/// Route patterns are the router's own (e.g. `/api/v1/products/:id`).
/// Routes with no entry require authentication.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: HashMap<(Method, String), Access>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, method: Method, route: impl Into<String>, access: Access) -> Self {
        self.rules.insert((method, route.into()), access);
        self
    }

    pub fn access_for(&self, method: &Method, route: &str) -> Access {
        self.rules
            .get(&(method.clone(), route.to_string()))
            .cloned()
            .unwrap_or(Access::Authenticated)
    }
}
