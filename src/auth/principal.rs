use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};

/// Provider tag carried in token claims for locally registered users.
pub const PROVIDER_LOCAL: &str = "local";
/// Provider tag carried in token claims for federated identities.
pub const PROVIDER_FEDERATED: &str = "federated";

/// An authenticated request principal.
///
/// Local and federated logins are structurally different identities; this
/// tagged variant collapses both into the one capability the storefront
/// needs, [`Principal::owner_username`]. Callers never branch on the
/// concrete shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// Locally registered user, identified by the stored username.
    Local { username: String },
    /// Federated identity, identified by the provider-asserted display name.
    Federated { display_name: String },
}

impl Principal {
    /// The username used as the cart-owner key.
    pub fn owner_username(&self) -> &str {
        match self {
            Principal::Local { username } => username,
            Principal::Federated { display_name } => display_name,
        }
    }

    /// Builds a principal from the provider tag found in token claims.
    /// Unknown tags are rejected, never coerced to a default shape.
    pub fn from_provider(kind: &str, subject: String) -> Result<Self, ServiceError> {
        match kind {
            PROVIDER_LOCAL => Ok(Principal::Local { username: subject }),
            PROVIDER_FEDERATED => Ok(Principal::Federated {
                display_name: subject,
            }),
            other => Err(ServiceError::UnsupportedPrincipalKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn local_principal_resolves_stored_username() {
        let principal = Principal::from_provider(PROVIDER_LOCAL, "alice".into()).unwrap();
        assert_eq!(principal, Principal::Local { username: "alice".into() });
        assert_eq!(principal.owner_username(), "alice");
    }

    #[test]
    fn federated_principal_resolves_display_name() {
        let principal = Principal::from_provider(PROVIDER_FEDERATED, "bob".into()).unwrap();
        assert_eq!(
            principal,
            Principal::Federated { display_name: "bob".into() }
        );
        assert_eq!(principal.owner_username(), "bob");
    }

    #[test]
    fn variants_never_cross_over() {
        let local = Principal::from_provider(PROVIDER_LOCAL, "alice".into()).unwrap();
        let federated = Principal::from_provider(PROVIDER_FEDERATED, "bob".into()).unwrap();
        assert_ne!(local.owner_username(), federated.owner_username());
        assert_matches!(local, Principal::Local { .. });
        assert_matches!(federated, Principal::Federated { .. });
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = Principal::from_provider("saml", "carol".into()).unwrap_err();
        assert_matches!(err, ServiceError::UnsupportedPrincipalKind(kind) if kind == "saml");
    }
}
