use crate::config::ProviderConfig;
use crate::directory::error::DirectoryError;

/// Write-policy gate for manual identity updates.
///
/// A manual update is rejected only when the provider integration is enabled
/// AND the provider is configured to own name/email/login. With the
/// integration disabled, or ownership off, local callers may edit freely.
pub fn manual_update_allowed(provider: &ProviderConfig) -> bool {
    !(provider.integration_enabled && provider.owns_identity_attributes)
}

pub fn check_manual_update(provider: &ProviderConfig) -> Result<(), DirectoryError> {
    if manual_update_allowed(provider) {
        Ok(())
    } else {
        Err(DirectoryError::PolicyDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(integration_enabled: bool, owns_identity_attributes: bool) -> ProviderConfig {
        ProviderConfig {
            name: "oidc".into(),
            integration_enabled,
            owns_identity_attributes,
        }
    }

    #[test]
    fn allowed_when_integration_disabled() {
        assert!(manual_update_allowed(&provider(false, false)));
        assert!(manual_update_allowed(&provider(false, true)));
    }

    #[test]
    fn allowed_when_provider_does_not_own_attributes() {
        assert!(manual_update_allowed(&provider(true, false)));
    }

    #[test]
    fn denied_when_enabled_and_provider_owns_attributes() {
        assert!(!manual_update_allowed(&provider(true, true)));
        assert!(matches!(
            check_manual_update(&provider(true, true)),
            Err(DirectoryError::PolicyDenied)
        ));
    }
}
