use serde::Deserialize;

/// External identity provider settings, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider name stored in `external_identity_provider` (e.g. "oidc").
    pub name: String,
    /// Whether the provider integration is enabled at all.
    pub integration_enabled: bool,
    /// Whether the provider owns name/email/login and manual updates are blocked.
    pub owns_identity_attributes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub provider: ProviderConfig,
    /// Group names every new user is linked to at creation time.
    pub default_groups: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let provider = ProviderConfig {
            name: std::env::var("PROVIDER_NAME").unwrap_or_else(|_| "oidc".into()),
            integration_enabled: std::env::var("PROVIDER_INTEGRATION_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            owns_identity_attributes: std::env::var("PROVIDER_OWNS_IDENTITY_ATTRIBUTES")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        };
        let default_groups = std::env::var("DEFAULT_GROUPS")
            .map(|v| parse_group_list(&v))
            .unwrap_or_else(|_| vec!["users".into()]);
        Ok(Self {
            database_url,
            provider,
            default_groups,
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes" | "on")
}

/// Comma-separated group names; blanks are dropped, case is preserved.
fn parse_group_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_truthy_values() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool(" yes "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn parse_group_list_splits_and_trims() {
        assert_eq!(
            parse_group_list("users, developers ,admins"),
            vec!["users", "developers", "admins"]
        );
        assert_eq!(parse_group_list("users"), vec!["users"]);
        assert!(parse_group_list(" , ,").is_empty());
    }

    #[test]
    fn parse_group_list_keeps_case() {
        assert_eq!(parse_group_list("Sonar-Users"), vec!["Sonar-Users"]);
    }
}
