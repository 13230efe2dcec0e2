//! Built-in screen definitions embedded in the binary
//!
//! Each admin list screen ships as a YAML file under `screens/`, so
//! `donor-dashboard show donors` works without a config file.

use crate::config::ScreenDefinition;
use crate::error::{Error, Result, ResultExt};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in screen YAML definitions, by name
pub static BUILTIN_SCREENS: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = BTreeMap::new();

        m.insert("donors", include_str!("../screens/donors.yaml"));
        m.insert("payments", include_str!("../screens/payments.yaml"));
        m.insert("services", include_str!("../screens/services.yaml"));
        m.insert("users", include_str!("../screens/users.yaml"));

        m
    });

/// Get a built-in screen's YAML by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SCREENS.get(name).copied()
}

/// Built-in screen names, sorted
pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_SCREENS.keys().copied().collect()
}

/// Parse one built-in screen
pub fn load_builtin(name: &str) -> Result<ScreenDefinition> {
    let yaml = get_builtin(name).ok_or_else(|| Error::screen_not_found(name))?;
    serde_yaml::from_str(yaml).with_context(|| format!("Built-in screen '{name}' is invalid"))
}

/// Parse every built-in screen, in name order
pub fn load_builtin_screens() -> Result<Vec<ScreenDefinition>> {
    builtin_names().into_iter().map(load_builtin).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtin_screens_parse() {
        let screens = load_builtin_screens().unwrap();
        assert_eq!(screens.len(), BUILTIN_SCREENS.len());
        for (screen, name) in screens.iter().zip(builtin_names()) {
            assert_eq!(screen.name, name, "YAML name must match its registry key");
            assert!(screen.path.starts_with('/'));
        }
    }

    #[test]
    fn test_donors_screen() {
        let donors = load_builtin("donors").unwrap();
        assert_eq!(donors.path, "/donors/donor-registrations");
        assert_eq!(
            donors.search_fields,
            vec!["donorNameFirst", "donorNameLast", "panelId"]
        );
        let status = donors.filter("status").unwrap();
        assert_eq!(
            status.options,
            vec!["PENDING", "CONFIRMED", "REJECTED", "RESUBMITTED"]
        );
        assert!(!status.server);
    }

    #[test]
    fn test_users_screen_filters_server_side() {
        let users = load_builtin("users").unwrap();
        assert_eq!(users.page_size_param.as_deref(), Some("pageSize"));
        for field in ["email", "phone", "role"] {
            assert!(users.is_server_param(field), "{field} should refetch");
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(get_builtin("nope").is_none());
        assert!(matches!(
            load_builtin("nope"),
            Err(Error::ScreenNotFound { .. })
        ));
    }
}
