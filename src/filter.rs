// Plugin allow-list

use std::collections::HashSet;

/// Decides which collectd plugins are relayed. With no configured plugins everything passes.
#[derive(Debug, Clone, Default)]
pub struct PluginFilter {
    allowed: Option<HashSet<String>>,
}

impl PluginFilter {
    /// Builds a filter from configured plugin names. Names are trimmed and blank entries
    /// dropped, so `--collectd_plugins ""` allows every plugin.
    pub fn new<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: HashSet<String> = plugins
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            allowed: (!allowed.is_empty()).then_some(allowed),
        }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_allowed(&self, plugin: &str) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|allowed| allowed.contains(plugin))
    }
}
