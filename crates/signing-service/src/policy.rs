use std::collections::{BTreeSet, HashMap};

use crate::types::Endpoint;

/// Which key identifiers each endpoint may use.
///
/// Built once from configuration and never mutated afterwards, so it is
/// shared between concurrent calls without any locking.
#[derive(Debug, Clone, Default)]
pub struct KeyUsagePolicy {
    usages: HashMap<Endpoint, BTreeSet<String>>,
}

impl KeyUsagePolicy {
    pub fn new(usages: HashMap<Endpoint, BTreeSet<String>>) -> Self {
        Self { usages }
    }

    pub fn is_authorized(&self, endpoint: Endpoint, identifier: &str) -> bool {
        self.usages
            .get(&endpoint)
            .is_some_and(|keys| keys.contains(identifier))
    }

    /// Keys usable for `endpoint`. Empty when the endpoint has no usage entry.
    pub fn list_keys(&self, endpoint: Endpoint) -> BTreeSet<String> {
        self.usages.get(&endpoint).cloned().unwrap_or_default()
    }
}

impl<I, S> FromIterator<(Endpoint, I)> for KeyUsagePolicy
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (Endpoint, I)>>(iter: T) -> Self {
        let mut usages: HashMap<Endpoint, BTreeSet<String>> = HashMap::new();
        for (endpoint, identifiers) in iter {
            usages
                .entry(endpoint)
                .or_default()
                .extend(identifiers.into_iter().map(Into::into));
        }
        Self { usages }
    }
}
