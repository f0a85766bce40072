//! Memoized child listings of the configuration tree.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::path::{cache_key, normalize_path};
use crate::device::{endpoints, lenient, DeviceApi, DeviceError};

/// Child listing of one tree prefix.
///
/// Nodes are immutable; a refetch replaces the cached node wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigTreeNode {
    pub prefix: String,
    /// A module exists at exactly this prefix
    pub has_exact_module: bool,
    /// Sorted, de-duplicated child names
    pub children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    #[serde(default, deserialize_with = "lenient::flag")]
    has_exact: bool,
    children: Vec<Value>,
}

impl ConfigTreeNode {
    fn from_response(prefix: String, response: ChildrenResponse) -> Self {
        let mut children: Vec<String> = response
            .children
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_path)
            .filter(|name| !name.is_empty())
            .collect();
        children.sort();
        children.dedup();

        Self {
            prefix,
            has_exact_module: response.has_exact,
            children,
        }
    }
}

/// Path-keyed cache of [`ConfigTreeNode`]s.
///
/// Uses a concurrent map so the navigator and CLI commands can share one
/// cache without external locking.
///
/// ```
/// use flowio::flowcfg::ConfigTreeCache;
///
/// let cache = ConfigTreeCache::new();
/// assert!(cache.is_empty());
/// assert!(cache.get("pool/pump").is_none());
/// ```
#[derive(Default)]
pub struct ConfigTreeCache {
    nodes: DashMap<String, Arc<ConfigTreeNode>>,
}

impl ConfigTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached node for `prefix`, without fetching.
    pub fn get(&self, prefix: &str) -> Option<Arc<ConfigTreeNode>> {
        self.nodes.get(&cache_key(prefix)).map(|n| n.value().clone())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every cached node, whatever its prefix.
    pub fn invalidate_all(&self) {
        let dropped = self.nodes.len();
        self.nodes.clear();
        tracing::debug!(dropped, "Configuration tree cache cleared");
    }

    /// Children of `prefix`, from cache unless `force_reload` or missing.
    pub async fn fetch_children(
        &self,
        device: &dyn DeviceApi,
        prefix: &str,
        force_reload: bool,
    ) -> Result<Arc<ConfigTreeNode>, DeviceError> {
        let prefix = normalize_path(prefix);
        let key = cache_key(&prefix);

        if !force_reload {
            if let Some(node) = self.nodes.get(&key) {
                return Ok(node.value().clone());
            }
        }

        let body = if prefix.is_empty() {
            device.get_json(endpoints::FLOWCFG_CHILDREN, &[]).await?
        } else {
            device
                .get_json(endpoints::FLOWCFG_CHILDREN, &[("prefix", prefix.as_str())])
                .await?
        };
        let response: ChildrenResponse = serde_json::from_value(body)
            .map_err(|e| DeviceError::Malformed(format!("children of '{}': {}", prefix, e)))?;

        let node = Arc::new(ConfigTreeNode::from_response(prefix, response));
        tracing::debug!(
            prefix = %node.prefix,
            children = node.children.len(),
            has_exact = node.has_exact_module,
            "Configuration tree node fetched"
        );
        self.nodes.insert(key, node.clone());
        Ok(node)
    }
}
