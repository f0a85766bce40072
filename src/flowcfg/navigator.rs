//! Breadcrumb navigation over the configuration tree.

use serde::Serialize;
use std::sync::{Arc, RwLock};

use super::cache::{ConfigTreeCache, ConfigTreeNode};
use super::editor::ConfigModuleEditor;
use super::path::{segments, title};
use crate::device::{DeviceApi, DeviceError};

/// One breadcrumb. Depth 0 is the `cfg` root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub depth: usize,
    /// The current location; not selectable
    pub active: bool,
}

/// Navigator over the configuration tree, driving the module editor.
pub struct ConfigNavigator {
    device: Arc<dyn DeviceApi>,
    cache: ConfigTreeCache,
    editor: ConfigModuleEditor,
    path: RwLock<Vec<String>>,
    node: RwLock<Option<Arc<ConfigTreeNode>>>,
}

impl ConfigNavigator {
    pub fn new(device: Arc<dyn DeviceApi>) -> Self {
        Self {
            cache: ConfigTreeCache::new(),
            editor: ConfigModuleEditor::new(device.clone()),
            device,
            path: RwLock::new(Vec::new()),
            node: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &ConfigTreeCache {
        &self.cache
    }

    pub fn editor(&self) -> &ConfigModuleEditor {
        &self.editor
    }

    pub fn segments(&self) -> Vec<String> {
        self.path.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Current location as a `/`-joined path (empty at the root).
    pub fn current_path(&self) -> String {
        self.segments().join("/")
    }

    fn set_path(&self, segs: Vec<String>) {
        *self.path.write().unwrap_or_else(|e| e.into_inner()) = segs;
    }

    /// Node rendered by the last navigation.
    pub fn node(&self) -> Option<Arc<ConfigTreeNode>> {
        self.node.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Children of the rendered node, as selectable chips.
    pub fn children(&self) -> Vec<String> {
        self.node().map(|n| n.children.clone()).unwrap_or_default()
    }

    pub fn title(&self) -> String {
        title(&self.current_path())
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let segs = self.segments();
        std::iter::once("cfg".to_string())
            .chain(segs.iter().cloned())
            .enumerate()
            .map(|(depth, label)| Crumb {
                label,
                depth,
                active: depth == segs.len(),
            })
            .collect()
    }

    /// Descend into `child` of the current location.
    pub async fn select_child(&self, child: &str) -> Result<(), DeviceError> {
        let mut segs = self.segments();
        segs.extend(segments(child));
        self.set_path(segs);
        self.render(false).await
    }

    /// Go back up to breadcrumb `depth` (0 = root).
    pub async fn select_crumb(&self, depth: usize) -> Result<(), DeviceError> {
        let mut segs = self.segments();
        segs.truncate(depth);
        self.set_path(segs);
        self.render(false).await
    }

    /// Jump straight to `path`.
    pub async fn open(&self, path: &str) -> Result<(), DeviceError> {
        self.set_path(segments(path));
        self.render(false).await
    }

    /// Fetch the node at the current location and drive the editor.
    ///
    /// A node with an exact module loads it; otherwise the editor is reset.
    pub async fn render(&self, force_reload: bool) -> Result<(), DeviceError> {
        let path = self.current_path();
        let node = match self
            .cache
            .fetch_children(self.device.as_ref(), &path, force_reload)
            .await
        {
            Ok(node) => node,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to list configuration branch");
                self.editor
                    .set_status(format!("Branch listing failed: {}", e));
                return Err(e);
            }
        };
        *self.node.write().unwrap_or_else(|e| e.into_inner()) = Some(node.clone());

        if node.has_exact_module {
            // Load failures are reported in the editor status.
            let _ = self.editor.load(&path).await;
        } else if node.children.is_empty() {
            self.editor.reset(Some("No sub-branch available."));
        } else {
            self.editor.reset(Some("Select a section."));
        }
        Ok(())
    }

    /// (Re)load the tree at the current location.
    ///
    /// `force` clears the whole cache first. When the current location
    /// cannot be listed the navigator falls back to the root.
    pub async fn load_modules(&self, force: bool) -> Result<(), DeviceError> {
        let result = async {
            if force {
                self.cache.invalidate_all();
            }
            let path = self.current_path();
            if let Err(e) = self
                .cache
                .fetch_children(self.device.as_ref(), &path, force)
                .await
            {
                tracing::debug!(path = %path, error = %e, "Falling back to configuration root");
                self.set_path(Vec::new());
                self.cache
                    .fetch_children(self.device.as_ref(), "", force)
                    .await?;
            }
            // Served from the cache just filled.
            self.render(false).await
        }
        .await;

        if let Err(ref e) = result {
            tracing::warn!(error = %e, "Failed to load configuration branches");
            self.editor
                .set_status(format!("Branch loading failed: {}", e));
        }
        result
    }
}
