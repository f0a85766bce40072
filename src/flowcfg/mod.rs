//! Flow.IO hierarchical configuration.
//!
//! The device exposes its configuration as a slash-addressed tree of
//! modules. [`ConfigTreeCache`] memoizes child listings per prefix,
//! [`ConfigNavigator`] walks the tree with breadcrumbs, and
//! [`ConfigModuleEditor`] turns one module's field map into typed controls
//! and builds single-module patches from them. Masked secrets are never sent
//! back as their sentinel.

mod cache;
mod editor;
mod navigator;
mod path;

pub use cache::{ConfigTreeCache, ConfigTreeNode};
pub use editor::{
    is_secret_name, parse_leading_float, parse_leading_int, ConfigModuleEditor, EditorError,
    EditorState, FieldControl, FieldKind, Patch, MASKED_SENTINEL,
};
pub use navigator::{ConfigNavigator, Crumb};
pub use path::{cache_key, normalize_path, segments, title, ROOT_KEY};
