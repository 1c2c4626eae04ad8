use crate::document::DocumentIndex;
use modlink_protocol::{is_local_module_name, with_default_extension, CREATE_MODULE_COMMAND};
use std::path::PathBuf;

/// Hover text shown on a navigable reference.
pub const LINK_TOOLTIP: &str = if cfg!(target_os = "macos") {
    "Cmd + click to open"
} else {
    "Ctrl + click to open"
};

/// A resolved reference rendered as a navigable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub start: usize,
    pub end: usize,
    pub target: PathBuf,
    pub tooltip: &'static str,
}

/// Quick-fix offered on an unresolvable reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationAction {
    pub start: usize,
    pub end: usize,
    pub module_name: String,
    pub title: String,
    pub command: &'static str,
}

pub fn document_links(index: &DocumentIndex) -> Vec<DocumentLink> {
    if !index.is_resolved() {
        return Vec::new();
    }
    index
        .references()
        .iter()
        .filter_map(|r| {
            let target = r.target.resolved_path()?;
            Some(DocumentLink {
                start: r.start,
                end: r.end(),
                target: target.to_path_buf(),
                tooltip: LINK_TOOLTIP,
            })
        })
        .collect()
}

pub fn remediation_actions(index: &DocumentIndex) -> Vec<RemediationAction> {
    if !index.is_resolved() {
        return Vec::new();
    }
    index
        .references()
        .iter()
        .filter(|r| r.target.is_unresolvable())
        .map(|r| RemediationAction {
            start: r.start,
            end: r.end(),
            module_name: r.name.clone(),
            title: remediation_title(&r.name),
            command: CREATE_MODULE_COMMAND,
        })
        .collect()
}

pub fn remediation_title(module_name: &str) -> String {
    if is_local_module_name(module_name) {
        format!(
            "Create missing module file: '{}'",
            with_default_extension(module_name)
        )
    } else {
        format!("Create missing node module: '{module_name}'")
    }
}
