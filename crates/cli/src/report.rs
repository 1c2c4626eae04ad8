use console::style;
use modlink_indexer::{DocumentLink, IndexEvent, LineIndex, ReferenceIndex, RemediationAction};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct LinksReport {
    pub document: PathBuf,
    pub links: Vec<LinkEntry>,
    pub missing: Vec<MissingEntry>,
}

#[derive(Debug, Serialize)]
pub struct LinkEntry {
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// 1-based `line:column`
    pub position: String,
    pub target: PathBuf,
    pub tooltip: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MissingEntry {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub position: String,
    pub title: String,
    pub command: &'static str,
}

impl LinksReport {
    pub fn build(index: &ReferenceIndex, document: &Path, text: &str) -> Self {
        let line_index = LineIndex::new(text);
        Self {
            document: document.to_path_buf(),
            links: index
                .links(document)
                .into_iter()
                .map(|link| link_entry(&line_index, text, link))
                .collect(),
            missing: index
                .remediation_actions(document)
                .into_iter()
                .map(|action| missing_entry(&line_index, action))
                .collect(),
        }
    }

    pub fn print(&self) {
        println!("{}", style(self.document.display()).bold());
        for link in &self.links {
            println!(
                "  {:>8}  {} -> {}",
                link.position,
                link.name,
                style(link.target.display()).cyan()
            );
        }
        for missing in &self.missing {
            println!(
                "  {:>8}  {} {}",
                missing.position,
                style(&missing.name).yellow(),
                style(format!("({})", missing.title)).dim()
            );
        }
        if self.links.is_empty() && self.missing.is_empty() {
            println!("  {}", style("no module references").dim());
        }
    }
}

fn link_entry(line_index: &LineIndex, text: &str, link: DocumentLink) -> LinkEntry {
    LinkEntry {
        name: text.get(link.start..link.end).unwrap_or_default().to_string(),
        start: link.start,
        end: link.end,
        position: line_index.line_col(link.start).to_string(),
        target: link.target,
        tooltip: link.tooltip,
    }
}

fn missing_entry(line_index: &LineIndex, action: RemediationAction) -> MissingEntry {
    MissingEntry {
        position: line_index.line_col(action.start).to_string(),
        name: action.module_name,
        start: action.start,
        end: action.end,
        title: action.title,
        command: action.command,
    }
}

/// One line per index event, for `watch`.
pub fn print_event(event: &IndexEvent, text: &str) {
    match event {
        IndexEvent::Resolved {
            generation,
            links,
            unresolvable,
            ..
        } => {
            let line_index = LineIndex::new(text);
            println!(
                "{} generation {generation}: {} linked, {unresolvable} missing",
                style("resolved").green(),
                links.len()
            );
            for link in links {
                let entry = link_entry(&line_index, text, link.clone());
                println!("  {:>8}  {} -> {}", entry.position, entry.name, entry.target.display());
            }
        }
        IndexEvent::RemediationChanged { available, .. } => {
            if *available {
                println!("{} create actions available", style("missing modules:").yellow());
            } else {
                println!("{} all references resolve", style("missing modules:").green());
            }
        }
        IndexEvent::Dropped { document } => {
            println!("{} {}", style("dropped").dim(), document.display());
        }
    }
}
