use crate::error::{Result, ScanError};
use crate::language::Language;
use modlink_protocol::{ScannedReference, Scanner};
use tree_sitter::{Node, Parser};

/// Tree-sitter backed [`Scanner`] for JavaScript module references.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireScanner;

impl RequireScanner {
    pub fn new() -> Self {
        Self
    }

    /// Parse `content` and collect every module-reference literal.
    pub fn scan(&self, content: &str) -> Result<Vec<ScannedReference>> {
        let mut parser = Parser::new();
        parser
            .set_language(&Language::JavaScript.tree_sitter_language()?)
            .map_err(|e| ScanError::tree_sitter(format!("Failed to set language: {e}")))?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ScanError::parse("Failed to parse source code"))?;

        let mut references = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if let Some(literal) = module_literal(content, node) {
                if let Some(reference) = string_contents(content, literal) {
                    references.push(reference);
                }
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        references.sort_by_key(|r| r.start);
        references.dedup_by_key(|r| r.start);
        log::debug!("Found {} module references", references.len());
        Ok(references)
    }
}

impl Scanner for RequireScanner {
    fn find_all(&self, text: &str) -> anyhow::Result<Vec<ScannedReference>> {
        Ok(self.scan(text)?)
    }
}

/// The string node naming a module, if `node` is a reference site.
fn module_literal<'t>(content: &str, node: Node<'t>) -> Option<Node<'t>> {
    match node.kind() {
        "call_expression" => {
            let callee = node.child_by_field_name("function")?;
            let is_reference_call = match callee.kind() {
                "import" => true,
                "identifier" => content.get(callee.byte_range()) == Some("require"),
                _ => false,
            };
            if !is_reference_call {
                return None;
            }
            let arguments = node.child_by_field_name("arguments")?;
            let first = arguments.named_child(0)?;
            (first.kind() == "string").then_some(first)
        }
        "import_statement" | "export_statement" => {
            let source = node.child_by_field_name("source")?;
            (source.kind() == "string").then_some(source)
        }
        _ => None,
    }
}

fn string_contents(content: &str, literal: Node<'_>) -> Option<ScannedReference> {
    let start = literal.start_byte() + 1;
    let end = literal.end_byte().checked_sub(1)?;
    if end <= start {
        return None;
    }
    let name = content.get(start..end)?;
    Some(ScannedReference::new(start, name))
}
