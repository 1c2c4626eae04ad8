use crate::engine;
use crate::DefinitionArgs;
use anyhow::{anyhow, Context, Result};
use modlink_indexer::{LineCol, LineIndex, Target};
use std::process::ExitCode;

pub async fn run(args: DefinitionArgs) -> Result<ExitCode> {
    let (path, text) = engine::read_document(&args.file).await?;
    let document = engine::editor_document(&path, text);
    engine::ensure_tracked(&document)?;

    let offset = match (args.offset, args.at.as_deref()) {
        (Some(offset), _) => offset,
        (None, Some(position)) => parse_position(&LineIndex::new(&document.text), position)?,
        (None, None) => return Err(anyhow!("either --offset or --at is required")),
    };

    let index = engine::reference_index();
    index.refresh(&path, &document.text).await?;

    match index.lookup(&path, offset) {
        Some(Target::Resolved(target)) => {
            println!("{}", target.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(Target::Unresolvable) => {
            println!("unresolvable");
            Ok(ExitCode::SUCCESS)
        }
        Some(Target::Pending) | None => {
            log::debug!("No module reference at offset {offset}");
            Ok(ExitCode::from(1))
        }
    }
}

/// Parse a 1-based `LINE:COLUMN` into a byte offset.
fn parse_position(line_index: &LineIndex, raw: &str) -> Result<usize> {
    let (line, col) = raw
        .split_once(':')
        .with_context(|| format!("position must be LINE:COLUMN, got {raw:?}"))?;
    let line: u32 = line.trim().parse().context("invalid line")?;
    let col: u32 = col.trim().parse().context("invalid column")?;
    if line == 0 || col == 0 {
        return Err(anyhow!("line and column are 1-based"));
    }
    line_index
        .offset(LineCol {
            line: line - 1,
            col: col - 1,
        })
        .with_context(|| format!("position {raw} is outside the file"))
}
