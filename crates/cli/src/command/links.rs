use crate::engine;
use crate::report::LinksReport;
use crate::LinksArgs;
use anyhow::Result;
use std::process::ExitCode;

pub async fn run(args: LinksArgs) -> Result<ExitCode> {
    let (path, text) = engine::read_document(&args.file).await?;
    let document = engine::editor_document(&path, text);
    engine::ensure_tracked(&document)?;

    let index = engine::reference_index();
    index.refresh(&path, &document.text).await?;
    let report = LinksReport::build(&index, &path, &document.text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(ExitCode::SUCCESS)
}
