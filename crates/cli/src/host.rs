//! Terminal stand-in for the editor's prompts and views.

use async_trait::async_trait;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use modlink_protocol::{EditorHost, Strategy};
use std::io;
use std::path::Path;

pub struct TerminalHost {
    interactive: bool,
    open_files: bool,
}

impl TerminalHost {
    pub fn new(open_files: bool) -> Self {
        Self {
            interactive: Term::stderr().is_term(),
            open_files,
        }
    }
}

#[async_trait]
impl EditorHost for TerminalHost {
    async fn input_module_name(&self) -> Option<String> {
        if !self.interactive {
            log::warn!("No module name given and no terminal to ask for one");
            return None;
        }
        tokio::task::spawn_blocking(|| {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Please provide a name for the module.")
                .allow_empty(true)
                .interact_text()
                .ok()
        })
        .await
        .ok()
        .flatten()
    }

    async fn pick_strategy(&self, module_name: &str) -> Option<Strategy> {
        if !self.interactive {
            log::warn!("Package type is 'ask' but there is no terminal; pass --type");
            return None;
        }
        let choices = Strategy::choices(module_name);
        tokio::task::spawn_blocking(move || {
            let items: Vec<String> = choices
                .iter()
                .map(|choice| format!("{}  {}", choice.label, style(choice.description).dim()))
                .collect();
            let selected = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Please choose the type of creation you would like")
                .items(&items)
                .default(0)
                .interact_opt()
                .ok()
                .flatten()?;
            choices.get(selected).map(|choice| choice.strategy)
        })
        .await
        .ok()
        .flatten()
    }

    fn show_error(&self, message: &str) {
        eprintln!("{} {message}", style("error:").red().bold());
    }

    async fn open_document(&self, path: &Path) -> io::Result<()> {
        if !self.open_files {
            return Ok(());
        }
        let editor = std::env::var_os("VISUAL")
            .or_else(|| std::env::var_os("EDITOR"))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "neither $VISUAL nor $EDITOR is set"))?;
        tokio::process::Command::new(editor).arg(path).spawn()?;
        Ok(())
    }
}
