use crate::apps::App;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(clap::Args, Clone)]
pub struct ListCommand {}

impl Runnable for ListCommand {
    fn runner<'a>(
        &'a self,
        writer: &'a Writer,
        config_path: Option<PathBuf>,
    ) -> impl Runner + 'a {
        ListRunner {
            writer,
            config_path,
        }
    }
}

pub(crate) struct ListRunner<'a> {
    writer: &'a Writer,
    config_path: Option<PathBuf>,
}

impl Runner for ListRunner<'_> {
    fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Print apps with their default stack ids
    fn run(&mut self) -> Result<(), Error> {
        if self.writer.is_structured() {
            let apps = App::ALL
                .iter()
                .map(|app| {
                    json!({
                        "name": app.name(),
                        "description": app.description(),
                        "stack": app.default_stack_id(),
                    })
                })
                .collect::<Vec<_>>();

            return self.writer.json(json!(apps));
        }

        let width = App::ALL.iter().map(|app| app.name().len()).max().unwrap_or(0);

        for app in App::ALL {
            self.writer.text(&format!(
                "{name}  {description} ({stack})\n",
                name = console::style(format!("{:<width$}", app.name())).bold(),
                description = app.description(),
                stack = console::style(app.default_stack_id()).dim(),
            ))?;
        }

        Ok(())
    }
}
