use crate::apps::App;
use crate::commands::synth::{write_template, SynthCommand};
use crate::error::Error;
use crate::runner::Runner;
use crate::writer::Writer;
use common::{Stack, Template};
use serde_json::json;
use std::path::{Path, PathBuf};
use url::Url;

pub(crate) struct SynthRunner<'a> {
    pub(crate) command: &'a SynthCommand,
    pub(crate) writer: &'a Writer,
    pub(crate) config_path: Option<PathBuf>,
}

impl SynthRunner<'_> {
    /// Declare and render the stack of a single app
    fn synth(
        &self,
        app: App,
        stack_id: &str,
        endpoint: Option<&Url>,
    ) -> Result<(Stack, Template), Error> {
        log::debug!("Synthesizing {app} as stack {stack_id}");
        let stack = app.stack(stack_id, endpoint)?;
        let template = Template::from_stack(&stack)?;
        Ok((stack, template))
    }
}

impl Runner for SynthRunner<'_> {
    fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Render templates for the selected apps
    ///
    /// Every stack is declared and rendered before anything is written out.
    fn run(&mut self) -> Result<(), Error> {
        let apps = self.command.selected();

        if self.command.stack_id.is_some() && apps.len() > 1 {
            return Err(self.error(
                Some("Stack id is ambiguous"),
                Some("Pass --stack-id together with a single app."),
                None,
            ));
        }

        let settings = self.settings()?;

        // Flags take precedence over the settings file
        let endpoint = self.command.endpoint.clone().or(settings.sns.endpoint);
        let out = self.command.out.clone().or(settings.synth.out);

        let mut rendered = vec![];

        for app in apps {
            let stack_id = self
                .command
                .stack_id
                .clone()
                .unwrap_or(app.default_stack_id().to_string());

            rendered.push(self.synth(app, &stack_id, endpoint.as_ref())?);
        }

        for (stack, template) in rendered.iter() {
            let Some(dir) = &out else {
                if self.writer.is_structured() {
                    self.writer.json(json!({
                        "stack": stack.name(),
                        "template": template.as_value(),
                    }))?;
                } else {
                    self.writer.text(&format!("{template}\n"))?;
                }

                continue;
            };

            let path = write_template(dir, stack, template)?;

            self.writer.json(json!({
                "stack": stack.name(),
                "path": path.display().to_string(),
            }))?;

            self.writer.text(&format!(
                "{} {} to {}\n",
                console::style("Synthesized").green().bold(),
                stack.name(),
                path.display()
            ))?;
        }

        Ok(())
    }
}
