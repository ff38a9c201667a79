mod runner;
use crate::apps::App;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use common::{Stack, Template};
use eyre::WrapErr;
use runner::SynthRunner;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(clap::Args, Clone)]
pub struct SynthCommand {
    /// Apps to synthesize
    #[arg(value_enum, required_unless_present = "all", conflicts_with = "all")]
    pub apps: Vec<App>,

    /// Synthesize every app
    #[arg(long)]
    pub all: bool,

    /// Stack id, defaults to the app's own one (only with a single app)
    #[arg(short, long)]
    pub stack_id: Option<String>,

    /// HTTP(S) endpoint subscribed to the SNS topic
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<Url>,

    /// Write templates into the directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

impl SynthCommand {
    /// Apps selected on the command line, in the order given, without repetitions
    pub(crate) fn selected(&self) -> Vec<App> {
        if self.all {
            return App::ALL.to_vec();
        }

        let mut apps: Vec<App> = vec![];

        for app in self.apps.iter() {
            if !apps.contains(app) {
                apps.push(*app);
            }
        }

        apps
    }
}

impl Runnable for SynthCommand {
    fn runner<'a>(
        &'a self,
        writer: &'a Writer,
        config_path: Option<PathBuf>,
    ) -> impl Runner + 'a {
        SynthRunner {
            command: self,
            writer,
            config_path,
        }
    }
}

/// Path of the rendered template of a stack within the output dir
pub fn template_path(dir: &Path, stack: &Stack) -> PathBuf {
    dir.join(format!("{}.template.json", stack.name()))
}

/// Write the template of the stack into the output dir, creating the dir if needed
pub fn write_template(dir: &Path, stack: &Stack, template: &Template) -> eyre::Result<PathBuf> {
    fs::create_dir_all(dir).wrap_err(format!("Failed to create {dir:?}"))?;
    let path = template_path(dir, stack);

    fs::write(&path, format!("{template}\n")).wrap_err(format!("Failed to write {path:?}"))?;

    log::info!("Wrote template of {} to {path:?}", stack.name());
    Ok(path)
}
