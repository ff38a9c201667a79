pub mod list;
pub mod synth;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// List the sample apps that can be synthesized
    List(list::ListCommand),

    /// Render CloudFormation templates for one or more apps
    Synth(synth::SynthCommand),
}
