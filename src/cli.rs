use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "chatcal",
    about = "Extract calendar events from free-form text using a local text-generation model",
    version
)]
pub struct Cli {
    /// Text describing one or more events.
    #[arg(value_name = "TEXT")]
    pub input: String,
}
