use clap::Parser;
use govee_api::GoveeApiArguments;

mod commands {
    pub mod list;
    pub mod state;
}

#[derive(clap::Parser, Debug)]
#[command(version = govee_api::version_info::govee_api_version())]
pub struct Args {
    #[command(flatten)]
    api_args: GoveeApiArguments,

    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(clap::Parser, Debug)]
enum SubCommand {
    /// List the devices associated with the api key
    List(commands::list::ListCommand),
    /// Show the current state of one or all devices
    State(commands::state::StateCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loading environment overrides from {path:?}");
    }
    env_logger::init();

    let args = Args::parse();
    match &args.cmd {
        SubCommand::List(cmd) => cmd.run(&args).await,
        SubCommand::State(cmd) => cmd.run(&args).await,
    }
}
