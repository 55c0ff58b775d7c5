use argh::FromArgs;
use tracing::Level;
use tracing_subscriber::{filter, prelude::*};
use wheelhouse::helper;

#[derive(FromArgs, PartialEq, Debug)]
/// wheelhouse
struct MainArgs {
    #[argh(subcommand)]
    command: CommandEnum,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum CommandEnum {
    GenCRD(helper::gencrd::Args),
}

fn main() {
    let args: MainArgs = argh::from_env();

    let filter =
        filter::Targets::new().with_default(filter::LevelFilter::from_level(Level::INFO));
    let subscriber = tracing_subscriber::registry().with(filter);

    let log_mode = std::env::var("LOGGING_MODE").unwrap_or_else(|_| "plain".to_string());
    if log_mode.to_lowercase().eq("json") {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    match args.command {
        CommandEnum::GenCRD(args) => helper::gencrd::run(args),
    }
}
