use std::error::Error;
use std::sync::Arc;

use clap::Parser;

use shopping_dashboard::config::{self, Cli, Command, ServerConfig};
use shopping_dashboard::dataset::Dataset;
use shopping_dashboard::{server, tui_app};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = ServerConfig::from(args);
            config::init_logging(config.debug);
            let dataset = Arc::new(Dataset::load(&config.data_path)?);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(&config, dataset))?;
        }
        Command::Tui(args) => {
            config::init_logging(false);
            let dataset = Dataset::load(&args.data)?;
            tui_app::run(&dataset)?;
        }
    }

    Ok(())
}
