use anyhow::Result;
use hotfiles::cli::Cli;
use hotfiles::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);
    cli.execute()
}
