// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Dir, File, Init, Size, Watch};

command_enum! {
    (Init, Init),
    (File, File),
    (Dir, Dir),
    (Size, Size),
    (Watch, Watch),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = cli::logging::init_logging(args.log_level);

    // Build context - the API client is only present when a key was found
    let ctx = match cli::op::OpContext::new(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // exit() skips destructors, flush the log writer first
    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    drop(log_guard);
    std::process::exit(code);
}
