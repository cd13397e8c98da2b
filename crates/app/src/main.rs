// CLI modules
mod args;
#[macro_use]
mod op;
mod ops;

use args::Args;
use clap::Parser;
use ops::{Daemon, Node, Root, Version};
use ops::{Cat, Ls, Put, Resolve, Rm, Sign};

command_enum! {
    (Node, Node),
    (Root, Root),
    (Resolve, Resolve),
    (Ls, Ls),
    (Cat, Cat),
    (Put, Put),
    (Rm, Rm),
    (Sign, Sign),
    (Daemon, Daemon),
    (Version, Version),
}

fn main() {
    let args = Args::parse();

    // The daemon sizes its own worker pool; everything else takes the
    // runtime defaults.
    let workers = match &args.command {
        Command::Daemon(daemon) => daemon.configured_workers(),
        _ => None,
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(workers) = workers {
        builder.worker_threads(workers);
    }
    let runtime = match builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        // Build context - always has API client initialized
        let ctx = match op::OpContext::new(args.api_url) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("Error: Failed to create API client: {}", e);
                std::process::exit(1);
            }
        };

        match args.command.execute(&ctx).await {
            Ok(output) => {
                println!("{}", output);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    })
}
