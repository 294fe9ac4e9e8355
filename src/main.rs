use colored::Colorize;
use std::process;
use treesort::cli::args::CLIArgs;
use treesort::core::copy::delete_tree;
use treesort::core::sorter::TreeSorter;
use treesort::error::SortError;
use treesort::utility::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CLIArgs::parse();
    let options = match args.validate() {
        Ok(validated) => validated,
        Err(e) => exit_with(e),
    };
    init_logging(options.verbose);

    if let Err(e) = TreeSorter::new(&options).sort().await {
        exit_with(e);
    }
    println!("Done!");

    if options.delete {
        if let Err(e) = delete_tree(&options.source).await {
            exit_with(e);
        }
        println!("Source folder was deleted");
    }
}

fn exit_with(error: SortError) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    process::exit(error.exit_code());
}
