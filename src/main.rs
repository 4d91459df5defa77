use clap::Parser;
use rowbind::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("rowbind - Bind CSV rows to typed records");
    println!("========================================");
    println!();
    println!("Reads CSV input through a JSON mapping declaration, converting every");
    println!("mapped cell to its declared type and checking mandatory fields.");
    println!();
    println!("USAGE:");
    println!("    rowbind <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    check       Validate input against a mapping declaration");
    println!("    convert     Bind input and write it back under the regenerated header");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Check that every row of a file binds:");
    println!("    rowbind check --mapping people.json --input people.csv");
    println!();
    println!("    # Rewrite a file with a sorted header, skipping comment rows:");
    println!("    rowbind convert -m people.json -i people.csv -o clean.csv --skip-marker '#'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    rowbind <COMMAND> --help");
}
