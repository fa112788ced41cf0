//! simpl CLI: compile, inspect and run simpl programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, I/O, lex, parse or assembly error
//! - 2: Semantic or verification error
//! - 3: Runtime error

mod commands;
mod logging;

use std::process;

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let level = match logging::take_log_flag(&mut args) {
        Ok(level) => level,
        Err(msg) => {
            eprintln!("error: {msg}");
            process::exit(1);
        }
    };
    logging::init(level);

    let Some(command) = args.first() else {
        print_usage();
        process::exit(1);
    };

    let rest = &args[1..];
    let result = match command.as_str() {
        "run" => commands::run(rest),
        "check" => commands::check(rest),
        "ir" => commands::ir(rest),
        "tokens" => commands::tokens(rest),
        "ast" => commands::ast(rest),
        "exec" => commands::exec(rest),
        "verify" => commands::verify(rest),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: simpl <command> [args] [--log LEVEL]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.simpl> [--max-depth N] [--max-steps N]   Compile and execute");
    eprintln!("  check <file.simpl>                                 Parse and type-check");
    eprintln!("  ir <file.simpl> [-o out.tac]                       Print three-address code");
    eprintln!("  tokens <file.simpl>                                Print the token stream");
    eprintln!("  ast <file.simpl>                                   Print the syntax tree");
    eprintln!("  exec <file.tac> [--max-depth N] [--max-steps N]    Execute textual IR");
    eprintln!("  verify <file.tac>                                  Statically check textual IR");
    eprintln!();
    eprintln!("Log levels: off, error, warn (default), info, debug, trace.");
    eprintln!("SIMPL_LOG sets the level when --log is absent.");
}
