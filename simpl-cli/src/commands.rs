//! CLI command implementations.
//!
//! Each command returns `Err(exit_code)` after printing its diagnostics.

use std::fs;
use std::io::{self, Write};

use simpl_common::Program;
use simpl_frontend::ast::Block;
use simpl_vm::VmConfig;
use tracing::info;

/// Compile and execute a source file.
pub fn run(args: &[String]) -> Result<(), i32> {
    let (input, config) = input_with_limits(args, "run", "<file.simpl>")?;
    let program = compile(input)?;
    verify_program(&program)?;
    execute(&program, config)
}

/// Parse and analyze a source file without running it.
pub fn check(args: &[String]) -> Result<(), i32> {
    let input = single_input(args, "check", "<file.simpl>")?;
    let ast = parse_source(input)?;
    analyze(input, &ast)?;
    println!("OK: {input}");
    Ok(())
}

/// Print the three-address code for a source file, or write it with `-o`.
pub fn ir(args: &[String]) -> Result<(), i32> {
    let usage = "<file.simpl> [-o out.tac]";
    let Some(input) = args.first() else {
        return Err(usage_error("ir", usage));
    };
    let output = match &args[1..] {
        [] => None,
        [flag, path] if flag == "-o" => Some(path),
        _ => return Err(usage_error("ir", usage)),
    };

    let program = compile(input)?;
    let text = simpl_assembler::disassemble(&program);
    match output {
        None => print!("{text}"),
        Some(path) => {
            fs::write(path, &text).map_err(|e| {
                eprintln!("error: cannot write '{path}': {e}");
                1
            })?;
            eprintln!("wrote {} instructions -> {path}", program.len());
        }
    }
    Ok(())
}

/// Print the token stream of a source file.
pub fn tokens(args: &[String]) -> Result<(), i32> {
    let input = single_input(args, "tokens", "<file.simpl>")?;
    let source = read_file(input)?;
    let tokens = simpl_frontend::tokenize(&source).map_err(|e| {
        eprintln!("error: {input}:{e}");
        1
    })?;
    print!("{}", simpl_frontend::dump_tokens(&tokens));
    Ok(())
}

/// Print the syntax tree of a source file.
pub fn ast(args: &[String]) -> Result<(), i32> {
    let input = single_input(args, "ast", "<file.simpl>")?;
    let ast = parse_source(input)?;
    print!("{}", simpl_frontend::dump_ast(&ast));
    Ok(())
}

/// Assemble, verify and execute a textual IR file.
pub fn exec(args: &[String]) -> Result<(), i32> {
    let (input, config) = input_with_limits(args, "exec", "<file.tac>")?;
    let program = assemble_file(input)?;
    verify_program(&program)?;
    execute(&program, config)
}

/// Assemble and statically check a textual IR file.
pub fn verify(args: &[String]) -> Result<(), i32> {
    let input = single_input(args, "verify", "<file.tac>")?;
    let program = assemble_file(input)?;
    verify_program(&program)?;
    println!("OK: {input} ({} instructions)", program.len());
    Ok(())
}

// ---- Pipeline steps ----

fn read_file(input: &str) -> Result<String, i32> {
    fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })
}

fn parse_source(input: &str) -> Result<Block, i32> {
    let source = read_file(input)?;
    simpl_frontend::parse(&source).map_err(|e| {
        eprintln!("error: {input}:{e}");
        1
    })
}

fn analyze(input: &str, ast: &Block) -> Result<(), i32> {
    simpl_frontend::analyze(ast).map_err(|e| {
        eprintln!("error: {input}:{e}");
        2
    })
}

fn compile(input: &str) -> Result<Program, i32> {
    let ast = parse_source(input)?;
    analyze(input, &ast)?;
    let program = simpl_irgen::generate(&ast);
    info!(input, instructions = program.len(), "compiled");
    Ok(program)
}

fn assemble_file(input: &str) -> Result<Program, i32> {
    let text = read_file(input)?;
    simpl_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {input}: {e}");
        1
    })
}

fn verify_program(program: &Program) -> Result<(), i32> {
    simpl_verifier::verify(program).map_err(|errors| {
        for e in &errors {
            eprintln!("error: {e}");
        }
        2
    })
}

/// Run on stdout. The value `main` returns is not printed.
fn execute(program: &Program, config: VmConfig) -> Result<(), i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = simpl_vm::run_with_config(program, &mut out, config);
    // Output written before a failure must reach the terminal first.
    let _ = out.flush();
    match result {
        Ok(value) => {
            info!(returned = ?value, "program finished");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

// ---- Argument handling ----

fn usage_error(command: &str, usage: &str) -> i32 {
    eprintln!("error: {command} requires {usage}");
    eprintln!("Usage: simpl {command} {usage}");
    1
}

fn single_input<'a>(args: &'a [String], command: &str, usage: &str) -> Result<&'a str, i32> {
    match args {
        [input] => Ok(input.as_str()),
        _ => Err(usage_error(command, usage)),
    }
}

/// `<input> [--max-depth N] [--max-steps N]`, flags in any order.
fn input_with_limits<'a>(
    args: &'a [String],
    command: &str,
    input_name: &str,
) -> Result<(&'a str, VmConfig), i32> {
    let usage = format!("{input_name} [--max-depth N] [--max-steps N]");
    let Some(input) = args.first() else {
        return Err(usage_error(command, &usage));
    };

    let mut config = VmConfig::default();
    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        let value = rest.next();
        match (flag.as_str(), value) {
            ("--max-depth", Some(v)) => {
                config = config.with_max_call_depth(parse_limit(flag, v)?);
            }
            ("--max-steps", Some(v)) => {
                config = config.with_max_steps(Some(parse_limit(flag, v)?));
            }
            _ => return Err(usage_error(command, &usage)),
        }
    }
    Ok((input.as_str(), config))
}

fn parse_limit<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, i32> {
    value.parse().map_err(|_| {
        eprintln!("error: {flag} expects a non-negative integer, got '{value}'");
        1
    })
}
