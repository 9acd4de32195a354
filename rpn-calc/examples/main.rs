use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use rpn_calc::{evaluate, tokenize, translate, RPNExpr};
use tracing::{debug, error};

/// Infix calculator: translates an expression to postfix with the shunting-yard
/// algorithm and evaluates it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Expression to evaluate. When omitted, expressions are read from stdin, one per line.
    expression: Option<String>,

    /// Treat the input as postfix (`3 4 2 * +`) and skip translation.
    #[arg(short, long)]
    postfix: bool,

    /// Print the postfix form next to the result. Always on in interactive mode.
    #[arg(short, long)]
    show_postfix: bool,

    /// Print the tokens of the infix input.
    #[arg(short, long)]
    tokens: bool,

    /// Raise the log level (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{
        filter::{LevelFilter, Targets},
        fmt::Layer,
        prelude::*,
    };

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(io::stderr)
                .with_filter(
                    Targets::new()
                        .with_default(LevelFilter::WARN)
                        .with_target("rpn_calc", level),
                ),
        )
        .init();
}

fn compute(input: &str, args: &Args) -> rpn_calc::Result<(RPNExpr, f64)> {
    let rpn = if args.postfix {
        match input.parse::<RPNExpr>() {
            Ok(rpn) => rpn,
            Err(never) => match never {},
        }
    } else {
        let tokens = tokenize(input);
        if args.tokens {
            let rendered: Vec<String> = tokens.clone().map(|t| t.to_string()).collect();
            println!("Tokens: {}", rendered.join(" "));
        }
        translate(tokens)?
    };

    let result = evaluate(&rpn)?;
    Ok((rpn, result))
}

/// `<postfix> = <result>`, or the bare result when the postfix is not wanted.
fn format_result(rpn: &RPNExpr, result: f64, show_postfix: bool) -> String {
    if show_postfix {
        format!("{} = {}", rpn, result)
    } else {
        result.to_string()
    }
}

fn interactive(args: &Args) -> io::Result<()> {
    println!("Please enter an expression to evaluate (Ctrl-D to quit):");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match compute(input, args) {
            Ok((rpn, result)) => println!("{}", format_result(&rpn, result, !args.postfix)),
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "starting");

    match &args.expression {
        Some(expression) => match compute(expression, &args) {
            Ok((rpn, result)) => {
                let show_postfix = args.show_postfix && !args.postfix;
                println!("{}", format_result(&rpn, result, show_postfix));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        None => match interactive(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(%e, "failed to read from stdin");
                ExitCode::FAILURE
            }
        },
    }
}
