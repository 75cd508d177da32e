use std::{fs, path::PathBuf, process, time::Duration};

use clap::Parser;
use reckon::{Session, diagnostics::render_messages, options::OptionFlags};

/// reckon evaluates mathematical expressions exactly where it can and
/// approximately where it must.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The expression to calculate.
    expression: Option<String>,

    /// Evaluation time budget in milliseconds; 0 disables it.
    #[arg(short, long, default_value_t = 500)]
    timeout: u64,

    /// Approximate every result numerically.
    #[arg(short, long, conflicts_with = "exact")]
    approximate: bool,

    /// Keep results exact, never appending an approximation.
    #[arg(short, long)]
    exact: bool,

    /// Show non-integer rationals as fractions.
    #[arg(short, long)]
    fraction: bool,

    /// Allow identifiers that are not in the registry as free unknowns.
    #[arg(short, long)]
    unknowns: bool,

    /// Use ASCII operator signs instead of Unicode ones.
    #[arg(long)]
    ascii: bool,

    /// Emit HTML markup instead of plain text.
    #[arg(long)]
    html: bool,

    /// Output base, from 2 to 36.
    #[arg(short, long)]
    base: Option<u32>,

    /// List the known variables and exit.
    #[arg(long)]
    variables: bool,

    /// Load user variables from a JSON file before calculating.
    #[arg(short, long, value_name = "FILE")]
    define: Option<PathBuf>,

    /// Change a session option, as `key=value`. May be repeated.
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Print engine information and exit.
    #[arg(long)]
    info: bool,
}

impl Args {
    fn flags(&self) -> OptionFlags {
        let mut flags = OptionFlags::empty();
        flags.set(OptionFlags::APPROXIMATE, self.approximate);
        flags.set(OptionFlags::EXACT, self.exact);
        flags.set(OptionFlags::FRACTIONAL, self.fraction);
        flags.set(OptionFlags::UNKNOWNS, self.unknowns);
        flags.set(OptionFlags::ASCII, self.ascii);
        flags
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(2);
}

fn configure(session: &mut Session, args: &Args) {
    let markup = if args.html { "html" } else { "plain" };
    let mut options = vec![("markup".to_string(), markup.to_string())];
    if let Some(base) = args.base {
        options.push(("base".to_string(), base.to_string()));
    }
    for pair in &args.set {
        let Some((key, value)) = pair.split_once('=') else {
            fail(&format!("Expected key=value, got '{pair}'."));
        };
        options.push((key.to_string(), value.to_string()));
    }

    for (key, value) in &options {
        if let Err(e) = session.set_option(key, value) {
            fail(&e.to_string());
        }
    }

    if let Some(path) = &args.define {
        let Ok(serialized) = fs::read_to_string(path) else {
            fail(&format!("Failed to read the variable file '{}'. Perhaps this file does not exist?",
                          path.display()));
        };
        if session.set_variables(&serialized).is_err() {
            fail(render_messages(&session.take_messages()).trim_end());
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.info {
        println!("{} (interface {})", Session::info(), Session::version());
        return;
    }

    let mut session = Session::new();
    configure(&mut session, &args);

    if args.variables {
        let variables = session.get_variables();
        if args.json {
            match serde_json::to_string_pretty(&variables) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(&e.to_string()),
            }
        } else {
            for variable in variables {
                println!("{}\t{}", variable.aliases, variable.description);
            }
        }
        return;
    }

    let Some(expression) = args.expression.as_deref() else {
        fail("Nothing to calculate; pass an expression or --variables.");
    };

    let result = session.calculate(expression, Duration::from_millis(args.timeout), args.flags());
    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&e.to_string()),
        }
        return;
    }

    if !result.output.is_empty() {
        println!("{} = {}", result.input, result.output);
    }
    eprint!("{}", result.messages);
}
