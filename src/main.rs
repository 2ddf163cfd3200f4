use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use jobopt::args::{tokenize, Action, Token};
use jobopt::env::ProcessEnv;
use jobopt::frontend::{Resolution, Resolver};
use jobopt::logging;
use jobopt::options::{codes, render, Context};

#[derive(Parser, Debug)]
#[command(name = "jobopt", version, about = "Resolve job options from arguments and environment")]
struct Cli {
    /// Print the resolution as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    program: Program,
}

#[derive(Subcommand, Debug)]
enum Program {
    /// Interactive allocation
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Alloc {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Batch submission
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Batch {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Step launch
    #[command(disable_help_flag = true, disable_version_flag = true)]
    Step {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Program {
    fn context(&self) -> Context {
        match self {
            Program::Alloc { .. } => Context::Alloc,
            Program::Batch { .. } => Context::Batch,
            Program::Step { .. } => Context::Step,
        }
    }

    fn args(&self) -> &[String] {
        match self {
            Program::Alloc { args } | Program::Batch { args } | Program::Step { args } => args,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = cli.program.context();
    let raw_args = cli.program.args();
    let mut resolver = Resolver::load(ctx).context("failed to load site configuration")?;

    logging::init_tracing(verbosity(&resolver, raw_args));

    let resolution = resolver.resolve(&ProcessEnv, raw_args)?;
    match resolution.action {
        Some(Action::Help | Action::Usage) => {
            print!("{}", resolver.grammar().usage(ctx));
            return Ok(());
        }
        Some(Action::Version) => {
            println!("jobopt {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        None => {}
    }

    for component in &resolution.components {
        if component.options.verbose > 0 {
            eprint!("{}", render(component.report.iter().map(|(n, v)| (n, v))));
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        print!("{}", summary(&resolution));
    }
    Ok(())
}

/// Count of `-v` flags before the first command word, for log setup.
fn verbosity(resolver: &Resolver<'_>, raw_args: &[String]) -> i32 {
    let Ok(tokens) = tokenize(raw_args, resolver.grammar()) else {
        return 0;
    };
    let count = tokens
        .iter()
        .filter(|t| matches!(t, Token::Option { code, .. } if *code == codes::VERBOSE))
        .count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn summary(resolution: &Resolution) -> String {
    let mut out = String::new();
    for (index, component) in resolution.components.iter().enumerate() {
        let opts = &component.options;
        out.push_str(&format!("component {} ({})\n", index, resolution.context));
        out.push_str(&format!("  command   : {}\n", component.command.join(" ")));
        out.push_str(&format!("  job name  : {}\n", opts.job_name.as_deref().unwrap_or("unset")));
        out.push_str(&format!("  ntasks    : {}\n", opts.ntasks));
        out.push_str(&format!("  nodes     : {}\n", opts.nodes));
        out.push_str(&format!("  partition : {}\n", opts.partition.as_deref().unwrap_or("unset")));
        out.push_str(&format!("  job flags : {:#x}\n", component.job_flags));
        for (name, value) in &component.exports {
            out.push_str(&format!("  export {}={}\n", name, value));
        }
    }
    out
}
