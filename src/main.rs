use std::io;
use std::path::PathBuf;
use std::process;

use structopt::clap::ErrorKind;
use structopt::StructOpt;

use enterprise_lambda::config::Config;
use enterprise_lambda::harness::{Harness, Operation};
use enterprise_lambda::sam::SamCli;

/// Builds, serves and invokes the SAM application locally
#[derive(StructOpt, Debug)]
#[structopt(name = "harness")]
struct Opt {
    /// Harness config file
    #[structopt(long, default_value = "Harness.toml", parse(from_os_str))]
    config: PathBuf,
    /// SAM template (overrides [sam] template)
    #[structopt(long, parse(from_os_str))]
    template: Option<PathBuf>,
    /// Local API port (overrides [sam] port)
    #[structopt(long)]
    port: Option<u16>,
    /// Local API bind address (overrides [sam] host)
    #[structopt(long)]
    host: Option<String>,
    /// Debug logging
    #[structopt(short, long)]
    verbose: bool,
    #[structopt(subcommand)]
    op: Option<Operation>,
}

fn main() {
    let opt = match Opt::from_args_safe() {
        Ok(opt) => opt,
        Err(e) if e.kind == ErrorKind::HelpDisplayed || e.kind == ErrorKind::VersionDisplayed => {
            e.exit()
        }
        Err(e) => {
            // Bad usage is reported but, like every non-build outcome, exits 0.
            eprintln!("{}", e.message);
            return;
        }
    };

    let level = if opt.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).expect("Failed to init logger");

    let op = match opt.op {
        Some(ref op) => op.clone(),
        None => {
            let _ = Opt::clap().print_help();
            println!();
            return;
        }
    };

    // A broken config only stops a build; everything else runs on defaults.
    let mut config = match Config::load(&opt.config) {
        Ok(config) => config,
        Err(e) if op.is_fatal() => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}, using defaults", e);
            Config::default()
        }
    };
    if let Some(template) = opt.template {
        config.sam.template = template;
    }
    if let Some(port) = opt.port {
        config.sam.port = port;
    }
    if let Some(host) = opt.host {
        config.sam.host = host;
    }

    let stdout = io::stdout();
    let mut harness = Harness::new(SamCli::from(&config.sam), stdout.lock());
    let code = harness.run(&op);
    if code != 0 {
        process::exit(code);
    }
}
