use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use enterprise_lambda::config::Config;
use enterprise_lambda::lambda::{self, Credentials, LambdaInvoker};
use enterprise_lambda::validator::{self, Check};

/// Invokes deployed functions and checks their responses for expected content
#[derive(StructOpt, Debug)]
#[structopt(name = "validate-deploy")]
struct Opt {
    /// Harness config file
    #[structopt(long, default_value = "Harness.toml", parse(from_os_str))]
    config: PathBuf,
    /// AWS region (overrides [validate] region, then AWS_DEFAULT_REGION)
    #[structopt(long)]
    region: Option<String>,
    /// AWS Access Key
    #[structopt(long)]
    access_key: Option<String>,
    /// AWS Secret Key
    #[structopt(long)]
    secret_key: Option<String>,
    /// Check as FUNCTION=SUBSTRING, repeatable (replaces [[validate.checks]])
    /// (e.g. "MyEnterpriseLambda=Hello from Lambda part 1")
    #[structopt(long = "check")]
    checks: Vec<Check>,
    /// Exit non-zero when any check fails
    #[structopt(long)]
    fail_on_error: bool,
    /// Debug logging
    #[structopt(short, long)]
    verbose: bool,
}

fn main() {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).expect("Failed to init logger");

    let config = match Config::load(&opt.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let checks = if !opt.checks.is_empty() {
        opt.checks.clone()
    } else if !config.validate.checks.is_empty() {
        config.validate.checks.into_iter().map(Check::from).collect()
    } else {
        vec![Check::default()]
    };

    let credentials = Credentials {
        access_key: opt.access_key.clone(),
        secret_key: opt.secret_key.clone(),
    };
    let region = opt.region.as_deref().or(config.validate.region.as_deref());
    let client = match lambda::create_client(&credentials, region) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    println!("Testing Lambda function deployment...");
    let report = validator::validate(&LambdaInvoker::new(client), &checks);
    print!("{}", report);

    if opt.fail_on_error && !report.all_passed() {
        process::exit(1);
    }
}
