use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use gocd_defs::{BuildVariables, LogEntry, StepConfiguration};
use gocd_step::{
    Build, CredentialStore, FileCredentialStore, GoCdBuildStep, MemoryBuildTarget,
    ReqwestTransport, StaticCredentialStore,
};
use log::{error, info};

use crate::settings::load_settings;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Settings file (YAML) with server.url, pipeline, credential and query.string
    #[arg(short, long, env = "GOCD_STEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Credentials file mapping a credential reference to username/password
    #[arg(long, env = "GOCD_CREDENTIALS_FILE")]
    pub credentials: Option<PathBuf>,

    /// Build variable available to the query string, e.g. --var buildable.diff=42
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    pub variables: Vec<(String, String)>,

    /// Identifier of the build, used in log output
    #[arg(long, default_value = "local")]
    pub build_id: String,

    /// Print the request that would be sent without sending it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Returns whether the build step succeeded.
pub async fn handle_run(args: RunArgs) -> Result<bool> {
    let settings = load_settings(args.config.as_deref())?;
    let config = StepConfiguration::from_settings(&settings)?;
    let variables: BuildVariables = args.variables.into_iter().collect();

    let credentials: Box<dyn CredentialStore> = match &args.credentials {
        Some(path) => Box::new(FileCredentialStore::new(path)),
        None => Box::new(StaticCredentialStore::new()),
    };
    let step = GoCdBuildStep::new(config, Box::new(ReqwestTransport::new()), credentials);

    if args.dry_run {
        println!("POST {}", step.schedule_url());
        println!("{}", step.query_string(&variables));
        return Ok(true);
    }

    let build = Build::new(&args.build_id);
    let target = MemoryBuildTarget::new(variables);
    let result = step.execute(&build, &target).await;

    for entry in target.entries() {
        print_entry(&entry);
    }

    match result {
        Ok(()) => {
            info!("Build {} scheduled {}", build.id, step.config().pipeline_name());
            println!("{}", "Pipeline scheduled".green());
            Ok(true)
        }
        Err(e) => {
            error!("Build {} failed: {}", build.id, e);
            eprintln!("{} {}", "Build failed:".red(), e);
            Ok(false)
        }
    }
}

fn print_entry(entry: &LogEntry) {
    println!(
        "{} {}",
        entry.timestamp.format("[%Y-%m-%d][%H:%M:%S]").to_string().dimmed(),
        entry.label.bold()
    );
    if !entry.payload.is_empty() {
        println!("> {}", entry.payload);
    }
    println!("{}", entry.text);
}
