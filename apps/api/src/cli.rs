//! `sieve` — screen one resume against one job description from the shell.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use sieve_api::config::Config;
use sieve_api::screening::ScreeningPipeline;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!(
            "Usage: sieve path/to/resume.{{pdf,md,txt}} path/to/job_description.{{pdf,md,txt}}"
        );
        std::process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(resume: &str, jd: &str) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let pipeline = ScreeningPipeline::from_config(&config).await?;
    let state = pipeline.run(Path::new(resume), Path::new(jd), None).await?;

    println!("Experience Level: {}", state.experience_level);
    println!("Skill Match:      {}", state.skill_match);
    println!("Action Taken:     {}", state.response);
    Ok(())
}
