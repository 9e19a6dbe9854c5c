use amplify_resources::core::Storage;
use amplify_resources::utils::error::{Result, ShapeError};
use amplify_resources::utils::{logger, validation::Validate};
use amplify_resources::{
    CliConfig, EnvironmentConfig, InstanceNames, LocalStorage, ShapeChecker,
};
use anyhow::Context;
use clap::Parser;
use std::io::Write;

async fn run<S: Storage>(
    storage: S,
    config: &CliConfig,
    instances: Option<InstanceNames>,
) -> Result<String> {
    let mut checker = ShapeChecker::new(storage).strict(config.strict);
    if let Some(instances) = instances {
        checker = checker.with_instances(instances);
    }

    if config.print_shape {
        let shape = checker.describe_shape(config.document.as_deref()).await?;
        return Ok(serde_json::to_string_pretty(&shape)?);
    }

    let document = config
        .document
        .as_deref()
        .ok_or_else(|| ShapeError::MissingConfigError {
            field: "document".to_string(),
        })?;

    let report = checker.check(document).await?;
    tracing::debug!("Report: {:?}", report);
    Ok(format!("✅ {}", report))
}

fn load_environment(config: &CliConfig) -> Result<Option<InstanceNames>> {
    let Some(path) = &config.environment else {
        return Ok(None);
    };

    tracing::info!("📁 Loading environment from: {}", path);
    let environment = EnvironmentConfig::from_file(path)?;
    environment.validate()?;
    if let Some(name) = environment.name() {
        tracing::info!("Environment: {}", name);
    }
    Ok(Some(environment.instances))
}

async fn execute(config: &CliConfig) -> Result<String> {
    let instances = load_environment(config)?;

    #[cfg(feature = "s3")]
    if let Some(bucket) = &config.s3_bucket {
        let s3 = amplify_resources::S3Config::new(bucket.clone(), config.s3_region.clone());
        s3.validate()?;
        tracing::info!("Reading from s3://{} ({})", s3.bucket, s3.region);
        return run(s3.storage().await, config, instances).await;
    }

    run(LocalStorage::new(config.base_path.clone()), config, instances).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match execute(&config).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", output).context("failed to write output")?;
        }
        Err(e) => {
            tracing::error!(
                "❌ Check failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
