//! `docgate validate` command.
//!
//! Checks the API key file and every instance's credentials without
//! opening any connection. Useful before `docgate serve`.

use clap::Args;

use docgate_config::DocgateConfig;
use docgate_transport_http::ApiKeyGate;
use docgate_types::InstanceType;

use crate::output;

/// Validate configuration without connecting.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Fail when any instance is unusable, not only when all are.
    #[arg(long)]
    pub strict: bool,
}

/// Per-type result of credential validation.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct InstanceReport {
    pub instance: InstanceType,
    pub problem: Option<String>,
}

pub(crate) fn check_instances(config: &DocgateConfig) -> Vec<InstanceReport> {
    InstanceType::ALL
        .into_iter()
        .map(|instance| {
            let section = config.instances.for_type(instance);
            let problem = if !section.is_configured() {
                Some("not configured".to_string())
            } else {
                section
                    .to_credentials()
                    .validate()
                    .err()
                    .map(|e| e.to_string())
            };
            InstanceReport { instance, problem }
        })
        .collect()
}

/// Executes the validate command.
pub fn execute(args: &ValidateArgs, config: &DocgateConfig) -> anyhow::Result<()> {
    println!("Checking API key...");
    let gate = ApiKeyGate::from_config(&config.auth)
        .map_err(|e| anyhow::anyhow!(output::diagnostic(&e)))?;
    println!("  Header:      {}", gate.header_name().as_str());

    println!("Checking instances ({} backend)...", config.store.backend);
    let reports = check_instances(config);
    for report in &reports {
        match &report.problem {
            None => println!(
                "  {:<8} ok ({})",
                report.instance.display_name(),
                config.instances.for_type(report.instance).identifier
            ),
            Some(problem) => {
                println!("  {:<8} skipped: {problem}", report.instance.display_name());
            }
        }
    }

    let usable = reports.iter().filter(|r| r.problem.is_none()).count();
    if usable == 0 {
        anyhow::bail!("no instance has usable credentials; every request would fail");
    }
    if args.strict && usable < reports.len() {
        anyhow::bail!("{} of {} instances are unusable", reports.len() - usable, reports.len());
    }

    output::print_success(&format!(
        "configuration is valid ({usable} of {} instances usable)",
        reports.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_and_weak_instances_are_reported() {
        let mut config = DocgateConfig::default();
        config.instances.primary.identifier = "master".into();
        config.instances.primary.host = "db".into();
        config.instances.primary.port = 27017;
        config.instances.primary.user = "gateway".into();
        config.instances.primary.password = "p".repeat(21);
        config.instances.game.identifier = "game".into();
        config.instances.game.host = "db".into();
        config.instances.game.port = 27017;
        config.instances.game.user = "gateway".into();
        config.instances.game.password = "short".into();

        let reports = check_instances(&config);
        assert_eq!(reports[0].problem, None);
        assert_eq!(reports[1].problem.as_deref(), Some("not configured"));
        assert!(reports[2].problem.is_some());
    }

    #[test]
    fn strict_mode_rejects_partial_configuration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_path = dir.path().join("api.key");
        std::fs::write(&key_path, "s3cret\n").expect("write key");

        let mut config = DocgateConfig::default();
        config.auth.api_key_path = Some(key_path);
        config.instances.network.identifier = "network".into();
        config.instances.network.host = "db".into();
        config.instances.network.port = 27017;
        config.instances.network.user = "gateway".into();
        config.instances.network.password = "n".repeat(24);

        execute(&ValidateArgs { strict: false }, &config).expect("one usable instance");
        let err = execute(&ValidateArgs { strict: true }, &config).expect_err("strict");
        assert!(err.to_string().contains("2 of 3"));
    }

    #[test]
    fn missing_key_file_fails_validation() {
        let config = DocgateConfig::default();
        let err = execute(&ValidateArgs { strict: false }, &config).expect_err("no key");
        assert!(err.to_string().contains("no API key file"));
    }
}
