use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use jira_activity_config::Config;
use tracing::info;

#[derive(Subcommand, Debug, Clone)]
pub enum OptionsCommand {
    /// Print the effective options
    Show,
    /// Save default options
    Save {
        /// Default project key or name
        #[arg(long)]
        project: Option<String>,
        /// Default user for the activity feed
        #[arg(long)]
        user: Option<String>,
        /// Default maximum number of results
        #[arg(long)]
        maximum_results: Option<u32>,
        /// JIRA server URL
        #[arg(long)]
        server: Option<String>,
        /// Account email used with JIRA_ACTIVITY_TOKEN
        #[arg(long)]
        email: Option<String>,
    },
}

pub fn handle(command: OptionsCommand, config: &mut Config, path: Option<&Path>) -> Result<String> {
    match command {
        OptionsCommand::Show => Ok(describe(config)),
        OptionsCommand::Save {
            project,
            user,
            maximum_results,
            server,
            email,
        } => {
            if let Some(project) = project {
                config.project = project;
            }
            if let Some(user) = user {
                config.user = user;
            }
            if let Some(max) = maximum_results {
                config.maximum_results = max;
            }
            if let Some(server) = server {
                config.base_url = server;
            }
            if let Some(email) = email {
                config.email = Some(email).filter(|e| !e.trim().is_empty());
            }

            let written = config.save(path)?;
            info!(path = %written.display(), "Options saved");
            Ok("Options saved.".to_string())
        }
    }
}

fn describe(config: &Config) -> String {
    format!(
        "base_url: {}\nproject: {}\nuser: {}\nmaximum_results: {}\nemail: {}",
        config.base_url,
        config.project,
        config.user,
        config.maximum_results,
        config.email.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_defaults() {
        let mut config = Config::default();
        let out = handle(OptionsCommand::Show, &mut config, None).unwrap();
        assert!(out.contains("project: Sunshine"));
        assert!(out.contains("user: nyx.linden"));
        assert!(out.contains("maximum_results: 50"));
    }

    #[test]
    fn test_save_updates_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = Config::default();

        let out = handle(
            OptionsCommand::Save {
                project: Some("Viewer".into()),
                user: None,
                maximum_results: Some(20),
                server: None,
                email: None,
            },
            &mut config,
            Some(path.as_path()),
        )
        .unwrap();

        assert_eq!(out, "Options saved.");
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.project, "Viewer");
        assert_eq!(loaded.user, "nyx.linden");
        assert_eq!(loaded.maximum_results, 20);
    }

    #[test]
    fn test_save_blank_email_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = Config {
            email: Some("old@example.com".into()),
            ..Default::default()
        };

        handle(
            OptionsCommand::Save {
                project: None,
                user: None,
                maximum_results: None,
                server: None,
                email: Some(String::new()),
            },
            &mut config,
            Some(path.as_path()),
        )
        .unwrap();

        assert!(config.email.is_none());
    }
}
