use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::api::{find_definition, ApiClient, JobService, SourceService, UserService};
use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::domain::{SourceCreate, UserCreate, UserStatus};
use crate::failure::{attempts_from_json, resolve_failure_message};
use crate::i18n::Catalog;
use crate::output::{self, Spinner};

#[derive(Parser)]
#[command(name = "synclens")]
#[command(author, version, about = "Sync job & workspace console", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./synclens.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API root, e.g. http://localhost:8000/api/
    #[arg(short, long, global = true)]
    url: Option<String>,

    #[arg(short, long, global = true, env = "SYNCLENS_TOKEN")]
    token: Option<String>,

    /// Message file overriding the built-in English texts
    #[arg(short, long, global = true)]
    messages: Option<PathBuf>,

    /// Print JSON instead of the styled summary
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Write JSON output to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the failure details of a job's most recent attempt
    #[command(group(ArgGroup::new("input").required(true).args(["file", "job"])))]
    Failure {
        /// JSON file with attempts, a job with attempts, or a job detail
        #[arg(long)]
        file: Option<PathBuf>,

        /// Fetch the job from the API
        #[arg(long)]
        job: Option<i64>,
    },

    /// List the jobs of a connection with their failure details
    Jobs {
        #[arg(long)]
        connection: String,

        #[arg(long, value_delimiter = ',', default_value = "sync,reset_connection")]
        types: Vec<String>,
    },

    /// Manage workspace users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage source connectors
    Sources {
        #[command(subcommand)]
        command: SourceCommands,
    },

    /// Write a configuration file with default values
    InitConfig {
        #[arg(default_value = "synclens.toml")]
        path: PathBuf,

        /// Overwrite the file if it already exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Look a user up by email or by identity provider id
    #[command(group(ArgGroup::new("lookup").required(true).args(["email", "auth_id"])))]
    Get {
        #[arg(long)]
        email: Option<String>,

        #[arg(long, requires = "provider")]
        auth_id: Option<String>,

        #[arg(long)]
        provider: Option<String>,
    },

    Create {
        #[arg(long)]
        auth_id: String,

        #[arg(long)]
        provider: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        company: String,

        /// Subscribe to product news
        #[arg(long, default_value_t = false)]
        news: bool,

        /// Create the user as invited to this workspace
        #[arg(long)]
        invited_workspace: Option<String>,
    },

    /// Change the email of the current user
    ChangeEmail { email: String },

    /// Revoke a user's access to a workspace
    Remove {
        email: String,

        #[arg(long)]
        workspace: Option<String>,
    },

    /// Send sign-in links to one or more emails
    Invite {
        #[arg(required = true)]
        emails: Vec<String>,

        #[arg(long)]
        workspace: Option<String>,
    },

    List {
        #[arg(long)]
        workspace: Option<String>,
    },
}

#[derive(Subcommand)]
enum SourceCommands {
    /// Create a source from a connector definition
    Create {
        #[arg(long)]
        name: String,

        /// Source definition id or name
        #[arg(long)]
        definition: String,

        /// JSON file with the connector's connection configuration
        #[arg(long)]
        configuration: PathBuf,

        #[arg(long)]
        workspace: Option<String>,
    },
}

/// Settings resolved from the config file and command-line flags.
struct Session {
    client: ApiClient,
    catalog: Catalog,
    format: OutputFormat,
    pretty: bool,
    output: Option<PathBuf>,
    workspace_id: Option<String>,
}

impl Session {
    fn workspace<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str> {
        explicit
            .or(self.workspace_id.as_deref())
            .context("No workspace given; pass --workspace or set api.workspace-id in the config")
    }

    fn wants_json(&self) -> bool {
        self.format == OutputFormat::Json || self.output.is_some()
    }

    fn spinner(&self, message: &str) -> Option<Spinner> {
        (!self.wants_json()).then(|| Spinner::start(message))
    }

    fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    Config::default().save(path)?;
    info!("Configuration written to: {}", path.display());
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load messages from {}", path.display())),
        None => Ok(Catalog::english()),
    }
}

impl Cli {
    fn session(&self, config: Config) -> Result<Session> {
        let base_url = self.url.clone().unwrap_or(config.api.base_url);
        let token = self
            .token
            .clone()
            .or(config.api.token)
            .map(Token::from);

        let client = ApiClient::new(&base_url, token)?;
        let catalog = load_catalog(
            self.messages
                .as_deref()
                .or(config.locale.messages.as_deref()),
        )?;

        Ok(Session {
            client,
            catalog,
            format: if self.json {
                OutputFormat::Json
            } else {
                config.output.format
            },
            pretty: self.pretty || config.output.pretty,
            output: self.output.clone(),
            workspace_id: config.api.workspace_id,
        })
    }

    async fn execute_failure(
        &self,
        session: &Session,
        file: Option<&Path>,
        job: Option<i64>,
    ) -> Result<()> {
        let attempts = match (file, job) {
            (Some(path), _) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                attempts_from_json(&contents)
                    .with_context(|| format!("Failed to read attempts from {}", path.display()))?
            }
            (None, Some(job_id)) => {
                let spinner = session.spinner(&format!("Fetching job {job_id}"));
                let info = JobService::new(&session.client).get(job_id).await?;
                if let Some(spinner) = spinner {
                    spinner.clear();
                }
                info.into_job_with_attempts().attempts
            }
            (None, None) => bail!("Either --file or --job is required"),
        };

        let message = resolve_failure_message(Some(attempts.as_slice()), &session.catalog);

        if session.wants_json() {
            session.emit_json(&json!({ "message": message }))
        } else {
            output::print_failure(message.as_deref());
            Ok(())
        }
    }

    async fn execute_jobs(
        &self,
        session: &Session,
        connection: &str,
        types: &[String],
    ) -> Result<()> {
        info!("Listing jobs for connection: {connection}");

        let spinner = session.spinner("Fetching jobs");
        let jobs = JobService::new(&session.client)
            .list(connection, types)
            .await?;
        if let Some(spinner) = spinner {
            spinner.finish(&format!("Fetched {} jobs", jobs.len()));
        }

        if session.wants_json() {
            let entries: Vec<_> = jobs
                .iter()
                .map(|entry| {
                    json!({
                        "job": entry.job,
                        "attempts": entry.attempts.len(),
                        "failure": resolve_failure_message(
                            Some(entry.attempts.as_slice()),
                            &session.catalog,
                        ),
                    })
                })
                .collect();
            session.emit_json(&entries)
        } else {
            output::print_jobs(&jobs, &session.catalog);
            Ok(())
        }
    }

    async fn execute_users(&self, session: &Session, command: &UserCommands) -> Result<()> {
        let users = UserService::new(&session.client);

        let result = match command {
            UserCommands::Get {
                email,
                auth_id,
                provider,
            } => {
                let user = match (email, auth_id, provider) {
                    (Some(email), _, _) => users.get_by_email(email).await?,
                    (None, Some(auth_id), Some(provider)) => {
                        users.get_by_auth_id(auth_id, provider).await?
                    }
                    _ => bail!("Pass --email, or --auth-id together with --provider"),
                };
                vec![user]
            }
            UserCommands::Create {
                auth_id,
                provider,
                email,
                name,
                company,
                news,
                invited_workspace,
            } => {
                let create = UserCreate {
                    auth_user_id: auth_id.clone(),
                    auth_provider: provider.clone(),
                    email: email.clone(),
                    name: name.clone(),
                    company_name: company.clone(),
                    news: *news,
                    invited_workspace_id: invited_workspace.clone(),
                    status: invited_workspace.as_ref().map(|_| UserStatus::Invited),
                };
                vec![users.create(&create).await?]
            }
            UserCommands::ChangeEmail { email } => {
                users.change_email(email).await?;
                info!("Email changed to {email}");
                return Ok(());
            }
            UserCommands::Remove { email, workspace } => {
                let workspace_id = session.workspace(workspace.as_deref())?;
                users.remove(workspace_id, email).await?;
                info!("Revoked {email} from workspace {workspace_id}");
                return Ok(());
            }
            UserCommands::Invite { emails, workspace } => {
                let workspace_id = session.workspace(workspace.as_deref())?;
                users.invite(emails, workspace_id).await?
            }
            UserCommands::List { workspace } => {
                let workspace_id = session.workspace(workspace.as_deref())?;
                users.list_by_workspace_id(workspace_id).await?
            }
        };

        if session.wants_json() {
            session.emit_json(&result)
        } else {
            output::print_users(&result, &session.catalog);
            Ok(())
        }
    }

    async fn execute_source_create(
        &self,
        session: &Session,
        name: &str,
        definition: &str,
        configuration: &Path,
        workspace: Option<&str>,
    ) -> Result<()> {
        let workspace_id = session.workspace(workspace)?;
        let sources = SourceService::new(&session.client);

        let definitions = sources.list_definitions(workspace_id).await?;
        let Some(definition) = find_definition(&definitions, definition) else {
            bail!("Unknown source definition: {definition}");
        };

        let spinner = session.spinner(&format!("Loading {} specification", definition.name));
        let specification = match sources
            .get_specification(&definition.source_definition_id, workspace_id)
            .await
        {
            Ok(specification) => specification,
            Err(e) => {
                drop(spinner);
                output::print_connector_error(&e, &session.catalog);
                return Err(e).context(format!(
                    "Failed to load the specification of {}",
                    definition.name
                ));
            }
        };
        if let Some(spinner) = spinner {
            spinner.clear();
        }

        if let Some(url) = specification
            .documentation_url
            .as_ref()
            .or(definition.documentation_url.as_ref())
        {
            info!("Setup guide for {}: {url}", definition.name);
        }

        let contents = std::fs::read_to_string(configuration)
            .with_context(|| format!("Failed to read {}", configuration.display()))?;
        let connection_configuration: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", configuration.display()))?;

        let request = SourceCreate {
            name: name.to_string(),
            source_definition_id: specification.source_definition_id,
            workspace_id: workspace_id.to_string(),
            connection_configuration,
        };

        match sources.create(&request).await {
            Ok(source) if session.wants_json() => session.emit_json(&source),
            Ok(source) => {
                output::print_source(&source, &session.catalog);
                Ok(())
            }
            Err(e) => {
                output::print_form_error(&e, &session.catalog);
                Err(e).context("Failed to create source")
            }
        }
    }

    pub async fn execute(&self) -> Result<()> {
        if let Commands::InitConfig { path, force } = &self.command {
            return init_config(path, *force);
        }

        let config = Config::load(self.config.as_deref())?;
        let session = self.session(config)?;

        match &self.command {
            Commands::Failure { file, job } => {
                self.execute_failure(&session, file.as_deref(), *job).await
            }
            Commands::Jobs { connection, types } => {
                self.execute_jobs(&session, connection, types).await
            }
            Commands::Users { command } => self.execute_users(&session, command).await,
            Commands::Sources {
                command:
                    SourceCommands::Create {
                        name,
                        definition,
                        configuration,
                        workspace,
                    },
            } => {
                self.execute_source_create(
                    &session,
                    name,
                    definition,
                    configuration,
                    workspace.as_deref(),
                )
                .await
            }
            Commands::InitConfig { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mockito::{Matcher, Server};
    use tempfile::TempDir;

    fn config_with_secrets(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("mine.toml");
        std::fs::write(
            &path,
            "[api]\ntoken = \"super-secret\"\nworkspace-id = \"ws-9\"\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_failure_from_file() {
        let cli = Cli::try_parse_from(["synclens", "failure", "--file", "attempts.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Failure { file: Some(_), job: None }
        ));
    }

    #[test]
    fn test_failure_requires_an_input() {
        assert!(Cli::try_parse_from(["synclens", "failure"]).is_err());
    }

    #[test]
    fn test_jobs_types_default_and_split() {
        let cli = Cli::try_parse_from(["synclens", "jobs", "--connection", "c1"]).unwrap();
        let Commands::Jobs { types, .. } = cli.command else {
            panic!("expected jobs command");
        };
        assert_eq!(types, vec!["sync", "reset_connection"]);

        let cli =
            Cli::try_parse_from(["synclens", "jobs", "--connection", "c1", "--types", "sync"])
                .unwrap();
        let Commands::Jobs { types, .. } = cli.command else {
            panic!("expected jobs command");
        };
        assert_eq!(types, vec!["sync"]);
    }

    #[test]
    fn test_users_get_auth_id_requires_provider() {
        assert!(Cli::try_parse_from(["synclens", "users", "get", "--auth-id", "a1"]).is_err());
        assert!(Cli::try_parse_from([
            "synclens",
            "users",
            "get",
            "--auth-id",
            "a1",
            "--provider",
            "google_identity_platform"
        ])
        .is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "synclens",
            "users",
            "list",
            "--workspace",
            "ws-1",
            "--json",
            "--url",
            "https://cloud.example.com/api",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.url.as_deref(), Some("https://cloud.example.com/api"));
    }

    #[test]
    fn test_session_prefers_flags_over_config() {
        let cli = Cli::try_parse_from([
            "synclens",
            "--json",
            "--url",
            "https://flag.example.com/api/",
            "users",
            "list",
        ])
        .unwrap();

        let mut config = Config::default();
        config.api.base_url = "https://config.example.com/api/".to_string();
        config.api.workspace_id = Some("ws-config".to_string());

        let session = cli.session(config).unwrap();
        assert_eq!(
            session.client.api_url().as_str(),
            "https://flag.example.com/api/"
        );
        assert!(session.wants_json());
        assert_eq!(session.workspace(None).unwrap(), "ws-config");
        assert_eq!(session.workspace(Some("ws-flag")).unwrap(), "ws-flag");
    }

    #[test]
    fn test_session_without_workspace_fails() {
        let cli = Cli::try_parse_from(["synclens", "users", "list"]).unwrap();
        let session = cli.session(Config::default()).unwrap();
        assert!(session.workspace(None).is_err());
    }

    #[tokio::test]
    async fn test_init_config_writes_defaults_not_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let mine = config_with_secrets(&dir);
        let target = dir.path().join("new.toml");

        let cli = Cli::try_parse_from([
            "synclens",
            "--config",
            mine.to_str().unwrap(),
            "init-config",
            target.to_str().unwrap(),
        ])
        .unwrap();
        cli.execute().await.unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(!written.contains("super-secret"));
        assert!(!written.contains("ws-9"));
        assert!(written.contains("http://localhost:8000/api/"));
    }

    #[test]
    fn test_init_config_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let existing = config_with_secrets(&dir);

        assert!(init_config(&existing, false).is_err());
        let untouched = std::fs::read_to_string(&existing).unwrap();
        assert!(untouched.contains("super-secret"));

        init_config(&existing, true).unwrap();
        let overwritten = std::fs::read_to_string(&existing).unwrap();
        assert!(!overwritten.contains("super-secret"));
    }

    async fn source_create_setup(server: &mut Server, dir: &TempDir) -> Cli {
        server
            .mock("POST", "/api/v1/source_definitions/list_for_workspace")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"sourceDefinitions": [
                    {"sourceDefinitionId": "def-1", "name": "Postgres"}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let config = dir.path().join("synclens.toml");
        std::fs::write(&config, "[api]\nworkspace-id = \"ws-1\"\n").unwrap();
        let configuration = dir.path().join("postgres.json");
        std::fs::write(&configuration, r#"{"host": "db.local"}"#).unwrap();
        let url = format!("{}/api/", server.url());

        Cli::try_parse_from([
            "synclens",
            "--json",
            "--config",
            config.to_str().unwrap(),
            "--url",
            url.as_str(),
            "sources",
            "create",
            "--name",
            "prod db",
            "--definition",
            "postgres",
            "--configuration",
            configuration.to_str().unwrap(),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_source_create_submits_specification_definition_id() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let cli = source_create_setup(&mut server, &dir).await;

        let specification = server
            .mock("POST", "/api/v1/source_definition_specifications/get")
            .match_body(Matcher::Json(
                json!({"sourceDefinitionId": "def-1", "workspaceId": "ws-1"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"sourceDefinitionId": "def-1-spec"}).to_string())
            .create_async()
            .await;
        let create = server
            .mock("POST", "/api/v1/sources/create")
            .match_body(Matcher::PartialJson(
                json!({"sourceDefinitionId": "def-1-spec", "workspaceId": "ws-1"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"sourceId": "src-1", "name": "prod db"}).to_string())
            .create_async()
            .await;

        cli.execute().await.unwrap();

        specification.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_source_create_stops_when_specification_fails() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let cli = source_create_setup(&mut server, &dir).await;

        server
            .mock("POST", "/api/v1/source_definition_specifications/get")
            .with_status(500)
            .with_body(r#"{"message": "Could not pull connector image"}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/api/v1/sources/create")
            .expect(0)
            .create_async()
            .await;

        let err = cli.execute().await.unwrap_err();

        assert!(err.to_string().contains("specification of Postgres"));
        create.assert_async().await;
    }
}
