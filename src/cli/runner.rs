//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, Commands, DatabaseCommands, OutputFormat, VipCommands, VipCreateArgs, VipListArgs,
};
use crate::client::ServiceClient;
use crate::config::{CloudConfig, CloudsFile};
use crate::error::{Error, Result, ResultExt};
use crate::resources::{databases, vips};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let cloud = self.load_cloud()?;

        match &self.cli.command {
            Commands::Vips { command } => {
                let client = cloud.network_client()?;
                self.vips(&client, command).await
            }
            Commands::Databases { command } => {
                let client = cloud.database_client()?;
                self.databases(&client, command).await
            }
        }
    }

    /// Resolve the cloud from `--cloud-config`/`--cloud`, or the environment
    fn load_cloud(&self) -> Result<CloudConfig> {
        let Some(path) = &self.cli.cloud_config else {
            if self.cli.cloud.is_some() {
                return Err(Error::config("--cloud requires --cloud-config"));
            }
            debug!("Using cloud from OS_* environment");
            return Ok(CloudConfig::from_env());
        };

        let file = CloudsFile::load(path)?;
        let cloud = match &self.cli.cloud {
            Some(name) => file.cloud(name)?,
            None if file.clouds.len() == 1 => file
                .clouds
                .values()
                .next()
                .ok_or_else(|| Error::config("no clouds defined"))?,
            None => {
                return Err(Error::config(format!(
                    "{} defines {} clouds; choose one with --cloud",
                    path.display(),
                    file.clouds.len()
                )))
            }
        };
        Ok(cloud.clone())
    }

    // ========================================================================
    // Virtual IPs
    // ========================================================================

    async fn vips(&self, client: &ServiceClient, command: &VipCommands) -> Result<()> {
        match command {
            VipCommands::List(args) => {
                let opts = vip_list_opts(args);
                let mut count = 0usize;
                vips::list(client, &opts)
                    .each_page(|page| {
                        for vip in vips::extract_vips(&page)? {
                            self.emit(&vip)?;
                            count += 1;
                        }
                        Ok(true)
                    })
                    .await?;
                info!(count, "Listed virtual IPs");
                Ok(())
            }
            VipCommands::Get { id } => self.emit(&vips::get(client, id).await?),
            VipCommands::Create(args) => {
                let vip = vips::create(client, &vip_create_opts(args)).await?;
                self.emit(&vip)
            }
            VipCommands::Delete { id } => vips::delete(client, id).await,
        }
    }

    // ========================================================================
    // Databases
    // ========================================================================

    async fn databases(&self, client: &ServiceClient, command: &DatabaseCommands) -> Result<()> {
        match command {
            DatabaseCommands::List { instance, limit } => {
                let opts = databases::ListOpts {
                    limit: *limit,
                    marker: None,
                };
                let mut count = 0usize;
                databases::list(client, instance, &opts)
                    .each_page(|page| {
                        for db in databases::extract_databases(&page)? {
                            self.emit(&db)?;
                            count += 1;
                        }
                        Ok(true)
                    })
                    .await?;
                info!(count, "Listed databases");
                Ok(())
            }
            DatabaseCommands::Create {
                instance,
                names,
                character_set,
                collate,
            } => {
                let batch = databases::BatchCreateOpts(
                    names
                        .iter()
                        .map(|name| databases::CreateOpts {
                            name: name.clone(),
                            character_set: character_set.clone(),
                            collate: collate.clone(),
                        })
                        .collect(),
                );
                databases::create(client, instance, &batch).await
            }
            DatabaseCommands::Delete { instance, name } => {
                databases::delete(client, instance, name).await
            }
        }
    }

    /// Print one record in the selected format
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
        .context("Failed to render record")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        Ok(())
    }
}

fn vip_list_opts(args: &VipListArgs) -> vips::ListOpts {
    vips::ListOpts {
        name: args.name.clone(),
        status: args.status.clone(),
        tenant_id: args.tenant_id.clone(),
        subnet_id: args.subnet_id.clone(),
        protocol: args.protocol.clone(),
        protocol_port: args.protocol_port,
        admin_state_up: args.admin_state_up,
        limit: args.limit,
        sort_key: args.sort_key.clone(),
        sort_dir: args.sort_dir.clone(),
        ..Default::default()
    }
}

fn vip_create_opts(args: &VipCreateArgs) -> vips::CreateOpts {
    vips::CreateOpts {
        name: args.name.clone(),
        subnet_id: args.subnet_id.clone(),
        protocol: args.protocol.clone(),
        protocol_port: args.protocol_port,
        pool_id: args.pool_id.clone(),
        address: args.address.clone(),
        description: args.description.clone(),
        connection_limit: args.connection_limit,
        persistence: args.persistence.as_ref().map(|kind| {
            let persistence = vips::SessionPersistence::new(kind.clone());
            match &args.cookie_name {
                Some(cookie) => persistence.with_cookie(cookie.clone()),
                None => persistence,
            }
        }),
        admin_state_up: args.down.then_some(false),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write as _;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn clouds_file(uri: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "clouds:\n  test:\n    auth:\n      token: abc\n    endpoints:\n      network: {uri}/v2.0\n      database: {uri}/v1.0/1234\n    http:\n      requests_per_second: 0\n"
        )
        .unwrap();
        file
    }

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_vip_create_opts_mapping() {
        let cli = Cli::try_parse_from([
            "stackclient", "vips", "create", "--name", "web", "--subnet-id", "s1",
            "--protocol", "HTTP", "--protocol-port", "80", "--pool-id", "p1",
            "--persistence", "APP_COOKIE", "--cookie-name", "sid", "--down",
        ])
        .unwrap();

        let Commands::Vips {
            command: VipCommands::Create(args),
        } = &cli.command
        else {
            panic!("expected vips create");
        };

        let opts = vip_create_opts(args);
        assert_eq!(opts.admin_state_up, Some(false));
        assert_eq!(
            opts.persistence,
            Some(vips::SessionPersistence::new("APP_COOKIE").with_cookie("sid"))
        );
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_cloud_flag_requires_file() {
        let runner = runner(&["stackclient", "--cloud", "prod", "vips", "get", "v1"]);
        assert!(matches!(runner.load_cloud(), Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_run_vip_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2.0/lb/vips/v1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let file = clouds_file(&server.uri());
        let config = file.path().to_string_lossy().to_string();
        runner(&["stackclient", "--cloud-config", &config, "vips", "delete", "v1"])
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_databases_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/1234/instances/i1/databases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"databases": []})))
            .expect(1)
            .mount(&server)
            .await;

        let file = clouds_file(&server.uri());
        let config = file.path().to_string_lossy().to_string();
        runner(&[
            "stackclient", "--cloud-config", &config, "--cloud", "test",
            "databases", "list", "--instance", "i1",
        ])
        .run()
        .await
        .unwrap();
    }
}
