use clap::{Parser, Subcommand};

use crate::app::App;
use crate::builder::ImageBuilder;
use crate::builder::docker::DockerBuilder;
use crate::credentials::{AwsCredentials, CloudContext};
use crate::error::DeployResult;
use crate::orchestration::Orchestrator;
use crate::orchestration::ecs::EcsCli;
use crate::registry::RegistryTokens;
use crate::registry::ecr::Ecr;
use crate::rollover::{self, DeployTarget};

/// Automation pipeline wiring the app to its builder, registry,
/// and orchestration collaborators.
pub struct Pipeline {
    app: App,
    builder: Box<dyn ImageBuilder>,
    registry: Box<dyn RegistryTokens>,
    orchestration: Box<dyn Orchestrator>,
}

impl Pipeline {
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app,
            builder: Box::new(DockerBuilder::new()),
            registry: Box::new(Ecr::new()),
            orchestration: Box::new(EcsCli::new()),
        }
    }

    #[must_use]
    pub fn builder(mut self, builder: impl ImageBuilder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: impl RegistryTokens + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    #[must_use]
    pub fn orchestration(mut self, orchestration: impl Orchestrator + 'static) -> Self {
        self.orchestration = Box::new(orchestration);
        self
    }

    /// Parse CLI arguments and dispatch the appropriate
    /// command.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatched command fails.
    pub fn run(&self) -> DeployResult<()> {
        let cli = Cli::parse();

        match &cli.command {
            Command::Build => self.cmd_build(),
            Command::Run => self.cmd_run(),
            Command::Test => self.cmd_test(),
            Command::Push { region, registry } => self.cmd_push(region, registry),
            Command::Deploy {
                cluster,
                service,
                family,
                region,
                registry,
            } => self.cmd_deploy(cluster, service, family, region, registry),
        }
    }

    fn cmd_build(&self) -> DeployResult<()> {
        self.builder.build(&self.app)
    }

    fn cmd_run(&self) -> DeployResult<()> {
        self.builder.build(&self.app)?;
        self.builder.run_service(&self.app)
    }

    fn cmd_test(&self) -> DeployResult<()> {
        let output = self.builder.test(&self.app)?;
        println!("{output}");
        Ok(())
    }

    fn cmd_push(&self, region: &str, repository: &str) -> DeployResult<()> {
        let ctx = CloudContext::new(AwsCredentials::from_env()?, region);

        let image = rollover::push(
            self.builder.as_ref(),
            self.registry.as_ref(),
            &self.app,
            &ctx,
            repository,
        )?;

        println!("{image}");
        Ok(())
    }

    fn cmd_deploy(
        &self,
        cluster: &str,
        service: &str,
        family: &str,
        region: &str,
        repository: &str,
    ) -> DeployResult<()> {
        let ctx = CloudContext::new(AwsCredentials::from_env()?, region);
        let target = DeployTarget {
            cluster: cluster.to_string(),
            service: service.to_string(),
            family: family.to_string(),
            repository: repository.to_string(),
        };

        let confirmation = rollover::deploy(
            self.builder.as_ref(),
            self.registry.as_ref(),
            self.orchestration.as_ref(),
            &self.app,
            &ctx,
            &target,
        )?;

        println!("{confirmation}");
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build and deployment automation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the container image
    Build,

    /// Run the application locally as a container
    Run,

    /// Run the application tests inside the build container
    Test,

    /// Build the image and push it to the container registry
    Push {
        /// Cloud region
        #[arg(long)]
        region: String,

        /// Registry repository to push to
        #[arg(long)]
        registry: String,
    },

    /// Push the image and roll the running service onto it
    Deploy {
        /// Cluster running the service
        #[arg(long)]
        cluster: String,

        /// Service to repoint
        #[arg(long)]
        service: String,

        /// Task definition family to roll
        #[arg(long)]
        family: String,

        /// Cloud region
        #[arg(long)]
        region: String,

        /// Registry repository to push to
        #[arg(long)]
        registry: String,
    },
}
