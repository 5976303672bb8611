//! Build, publish, and roll container deployments onto Amazon
//! ECS - with a bundled demo web service.
//!
//! Ballista packs a two-route demo application together with the
//! automation that ships it: build the container image, push it
//! to ECR, and roll a running ECS service over to the new image.
//! No shell scripts, no YAML pipelines - one typed Rust DSL
//! driven from `cargo xtask`.
//!
//! # Overview
//!
//! A deployment is defined as a [`Pipeline`] that wires together:
//!
//! - An [`App`] describing the container (source directory, base
//!   image, platform, port)
//! - An [`ImageBuilder`](builder::ImageBuilder) for building,
//!   testing, and publishing images (e.g. [`DockerBuilder`])
//! - A [`RegistryTokens`](registry::RegistryTokens) provider for
//!   short-lived push credentials (e.g. [`Ecr`])
//! - An [`Orchestrator`](orchestration::Orchestrator) control
//!   plane for task definitions and services (e.g. [`EcsCli`])
//!
//! # Architecture
//!
//! The rollover procedure in [`rollover`] is strictly linear:
//!
//! 1. **Push** - build the image, obtain a registry token, push,
//!    and keep the digest-pinned reference
//! 2. **Resolve** - fetch the most recent registered revision of
//!    the task-definition family
//! 3. **Register** - clone it with the new image reference and
//!    register the clone as a fresh revision
//! 4. **Update** - deregister the old revision and repoint the
//!    service at the new one
//!
//! Each step's output feeds the next; the first failure aborts
//! the run and nothing is rolled back.
//!
//! # Example
//!
//! Create an `xtask` entry point in your project:
//!
//! ```rust,no_run
//! use ballista::{App, DockerBuilder, Ecr, EcsCli, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::new("my-service")
//!         .base_image("rust:1.85-slim")
//!         .port(3000);
//!
//!     let pipeline = Pipeline::new(app)
//!         .builder(DockerBuilder::new())
//!         .registry(Ecr::new())
//!         .orchestration(EcsCli::new());
//!
//!     pipeline.run()?;
//!     Ok(())
//! }
//! ```
//!
//! Then use `cargo xtask` subcommands:
//!
//! ```sh
//! # Build the container image
//! cargo xtask build
//!
//! # Run the app locally on its port
//! cargo xtask run
//!
//! # Run the test suite inside the build container
//! cargo xtask test
//!
//! # Push the image to the registry
//! cargo xtask push --region eu-west-1 \
//!     --registry 123456789.dkr.ecr.eu-west-1.amazonaws.com/my-service
//!
//! # Push and roll the running service onto the new image
//! cargo xtask deploy --cluster prod --service my-service \
//!     --family my-service --region eu-west-1 \
//!     --registry 123456789.dkr.ecr.eu-west-1.amazonaws.com/my-service
//! ```
//!
//! Credentials come from `AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY`, and `AWS_SESSION_TOKEN`; they are
//! held as non-printable secrets and exported only into the
//! environment of the single CLI call that needs them.
//!
//! [`ImageBuilder`]: builder::ImageBuilder
//! [`RegistryTokens`]: registry::RegistryTokens
//! [`Orchestrator`]: orchestration::Orchestrator

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod app;
pub mod builder;
pub mod cmd;
pub mod credentials;
pub mod error;
pub mod orchestration;
pub mod pipeline;
pub mod registry;
pub mod rollover;
pub mod server;
pub mod taskdef;

pub use app::App;
pub use builder::docker::DockerBuilder;
pub use credentials::{AwsCredentials, CloudContext, SecretValue};
pub use error::{DeployError, DeployResult};
pub use orchestration::ecs::EcsCli;
pub use pipeline::Pipeline;
pub use registry::ImageReference;
pub use registry::ecr::Ecr;
pub use rollover::DeployTarget;
pub use taskdef::{ContainerSpec, TaskDefinition, with_image};
