pub mod docker;

use crate::app::App;
use crate::error::DeployResult;
use crate::registry::{ImageReference, RegistryAuth};

/// Builds, tests, runs, and publishes the application's
/// container image.
pub trait ImageBuilder {
    /// Build the image locally under [`App::tag`].
    fn build(&self, app: &App) -> DeployResult<()>;

    /// Run the application's test command inside the build
    /// container and capture its output.
    fn test(&self, app: &App) -> DeployResult<String>;

    /// Run the built image locally as a service with the app
    /// port published. Blocks until the container exits.
    fn run_service(&self, app: &App) -> DeployResult<()>;

    /// Push the built image to `repository` using `auth`,
    /// returning the fully-qualified reference of the image as
    /// the registry knows it.
    fn publish(
        &self,
        app: &App,
        auth: &RegistryAuth,
        repository: &str,
    ) -> DeployResult<ImageReference>;
}
