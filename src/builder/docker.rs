use crate::app::App;
use crate::builder::ImageBuilder;
use crate::cmd;
use crate::error::DeployResult;
use crate::registry::{ImageReference, RegistryAuth};

/// Build and publish images with the local `docker` daemon.
///
/// Images are built for the app's target platform and pushed
/// with `docker push` after a `--password-stdin` login, so the
/// registry password never appears on a command line.
pub struct DockerBuilder;

impl DockerBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn build_tagged(app: &App, tag: &str, target: Option<&str>) -> DeployResult<()> {
        let mut args = vec!["build", "--platform", &app.platform, "-f", &app.dockerfile];

        if let Some(target) = target {
            args.push("--target");
            args.push(target);
        }

        let base_image = format!("BASE_IMAGE={}", app.base_image);
        args.push("--build-arg");
        args.push(&base_image);

        let build_arg_strings: Vec<String> = app
            .build_args
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();

        for arg_str in &build_arg_strings {
            args.push("--build-arg");
            args.push(arg_str);
        }

        args.push("-t");
        args.push(tag);
        args.push(&app.source_dir);

        cmd::run_interactive("docker", &args)
    }
}

impl Default for DockerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder for DockerBuilder {
    fn build(&self, app: &App) -> DeployResult<()> {
        eprintln!("Building image for {}...", app.platform);
        Self::build_tagged(app, &app.tag(), None)
    }

    fn test(&self, app: &App) -> DeployResult<String> {
        // Tests need the toolchain, which only the build stage
        // carries.
        eprintln!("Building test image...");
        Self::build_tagged(app, &app.test_tag(), Some("builder"))?;

        eprintln!("Running tests in {}...", app.test_tag());
        cmd::run(
            "docker",
            &["run", "--rm", &app.test_tag(), "sh", "-c", &app.test_cmd],
        )
    }

    fn run_service(&self, app: &App) -> DeployResult<()> {
        let publish = format!("{0}:{0}", app.port);

        eprintln!("Running {} on port {}...", app.tag(), app.port);
        cmd::run_interactive("docker", &["run", "--rm", "-p", &publish, &app.tag()])
    }

    fn publish(
        &self,
        app: &App,
        auth: &RegistryAuth,
        repository: &str,
    ) -> DeployResult<ImageReference> {
        eprintln!("Authenticating to {}...", auth.endpoint);
        cmd::run_with_stdin(
            "docker",
            &[
                "login",
                "--username",
                &auth.username,
                "--password-stdin",
                &auth.endpoint,
            ],
            auth.password.expose().as_bytes(),
        )?;

        eprintln!("Pushing {} to {repository}...", app.tag());
        cmd::run("docker", &["tag", &app.tag(), repository])?;
        cmd::run_interactive("docker", &["push", repository])?;

        // The digest-pinned reference the registry assigned on
        // push.
        let digest = cmd::run(
            "docker",
            &[
                "image",
                "inspect",
                "--format",
                "{{index .RepoDigests 0}}",
                repository,
            ],
        )?;

        let reference = if digest.is_empty() {
            ImageReference::new(repository)
        } else {
            ImageReference::new(digest)
        };

        eprintln!("Pushed {reference}");
        Ok(reference)
    }
}
