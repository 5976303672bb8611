/// Defines the application container: source directory, base
/// image, build platform, and the port the service listens on.
///
/// # Example
///
/// ```
/// use ballista::App;
///
/// let app = App::new("my-service")
///     .base_image("rust:1.85-slim")
///     .build_arg("PROFILE", "release")
///     .port(3000);
///
/// assert_eq!(app.name, "my-service");
/// assert_eq!(app.port, 3000);
/// ```
#[derive(Debug, Clone)]
pub struct App {
    pub name: String,
    pub source_dir: String,
    pub dockerfile: String,
    pub platform: String,
    pub base_image: String,
    pub build_args: Vec<(String, String)>,
    pub port: u16,
    pub test_cmd: String,
}

impl App {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source_dir: ".".to_string(),
            dockerfile: "Dockerfile".to_string(),
            platform: "linux/amd64".to_string(),
            base_image: "rust:1.85-slim".to_string(),
            build_args: Vec::new(),
            port: 3000,
            test_cmd: "cargo test --locked".to_string(),
        }
    }

    #[must_use]
    pub fn source_dir(mut self, dir: &str) -> Self {
        self.source_dir = dir.to_string();
        self
    }

    #[must_use]
    pub fn dockerfile(mut self, path: &str) -> Self {
        self.dockerfile = path.to_string();
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    #[must_use]
    pub fn base_image(mut self, image: &str) -> Self {
        self.base_image = image.to_string();
        self
    }

    #[must_use]
    pub fn build_arg(mut self, key: &str, value: &str) -> Self {
        self.build_args.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn test_cmd(mut self, cmd: &str) -> Self {
        self.test_cmd = cmd.to_string();
        self
    }

    /// Local tag the image is built under.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:latest", self.name)
    }

    /// Tag for the build-stage image the tests run in.
    #[must_use]
    pub fn test_tag(&self) -> String {
        format!("{}:test", self.name)
    }
}
