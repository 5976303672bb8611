use ballista::{App, DockerBuilder, Ecr, EcsCli, Pipeline};

fn main() -> anyhow::Result<()> {
    let app = App::new("ballista-demo")
        .base_image("rust:1.85-slim")
        .port(3000)
        .test_cmd("cargo test --locked");

    let pipeline = Pipeline::new(app)
        .builder(DockerBuilder::new())
        .registry(Ecr::new())
        .orchestration(EcsCli::new());

    pipeline.run()?;
    Ok(())
}
