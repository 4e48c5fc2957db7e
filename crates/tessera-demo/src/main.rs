mod app;
mod context;
mod procedural;
mod shapes;
mod sprites;

use anyhow::Context;
use tessera_engine::assets::AssetLocator;
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::DemoApp;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("tessera demo starting");

    let config = RuntimeConfig {
        title: "tessera demo".to_string(),
        initial_size: LogicalSize::new(1024.0, 640.0),
        resizable: true,
        clear_color: 0x1E1E_28FF,
    };

    Runtime::run(config, GpuInit::default(), DemoApp::new(AssetLocator::default()))
        .context("tessera demo failed")?;

    log::info!("tessera demo finished");
    Ok(())
}
