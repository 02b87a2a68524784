mod app;
mod camera;
mod catalog;
mod clock;
mod config;
mod ecs;
mod error;
mod geometry;
mod input;
mod kepler;
mod keybind;
mod logging;
mod orbit;
mod raster;
mod search;
mod surface;
mod system;
mod units;
mod view;
mod window;

#[cfg(test)]
mod tests;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
