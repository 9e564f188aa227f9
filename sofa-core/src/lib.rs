//! Scale schematics of modular sofas.
//!
//! A [`SofaConfiguration`] is resolved into straight runs and corners,
//! each run is trimmed and tiled with seat cushions, and the result is
//! composed into a [`Scene`] that renders to SVG and PNG.

pub mod config;
pub mod cushions;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod meridienne;
pub mod palette;
pub mod raster;
pub mod scene;
pub mod summary;
pub mod svg;
pub mod topology;
pub mod trim;

pub use config::{
    Lengths, OneCornerVariant, ShapeKind, Side, SideFlags, SofaConfiguration, SofaSpec,
};
pub use cushions::{CushionPolicy, CushionSize};
pub use error::{ConfigurationError, Error, LayoutError, RenderError, Result};
pub use layout::{Layout, plan};
pub use palette::{ColorRole, Palette};
pub use raster::{Image, RenderOptions};
pub use scene::{Part, PartKind, Scene};
pub use summary::ConfigurationSummary;

/// Lays out `config` and composes its scene.
pub fn build_scene(config: &SofaConfiguration) -> Result<Scene> {
    let layout = plan(config)?;
    Ok(scene::compose(&layout, config.palette()))
}

/// SVG source of `config` and its pixel size, without rasterising.
pub fn svg_configuration(
    config: &SofaConfiguration,
    options: &RenderOptions,
) -> Result<(String, u32, u32)> {
    raster::check_scale(options.px_per_cm)?;
    let scene = build_scene(config)?;
    Ok(svg::scene_to_svg(&scene, &config.title(), options.px_per_cm))
}

/// Full pipeline: configuration to finished drawing.
pub fn render_configuration(config: &SofaConfiguration, options: &RenderOptions) -> Result<Image> {
    let scene = build_scene(config)?;
    Ok(raster::render(&scene, &config.title(), options)?)
}
