#![warn(clippy::pedantic)]
use std::time::Instant;

use anyhow::Context;
use config::Config;
use controls::KEYBOARD_HELP;
use frame::Application;
use log::{error, info, warn};
use scene::{Outcome, Scene};

mod buffer;
mod camera;
mod config;
mod controls;
mod conversion;
mod error;
mod frame;
mod geometry;
mod heightfield;
mod load;
mod mesh;
mod model;
mod scene;
mod shader;
mod shapes;
mod terrain;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_args(std::env::args().skip(1));

    // a model that fails to load leaves slot 7 on the light point
    let model = config.model.as_ref().and_then(|path| {
        load::load_model(path)
            .map_err(|e| warn!("could not load {}: {e}", path.display()))
            .ok()
    });
    let mut scene = Scene::build(&config, model, &mut rand::thread_rng())
        .context("failed to build the scene")?;

    let event_loop = winit::event_loop::EventLoopBuilder::new().build()?;
    let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
        .with_title(&scene.title())
        .with_inner_size(config.width, config.height)
        .build(&event_loop);
    let app = Application::new(&display, &scene).context("failed to upload the scene")?;

    println!("{KEYBOARD_HELP}");
    info!("{}", scene.title());
    let mut last_frame = Instant::now();

    // rendering loop
    event_loop.run(move |event, window_target| {
        match event {
            winit::event::Event::WindowEvent { event, .. } => match event {
                winit::event::WindowEvent::CloseRequested => window_target.exit(),

                // advance the animation and render everything
                winit::event::WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    scene.animate(config.animation_delta(now - last_frame));
                    last_frame = now;

                    let mut target = display.draw();
                    if let Err(e) = app.draw_frame(&mut target, &scene) {
                        error!("draw failed: {e}");
                    }
                    if let Err(e) = target.finish() {
                        error!("failed to present the frame: {e}");
                    }
                }
                // resize the display when the window's size has changed
                winit::event::WindowEvent::Resized(window_size) => {
                    display.resize(window_size.into());
                    scene.camera.resize(window_size.width, window_size.height);
                }
                winit::event::WindowEvent::KeyboardInput { event, .. } => {
                    let Some(action) = controls::action_for_event(&event) else {
                        return;
                    };
                    match scene.apply(action) {
                        Some(Outcome::Quit) => window_target.exit(),
                        Some(Outcome::Print(text)) => println!("{text}"),
                        None => (),
                    }
                    window.set_title(&scene.title());
                }
                _ => (),
            },
            // ensures continuous rendering
            winit::event::Event::AboutToWait => {
                window.request_redraw();
            }
            _ => (),
        };
    })?;
    Ok(())
}
