//! Entry point for the HoloPyramid application.

use anyhow::Result;
use clap::Parser;
use holo_pyramid::{app::App, config::Config, input::quit_requested};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Config::parse();
    config.validate()?;
    log::info!("Starting with {:?}", config);

    let frame_period = Duration::from_secs_f64(1.0 / config.frame_rate as f64);

    // Create the event loop and window.
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("HoloPyramid")
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), config))?;
    let mut next_frame = Instant::now();

    // Run the winit event loop.
    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Forward events to the app; handle unconsumed window events.
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if quit_requested(event.physical_key, event.state, event.repeat) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            match app.render(&window) {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => {
                                    app.renderer.gfx.reconfigure();
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("WGPU out of memory – exiting.");
                                    elwt.exit();
                                }
                                Err(e) => log::error!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Pace redraws at the configured frame rate.
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame += frame_period;
                    if next_frame < now {
                        next_frame = now + frame_period;
                    }
                }
                elwt.set_control_flow(ControlFlow::WaitUntil(next_frame));
            }
            _ => {}
        }
    })?;

    Ok(())
}
