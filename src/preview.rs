//! Interactive preview window backed by a `pixels` framebuffer.
//!
//! R generates a fresh tree and re-renders, S saves the current frame as a
//! PNG, Escape closes the window.

use std::path::PathBuf;

use anyhow::Context;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::StdRng;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::generate::{self, Grammar};
use crate::render;

pub fn run(
    width: u32,
    height: u32,
    depth: u32,
    output: PathBuf,
    mut rng: StdRng,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let window = {
        let size = LogicalSize::new(width as f64, height as f64);
        WindowBuilder::new()
            .with_title("randart")
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)
            .context("failed to create window")?
    };

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = Pixels::new(width, height, surface_texture)?;

    let grammar = Grammar::default();
    let mut tree = generate::generate(&grammar, &mut rng, depth)?;
    println!("{tree}");
    let mut frame_rendered = false;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { input, .. },
                ..
            } => {
                if input.state != ElementState::Pressed {
                    return;
                }
                match input.virtual_keycode {
                    Some(VirtualKeyCode::Escape) => {
                        *control_flow = ControlFlow::Exit;
                    }
                    Some(VirtualKeyCode::R) => match generate::generate(&grammar, &mut rng, depth)
                    {
                        Ok(next) => {
                            tree = next;
                            println!("{tree}");
                            frame_rendered = false;
                            window.request_redraw();
                        }
                        Err(err) => log::error!("regeneration failed: {err}"),
                    },
                    Some(VirtualKeyCode::S) => {
                        if let Err(err) =
                            crate::save_png(&output, width, height, pixels.frame())
                        {
                            log::error!("save failed: {err:#}");
                        } else {
                            log::info!("wrote {}", output.display());
                        }
                    }
                    _ => {}
                }
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                pixels.resize_surface(size.width, size.height).ok();
                window.request_redraw();
            }
            Event::RedrawRequested(_) | Event::MainEventsCleared => {
                if !frame_rendered {
                    render::render_into(&tree, width, height, pixels.frame_mut());
                    frame_rendered = true;
                }
                if pixels.render().is_err() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
