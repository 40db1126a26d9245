use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{
    ffi::{c_void, CString},
    num::NonZeroU32,
    ptr,
    sync::Arc,
};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use glshim::{
    config::{load_or_create_config, Backend, ShimConfig},
    link_program_with, FragmentShader, GlDriver, GlowDriver, NativeGl, OrFatal, ProgramHandle,
    VertexShader,
};

const VERTEX_SRC: &str = r#"
#version 330 core
in vec2 position;
uniform float scale;

void main() {
    gl_Position = vec4(position * scale, 0.0, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"
#version 330 core
uniform vec4 tint;
out vec4 color;

void main() {
    color = tint;
}
"#;

fn link_demo_program(gl: &dyn GlDriver, config: &ShimConfig) -> Result<ProgramHandle> {
    let fragment = FragmentShader::new(FRAGMENT_SRC);
    let vertex = VertexShader::new(VERTEX_SRC);
    let linked = link_program_with(gl, &fragment, &vertex, config.status_policy);

    if config.fail_fast {
        Ok(linked.or_fatal())
    } else {
        linked.context("Failed to build demo program")
    }
}

fn main() -> Result<()> {
    let config = load_or_create_config()?;
    SimpleLogger::new().with_level(config.log_level).init()?;
    info!("Starting glshim demo with {:?} backend", config.backend);

    let event_loop = EventLoop::new()?;
    let window_builder = WindowBuilder::new()
        .with_title("glshim")
        .with_inner_size(LogicalSize::new(640, 480));

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            configs
                .reduce(|accum, candidate| {
                    if candidate.num_samples() > accum.num_samples() {
                        candidate
                    } else {
                        accum
                    }
                })
                .expect("display offered no GL configs")
        })
        .map_err(|e| anyhow!("Failed to build display: {}", e))?;

    let window = window.context("Display builder did not create a window")?;
    let raw_window_handle = window.raw_window_handle();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_window_handle));

    let gl_display = gl_config.display();

    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .context("Failed to create OpenGL context")?;

    let attrs = window.build_surface_attributes(<_>::default());
    let gl_surface: Surface<WindowSurface> =
        unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

    let gl_context = not_current
        .make_current(&gl_surface)
        .context("Failed to make context current")?;

    let load = |symbol: &str| -> *const c_void {
        match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
            Err(_) => ptr::null(),
        }
    };

    // Native pointers are always loaded; the render loop clears through them.
    let native = NativeGl::load_with(load);
    if !NativeGl::is_loaded() {
        return Err(anyhow!("OpenGL shader entry points are unavailable"));
    }

    let driver: Box<dyn GlDriver> = match config.backend {
        Backend::Native => Box::new(native),
        Backend::Glow => {
            let context = unsafe { glow::Context::from_loader_function(load) };
            Box::new(GlowDriver::new(Arc::new(context)))
        }
    };

    let program = link_demo_program(driver.as_ref(), &config)?;
    program.activate(driver.as_ref());

    for name in ["position", "normal"] {
        info!("attribute {:?} -> {:?}", name, program.attribute(driver.as_ref(), name));
    }
    for name in ["scale", "tint"] {
        info!("uniform {:?} -> {:?}", name, program.uniform(driver.as_ref(), name));
    }

    unsafe {
        gl::ClearColor(0.2, 0.3, 0.3, 1.0);
    }

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    gl_surface.resize(&gl_context, width, height);
                    unsafe {
                        gl::Viewport(0, 0, size.width as i32, size.height as i32);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                program.activate(driver.as_ref());
                unsafe {
                    gl::Clear(gl::COLOR_BUFFER_BIT);
                }
                if let Err(e) = gl_surface.swap_buffers(&gl_context) {
                    error!("Failed to swap buffers: {}", e);
                }
            }
            _ => (),
        },
        Event::AboutToWait => window.request_redraw(),
        _ => (),
    })?;

    Ok(())
}
