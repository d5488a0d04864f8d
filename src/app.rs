use crate::app_state::State;
use crate::config::ViewConfig;
use anyhow::Context;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct App {
    config: ViewConfig,
    state: Option<State>,
    error: Option<anyhow::Error>,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<State> {
        let frame = self.config.frame_size();
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(frame.width, frame.height))
            .with_resizable(false);

        let window = event_loop
            .create_window(window_attributes)
            .context("creating window")?;

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let canvas = window.canvas().context("window has no canvas")?;
            let canvas = web_sys::Element::from(canvas);
            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| {
                    let dst = doc.get_element_by_id("membrane")?;
                    dst.append_child(&canvas).ok()?;
                    Some(())
                })
                .context("couldn't append canvas to document")?;
        }

        pollster::block_on(State::new(Arc::new(window), self.config.clone()))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            match self.start(event_loop) {
                Ok(state) => {
                    log::info!("window ready: {}", state.view.readout());
                    self.state = Some(state);
                }
                Err(e) => {
                    self.error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if window_id == state.window().id() {
                if !state.input(&event) {
                    match event {
                        WindowEvent::CloseRequested
                        | WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    state: ElementState::Pressed,
                                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                                    ..
                                },
                            ..
                        } => {
                            state.view.deactivate();
                            event_loop.exit();
                        }
                        WindowEvent::Resized(physical_size) => {
                            log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                            state.resize(physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            state.update();
                            match state.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                                Err(e) => log::error!("{:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.input.frame_dirty {
                state.window().request_redraw();
            }
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).context("initializing logger")?;
        } else {
            env_logger::init();
        }
    }

    let config = ViewConfig::from_env()?;
    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App {
        config,
        state: None,
        error: None,
    };

    event_loop.run_app(&mut app).context("running event loop")?;
    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
