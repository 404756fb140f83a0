// Host window and frame blitting (winit + pixels)

use crate::emulator::{ControlsConfig, Emulator, EmulatorConfig};
use crate::input::Button;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};
use log::error;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

/// NTSC frame duration (60 Hz nominal)
const FRAME_DURATION: Duration = Duration::from_micros(16_667);

/// Run the emulator in a host window until close or ESC
pub fn run_emulator(
    emulator: Emulator,
    config: EmulatorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = EmulatorWindow::new(emulator, config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// The winit application: window, surface, and the running emulator
struct EmulatorWindow {
    emulator: Emulator,
    config: EmulatorConfig,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    last_frame: Instant,
}

impl EmulatorWindow {
    fn new(emulator: Emulator, config: EmulatorConfig) -> Self {
        EmulatorWindow {
            emulator,
            config,
            window: None,
            pixels: None,
            last_frame: Instant::now(),
        }
    }

    /// Map a winit key code onto a joypad button via the bindings
    fn button_for_key(controls: &ControlsConfig, key: PhysicalKey) -> Option<Button> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let name = format!("{:?}", code);

        if name == controls.a {
            Some(Button::A)
        } else if name == controls.b {
            Some(Button::B)
        } else if name == controls.select {
            Some(Button::Select)
        } else if name == controls.start {
            Some(Button::Start)
        } else if name == controls.up {
            Some(Button::Up)
        } else if name == controls.down {
            Some(Button::Down)
        } else if name == controls.left {
            Some(Button::Left)
        } else if name == controls.right {
            Some(Button::Right)
        } else {
            None
        }
    }

    /// Run one emulated frame and copy it to the surface
    fn render_frame(&mut self) {
        self.emulator.step_frame();

        if let Some(pixels) = &mut self.pixels {
            let surface = pixels.frame_mut();
            for (pixel, chunk) in self.emulator.frame().iter().zip(surface.chunks_exact_mut(4)) {
                chunk.copy_from_slice(&pixel.to_be_bytes());
            }
            if let Err(err) = pixels.render() {
                error!("surface render failed: {}", err);
            }
        }
    }
}

impl ApplicationHandler for EmulatorWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Keep polling so emulation advances between window events
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.window.is_some() {
            return;
        }

        let scale = self.config.video.scale.clamp(1, 8);
        let size = LogicalSize::new(
            SCREEN_WIDTH as u32 * scale,
            SCREEN_HEIGHT as u32 * scale,
        );
        let attributes = Window::default_attributes()
            .with_title("nescore")
            .with_inner_size(size)
            .with_min_inner_size(LogicalSize::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                let physical = window.inner_size();
                let texture =
                    SurfaceTexture::new(physical.width, physical.height, Arc::clone(&window));
                let pixels = PixelsBuilder::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, texture)
                    .enable_vsync(self.config.video.vsync)
                    .build();
                match pixels {
                    Ok(pixels) => self.pixels = Some(pixels),
                    Err(err) => {
                        error!("could not create pixel surface: {}", err);
                        event_loop.exit();
                    }
                }
                self.window = Some(window);
            }
            Err(err) => {
                error!("could not create window: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(pixels) = &mut self.pixels {
                    if pixels.resize_surface(size.width, size.height).is_err() {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if physical_key == PhysicalKey::Code(winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                if let Some(button) = Self::button_for_key(&self.config.controls, physical_key) {
                    let pressed = state == ElementState::Pressed;
                    self.emulator
                        .bus_mut()
                        .controllers_mut()
                        .report_button(button, pressed);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Pace to ~60 Hz; VSync (when on) does the fine regulation
        if self.last_frame.elapsed() >= FRAME_DURATION {
            self.last_frame = Instant::now();
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}
