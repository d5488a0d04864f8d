use crate::app_state::State;
use crate::export;
use crate::params::ParamId;
use crate::state::FrameUniforms;
use crate::view::PointerInput;
use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);

            let uniforms = FrameUniforms {
                screen_size: [new_size.width as f32, new_size.height as f32],
                frame_size: [self.frame.size.width as f32, self.frame.size.height as f32],
            };
            self.gpu.queue.write_buffer(
                &self.frame_buffers.uniform,
                0,
                bytemuck::cast_slice(&[uniforms]),
            );
            self.input.frame_dirty = true;
        }
    }

    fn route(&mut self, input: PointerInput) {
        let slider = self.config.slider_rect();
        if self.view.route_pointer(input, slider, &self.pointer_hub) {
            self.input.frame_dirty = true;
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];
                self.route(PointerInput::Moved(self.input.mouse_pos));
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pos = self.input.mouse_pos;
                match state {
                    ElementState::Pressed => self.route(PointerInput::Pressed(pos)),
                    ElementState::Released => self.route(PointerInput::Released(pos)),
                }
                true
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state != ElementState::Pressed {
                    return false;
                }
                let PhysicalKey::Code(keycode) = key_event.physical_key else {
                    return false;
                };
                let nudge = match keycode {
                    KeyCode::KeyQ => Some((ParamId::DeltaPi, 1.0)),
                    KeyCode::KeyA => Some((ParamId::DeltaPi, -1.0)),
                    KeyCode::KeyW => Some((ParamId::Pe, 1.0)),
                    KeyCode::KeyS => Some((ParamId::Pe, -1.0)),
                    KeyCode::KeyE => Some((ParamId::Area, 1.0)),
                    KeyCode::KeyD => Some((ParamId::Area, -1.0)),
                    _ => None,
                };
                let changed = match (nudge, keycode) {
                    (Some((id, steps)), _) => {
                        let changed = self.view.nudge(id, steps);
                        if changed {
                            log::info!("{}: {}", id.label(), self.view.params().get(id));
                        }
                        changed
                    }
                    (None, KeyCode::KeyR) => {
                        self.view.reset();
                        true
                    }
                    (None, KeyCode::KeyP) => {
                        if let Err(e) =
                            export::save_png(&self.view, &self.config, &self.config.snapshot_path)
                        {
                            log::error!("{e:#}");
                        }
                        return true;
                    }
                    _ => return false,
                };
                if changed {
                    self.input.frame_dirty = true;
                }
                true
            }
            _ => false,
        }
    }
}
