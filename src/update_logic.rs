use crate::app_state::State;
use crate::export::compose_frame;

impl State {
    /// Uploads the surfaces if input changed them since the last frame.
    pub fn update(&mut self) {
        if !self.input.frame_dirty {
            return;
        }
        let (frame, _) = compose_frame(&self.view, &self.config);
        self.frame.upload(&self.gpu.queue, &frame);

        let status = self.view.status_line();
        self.window
            .set_title(&format!("{}  |  {}", self.config.title, status));
        log::debug!("frame uploaded: {status}");
        self.input.frame_dirty = false;
    }
}
