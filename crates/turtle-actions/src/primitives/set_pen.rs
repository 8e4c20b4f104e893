use turtle_bt::{Behaviour, SetupError};
use turtle_core::{Blackboard, PenConfig, Status, TickContext, TurtleDriver};

use super::require_alive;

/// Single-tick pen configuration.
#[derive(Debug, Clone)]
pub struct SetPen {
    pen: PenConfig,
}

impl SetPen {
    /// Width is clamped to at least 1.
    pub fn new(r: u8, g: u8, b: u8, width: u8, off: bool) -> Self {
        Self {
            pen: PenConfig {
                r,
                g,
                b,
                width: width.max(1),
                off,
            },
        }
    }

    pub fn pen_up() -> Self {
        Self::new(255, 255, 255, 3, true)
    }

    pub fn pen_down(r: u8, g: u8, b: u8, width: u8) -> Self {
        Self::new(r, g, b, width, false)
    }

    pub fn pen(&self) -> PenConfig {
        self.pen
    }
}

impl<D> Behaviour<D> for SetPen
where
    D: TurtleDriver,
{
    fn setup(&mut self, driver: &mut D) -> Result<(), SetupError> {
        require_alive(driver)
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        driver: &mut D,
        _blackboard: &mut Blackboard,
    ) -> Status {
        match driver.set_pen(self.pen) {
            Ok(()) => {
                tracing::info!(pen = ?self.pen, "Pen configured");
                Status::Success
            }
            Err(err) => {
                tracing::warn!(error = %err, "set_pen failed");
                Status::Failure
            }
        }
    }
}
