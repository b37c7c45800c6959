use crate::entities::Mode;

#[derive(Clone, Debug, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn switch(&mut self) -> Mode {
        self.mode = self.mode.opposite();
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }
}

#[test]
fn starts_at_from_and_flips() {
    let mut controller = ModeController::default();
    assert_eq!(controller.mode(), Mode::From);

    assert_eq!(controller.switch(), Mode::To);
    assert_eq!(controller.switch(), Mode::From);

    controller.set_mode(Mode::To);
    assert_eq!(controller.mode(), Mode::To);
    controller.set_mode(Mode::To);
    assert_eq!(controller.mode(), Mode::To);
}
