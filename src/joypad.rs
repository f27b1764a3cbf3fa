/// Abstract button indices used by the core. Index-to-key mapping is a
/// frontend concern; the core never sees an SDL keycode.
pub const BUTTON_RIGHT: u8 = 0;
pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_UP: u8 = 2;
pub const BUTTON_DOWN: u8 = 3;
pub const BUTTON_A: u8 = 4;
pub const BUTTON_B: u8 = 5;
pub const BUTTON_SELECT: u8 = 6;
pub const BUTTON_START: u8 = 7;

/// Represents the state of the Game Boy's buttons.
/// True = pressed, False = released (internal representation)
#[derive(Clone, Debug, Default)]
pub struct JoypadState {
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
}

/// Manages Joypad state and interaction with the P1 register.
#[derive(Clone, Debug, Default)]
pub struct Joypad {
    state: JoypadState,
    // Store the P1 register's selectable bits (written by the game)
    p1_register_selection: u8, // Bits 4 and 5
}

impl Joypad {
    pub fn new() -> Self {
        Joypad {
            state: JoypadState::default(),
            // P1 defaults to 0xCF (often, depends post-bootrom),
            // means bits 4 and 5 are high (no selection) initially.
            // Store only the writable bits 4,5.
            p1_register_selection: 0x30,
        }
    }

    /// Reads the P1 (Joypad) register based on current state and selection.
    pub fn read_p1(&self) -> u8 {
        let mut joypad_value = 0x0F; // Start with lower nibble high (released)

        if self.p1_register_selection & 0x20 == 0 {
            // Bit 5 Low: Select Action buttons (A, B, Select, Start)
            if self.state.a {
                joypad_value &= 0b1110;
            } // Bit 0 low if pressed
            if self.state.b {
                joypad_value &= 0b1101;
            } // Bit 1 low if pressed
            if self.state.select {
                joypad_value &= 0b1011;
            } // Bit 2 low if pressed
            if self.state.start {
                joypad_value &= 0b0111;
            } // Bit 3 low if pressed
        }
        if self.p1_register_selection & 0x10 == 0 {
            // Bit 4 Low: Select Direction buttons (Right, Left, Up, Down)
            if self.state.right {
                joypad_value &= 0b1110;
            } // Bit 0 low if pressed
            if self.state.left {
                joypad_value &= 0b1101;
            } // Bit 1 low if pressed
            if self.state.up {
                joypad_value &= 0b1011;
            } // Bit 2 low if pressed
            if self.state.down {
                joypad_value &= 0b0111;
            } // Bit 3 low if pressed
        }

        // Combine input bits (0-3) with selection bits (4-5) and unused high bits (reads 1)
        joypad_value | self.p1_register_selection | 0xC0
    }

    /// Writes to the P1 (Joypad) register (only bits 4, 5 are writable).
    pub fn write_p1(&mut self, value: u8) {
        // Only bits 4 and 5 are writable
        self.p1_register_selection = value & 0x30;
    }

    /// Handles a button press by abstract index (0..7, see BUTTON_* constants).
    /// Returns true if a Joypad interrupt should be requested (rising edge
    /// on a currently-selected button group).
    pub fn key_pressed(&mut self, index: u8) -> bool {
        let (was_pressed, selection_bit) = match index {
            BUTTON_RIGHT => (self.state.right, 0x10),
            BUTTON_LEFT => (self.state.left, 0x10),
            BUTTON_UP => (self.state.up, 0x10),
            BUTTON_DOWN => (self.state.down, 0x10),
            BUTTON_A => (self.state.a, 0x20),
            BUTTON_B => (self.state.b, 0x20),
            BUTTON_SELECT => (self.state.select, 0x20),
            BUTTON_START => (self.state.start, 0x20),
            _ => return false,
        };

        match index {
            BUTTON_RIGHT => self.state.right = true,
            BUTTON_LEFT => self.state.left = true,
            BUTTON_UP => self.state.up = true,
            BUTTON_DOWN => self.state.down = true,
            BUTTON_A => self.state.a = true,
            BUTTON_B => self.state.b = true,
            BUTTON_SELECT => self.state.select = true,
            BUTTON_START => self.state.start = true,
            _ => unreachable!(),
        }

        let newly_pressed = !was_pressed;
        let selection_active = self.p1_register_selection & selection_bit == 0;
        newly_pressed && selection_active
    }

    /// Handles a button release by abstract index (0..7).
    pub fn key_released(&mut self, index: u8) {
        match index {
            BUTTON_RIGHT => self.state.right = false,
            BUTTON_LEFT => self.state.left = false,
            BUTTON_UP => self.state.up = false,
            BUTTON_DOWN => self.state.down = false,
            BUTTON_A => self.state.a = false,
            BUTTON_B => self.state.b = false,
            BUTTON_SELECT => self.state.select = false,
            BUTTON_START => self.state.start = false,
            _ => {}
        }
    }

    /// Optional: Allow external access to raw state if needed elsewhere
    pub fn get_state(&self) -> &JoypadState {
        &self.state
    }
}
