use dmg_core::joypad::{
    BUTTON_A, BUTTON_B, BUTTON_DOWN, BUTTON_LEFT, BUTTON_RIGHT, BUTTON_SELECT, BUTTON_START,
    BUTTON_UP,
};
use dmg_core::memory_bus::MemoryBus;
use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

/// Translates an SDL keycode to the core's abstract button index. The core
/// itself never sees an SDL type.
fn button_for_keycode(key: Keycode) -> Option<u8> {
    match key {
        Keycode::Right | Keycode::D => Some(BUTTON_RIGHT),
        Keycode::Left | Keycode::A => Some(BUTTON_LEFT),
        Keycode::Up | Keycode::W => Some(BUTTON_UP),
        Keycode::Down | Keycode::S => Some(BUTTON_DOWN),
        Keycode::Z | Keycode::J => Some(BUTTON_A),
        Keycode::X | Keycode::K => Some(BUTTON_B),
        Keycode::Backspace | Keycode::RShift => Some(BUTTON_SELECT),
        Keycode::Return | Keycode::Space => Some(BUTTON_START),
        _ => None,
    }
}

/// Polls SDL events and updates the MemoryBus joypad state.
/// Returns `true` if the quit event was received, `false` otherwise.
pub fn handle_input(event_pump: &mut EventPump, memory_bus: &mut MemoryBus) -> bool {
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => {
                log::info!("Exit requested.");
                return true; // Signal quit
            }
            Event::KeyDown {
                keycode: Some(key),
                repeat: false,
                ..
            } => {
                if let Some(button) = button_for_keycode(key) {
                    memory_bus.key_pressed(button);
                }
            }
            Event::KeyUp {
                keycode: Some(key),
                repeat: false,
                ..
            } => {
                if let Some(button) = button_for_keycode(key) {
                    memory_bus.key_released(button);
                }
            }
            _ => {} // Ignore other events
        }
    }
    false // Continue running
}
