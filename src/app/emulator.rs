use dmg_core::engine::Engine;
use std::fs;
use std::path::Path;

/// Thin frontend wrapper around the core `Engine`: adds the debug-UI
/// single-stepping mode that the SDL frontend's P/N keys drive. Stepping
/// itself is not a core concern, so it lives here rather than in `Engine`.
pub struct Emulator {
    engine: Engine,
    pub stepping: bool,
}

impl Emulator {
    /// Creates a new Emulator instance, loads the ROM, and initializes components.
    pub fn new(rom_path: &Path, skip_boot_rom: bool) -> Result<Self, String> {
        log::info!("Loading ROM: {}", rom_path.display());
        let rom_data = fs::read(rom_path)
            .map_err(|e| format!("Failed to read ROM '{}': {}", rom_path.display(), e))?;
        let rom_size = rom_data.len();

        let engine = Engine::new(&rom_data, skip_boot_rom).map_err(|e| e.to_string())?;
        log::info!("ROM loaded successfully ({} bytes)", rom_size);

        Ok(Emulator {
            engine,
            stepping: false,
        })
    }

    pub fn toggle_stepping(&mut self) {
        self.stepping = !self.stepping;
    }

    pub fn step_instruction(&mut self) -> Result<(), String> {
        self.engine.step_instruction().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn run_frame(&mut self) -> Result<(), String> {
        self.engine.run_frame().map_err(|e| e.to_string())
    }
}

impl std::ops::Deref for Emulator {
    type Target = Engine;
    fn deref(&self) -> &Engine {
        &self.engine
    }
}

impl std::ops::DerefMut for Emulator {
    fn deref_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}
