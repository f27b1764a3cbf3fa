use crate::cpu::{Cpu, StepOutcome};
use crate::error::CoreResult;
use crate::memory_bus::MemoryBus;
use crate::ppu::Ppu;

/// Cycles in one Game Boy frame at the nominal 4.194304 MHz clock
/// (59.7275 Hz refresh rate): 456 cycles/scanline * 154 scanlines.
pub const CYCLES_PER_FRAME: u32 = 70224;

/// Owns the CPU, memory bus, and PPU, and drives them together one
/// instruction (and its corresponding PPU/timer ticks) at a time. This is
/// the core crate's sole entry point for actually running a ROM; embedders
/// that want a custom frontend loop can still drive `Cpu`/`MemoryBus`/`Ppu`
/// directly, but `Engine` is the composed, ready-to-go path.
pub struct Engine {
    pub cpu: Cpu,
    pub memory_bus: MemoryBus,
    pub ppu: Ppu,
}

impl Engine {
    /// Loads `rom_data` and prepares an engine ready to run. `skip_boot_rom`
    /// seeds CPU/IO register state to the documented post-boot-ROM values
    /// and starts execution at PC=0x0100 instead of the boot ROM's 0x0000.
    pub fn new(rom_data: &[u8], skip_boot_rom: bool) -> CoreResult<Self> {
        let mut memory_bus = MemoryBus::new();
        memory_bus.load_rom(rom_data)?;

        let cpu = Cpu::new(skip_boot_rom);
        if skip_boot_rom {
            Cpu::initialize_post_boot_io(&mut memory_bus);
        }

        let ppu = Ppu::new();

        Ok(Engine {
            cpu,
            memory_bus,
            ppu,
        })
    }

    /// Executes exactly one CPU instruction (or interrupt dispatch, or one
    /// HALT/STOP no-op tick). Instruction and HALT/STOP cycles advance the
    /// timer and PPU; interrupt dispatch cycles are folded only into the
    /// returned total, never forwarded to the timer/PPU, matching the
    /// original's `cyclesThisFrame += doInterrupts(...)` split from
    /// `updateTimer`/`updateGraphics`. Returns the cycle count consumed.
    pub fn step_instruction(&mut self) -> CoreResult<u16> {
        let outcome = self.cpu.step(&mut self.memory_bus)?;
        if let StepOutcome::Instruction(cycles) = outcome {
            self.memory_bus.step_timer(cycles as u32);
            self.ppu.step(cycles as u32, &mut self.memory_bus);
        }
        Ok(outcome.cycles())
    }

    /// Runs CPU/timer/PPU together until at least one frame's worth of
    /// cycles (`CYCLES_PER_FRAME`) has elapsed.
    pub fn run_frame(&mut self) -> CoreResult<()> {
        let mut cycles_this_frame: u32 = 0;
        while cycles_this_frame < CYCLES_PER_FRAME {
            let executed = self.step_instruction()?;
            cycles_this_frame += executed as u32;
        }
        Ok(())
    }
}
