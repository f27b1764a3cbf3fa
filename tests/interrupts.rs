use dmg_core::cpu::{Cpu, IE_REGISTER, IF_REGISTER};
use dmg_core::joypad::BUTTON_DOWN;
use dmg_core::memory_bus::MemoryBus;

fn machine_with_nops_at_vector(vector: u16) -> (Cpu, MemoryBus) {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0147] = 0x00;
    // Leave the vector and everything after it as NOPs so a dispatched
    // interrupt has somewhere safe to run.
    let _ = vector;

    let mut bus = MemoryBus::new();
    bus.load_rom(&rom).unwrap();
    let mut cpu = Cpu::new(false);
    cpu.pc = 0x1000;
    cpu.sp = 0xFFFE;
    cpu.ime = true;
    (cpu, bus)
}

#[test]
fn joypad_interrupt_dispatches_to_its_vector_and_clears_if() {
    // S7: select bits = directions, key_pressed(Down) with IE bit 4 and IME
    // set => PC becomes 0x60, IF bit 4 cleared.
    let (mut cpu, mut bus) = machine_with_nops_at_vector(0x0060);
    bus.write_byte(0xFF00, 0x20); // P1: select direction group (bit 4 low, bit 5 high)
    bus.write_byte(IE_REGISTER, 1 << 4);

    bus.key_pressed(BUTTON_DOWN);
    assert_ne!(bus.read_byte(IF_REGISTER) & (1 << 4), 0);

    cpu.step(&mut bus).unwrap(); // services the pending interrupt

    assert_eq!(cpu.pc, 0x0060);
    assert_eq!(bus.read_byte(IF_REGISTER) & (1 << 4), 0);
}

#[test]
fn press_in_unselected_group_does_not_raise_an_interrupt() {
    let (_, mut bus) = machine_with_nops_at_vector(0x0060);
    bus.write_byte(0xFF00, 0x10); // select action group, not directions
    bus.write_byte(IE_REGISTER, 1 << 4);

    bus.key_pressed(BUTTON_DOWN);

    assert_eq!(bus.read_byte(IF_REGISTER) & (1 << 4), 0);
}

#[test]
fn lowest_bit_interrupt_wins_when_multiple_are_pending() {
    // VBlank (bit 0) must dispatch before Timer (bit 2) when both are
    // pending and enabled.
    let (mut cpu, mut bus) = machine_with_nops_at_vector(0x0040);
    bus.write_byte(IE_REGISTER, 0x1F);
    bus.write_byte(IF_REGISTER, (1 << 2) | (1 << 0));

    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.pc, 0x0040);
    assert_eq!(bus.read_byte(IF_REGISTER) & 0x1F, 1 << 2);
}

#[test]
fn servicing_an_interrupt_clears_ime_and_pushes_return_address() {
    let (mut cpu, mut bus) = machine_with_nops_at_vector(0x0040);
    bus.write_byte(IE_REGISTER, 0x01);
    bus.write_byte(IF_REGISTER, 0x01);
    let return_pc = cpu.pc;

    cpu.step(&mut bus).unwrap();

    assert!(!cpu.ime);
    let pushed = cpu.pop_word(&mut bus);
    assert_eq!(pushed, return_pc);
}
