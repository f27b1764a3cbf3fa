use dmg_core::memory_bus::MemoryBus;

const TIMA_ADDR: u16 = 0xFF05;
const TMA_ADDR: u16 = 0xFF06;
const TAC_ADDR: u16 = 0xFF07;
const IF_ADDR: u16 = 0xFF0F;

#[test]
fn tima_overflow_reloads_from_tma_and_requests_interrupt() {
    // S5: TAC=0x05 (enabled, period=16), TIMA=0xFF, TMA=0x42; advance 16
    // cycles => TIMA=0x42, IF bit 2 set.
    let mut bus = MemoryBus::new();
    bus.write_byte(TAC_ADDR, 0x05);
    bus.write_byte(TMA_ADDR, 0x42);
    bus.write_byte(TIMA_ADDR, 0xFF);

    bus.step_timer(16);

    assert_eq!(bus.read_byte(TIMA_ADDR), 0x42);
    assert_ne!(bus.read_byte(IF_ADDR) & (1 << 2), 0);
}

#[test]
fn disabled_timer_never_advances_tima() {
    let mut bus = MemoryBus::new();
    bus.write_byte(TAC_ADDR, 0x01); // period bits set but enable bit (2) clear
    bus.write_byte(TIMA_ADDR, 0x00);

    bus.step_timer(10_000);

    assert_eq!(bus.read_byte(TIMA_ADDR), 0x00);
    assert_eq!(bus.read_byte(IF_ADDR) & (1 << 2), 0);
}

#[test]
fn multiple_overflows_within_one_step_are_all_applied() {
    // period=16, three ticks in a single step_timer call: 0xFE -> 0xFF ->
    // overflow/reload to TMA=0x01 -> 0x02. Only the middle tick overflows.
    let mut bus = MemoryBus::new();
    bus.write_byte(TAC_ADDR, 0x05); // enabled, period 16
    bus.write_byte(TMA_ADDR, 0x01);
    bus.write_byte(TIMA_ADDR, 0xFE);

    bus.step_timer(16 * 3);

    assert_eq!(bus.read_byte(TIMA_ADDR), 0x02);
    assert_ne!(bus.read_byte(IF_ADDR) & (1 << 2), 0);
}
