use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::machine::FlatBus;

/// CPU at its power-on state with `program` placed at 0x0100.
fn setup(program: &[u8]) -> (Cpu, FlatBus) {
    let mut bus = FlatBus::new();
    bus.poke_slice(0x0100, program);
    (Cpu::new(), bus)
}

fn run_steps(cpu: &mut Cpu, bus: &mut FlatBus, steps: usize) -> u64 {
    (0..steps)
        .map(|_| u64::from(cpu.step(bus).expect("step failed")))
        .sum()
}

fn read_word(bus: &FlatBus, addr: u16) -> u16 {
    u16::from_le_bytes([bus.peek(addr), bus.peek(addr.wrapping_add(1))])
}

#[test]
fn power_on_state() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime());
    assert_eq!(cpu.cycles(), 0);
    assert!(cpu.is_running());
    assert!(!cpu.is_waiting());
}

#[test]
fn nop_at_entry_point() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    let before = cpu.regs;

    assert_eq!(cpu.step(&mut bus), Ok(4));

    assert_eq!(cpu.regs.pc, 0x0101);
    assert_eq!(Registers { pc: 0x0100, ..cpu.regs }, before);
    assert_eq!(cpu.cycles(), 4);
    assert_eq!(cpu.last_opcode(), 0x00);
    assert!(!cpu.ime());
}

#[test]
fn enable_interrupts_lands_after_two_steps() {
    let (mut cpu, mut bus) = setup(&[0x00; 4]);
    cpu.enable_interrupts();

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime());
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime());
}

#[test]
fn disable_interrupts_lands_after_two_steps() {
    let (mut cpu, mut bus) = setup(&[0x00; 4]);
    cpu.enable_interrupts();
    run_steps(&mut cpu, &mut bus, 2);
    assert!(cpu.ime());

    cpu.disable_interrupts();
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime());
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime());
}

#[test]
fn ei_takes_effect_after_the_following_instruction() {
    // EI; NOP; DI; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0xF3, 0x00]);

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime());
    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime());

    cpu.step(&mut bus).unwrap();
    assert!(cpu.ime());
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime());
}

#[test]
fn all_pending_sources_are_serviced_in_priority_order() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x00]);
    bus.poke(0xFFFF, 0x1F);
    bus.poke(0xFF0F, 0x1F);
    cpu.enable_interrupts();

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.pc, 0x0101);

    // IME turns on at the end of the second step; all five dispatch in it.
    assert_eq!(cpu.step(&mut bus), Ok(4 + 5 * INTERRUPT_SERVICE_CYCLES));

    // VBlank went first and pushed the interrupted PC; each later forced
    // call pushed the previous vector.
    assert_eq!(read_word(&bus, 0xFFFC), 0x0102);
    assert_eq!(read_word(&bus, 0xFFFA), 0x0040);
    assert_eq!(read_word(&bus, 0xFFF8), 0x0048);
    assert_eq!(read_word(&bus, 0xFFF6), 0x0050);
    assert_eq!(read_word(&bus, 0xFFF4), 0x0058);
    assert_eq!(cpu.regs.sp, 0xFFF4);
    assert_eq!(cpu.regs.pc, 0x0060);

    assert_eq!(bus.read_if() & 0x1F, 0);
    assert!(!cpu.ime());
    assert_eq!(cpu.cycles(), 108);

    let times: Vec<_> = InterruptSource::ALL
        .iter()
        .map(|&source| cpu.last_serviced(source))
        .collect();
    assert_eq!(times, vec![Some(28), Some(48), Some(68), Some(88), Some(108)]);
}

#[test]
fn forced_call_pushes_pc_and_jumps_to_vector() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x00]);
    bus.poke(0xFFFF, 0x04);
    bus.poke(0xFF0F, 0x04);
    cpu.enable_interrupts();
    run_steps(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(read_word(&bus, 0xFFFC), 0x0102);
    assert_eq!(cpu.regs.pc, InterruptSource::Timer.vector());
    assert_eq!(bus.read_if() & 0x1F, 0);
    assert_eq!(cpu.last_serviced(InterruptSource::Timer), Some(28));
    assert_eq!(cpu.last_serviced(InterruptSource::VBlank), None);
}

#[test]
fn requested_but_disabled_sources_are_ignored() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x00, 0x00]);
    bus.poke(0xFFFF, 0x01);
    bus.poke(0xFF0F, 0x1E);
    cpu.enable_interrupts();
    run_steps(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(bus.read_if() & 0x1F, 0x1E);
    assert!(cpu.ime());
}

#[test]
fn reti_enables_immediately() {
    // RETI at 0x0100, return address 0x1234 on the stack.
    let (mut cpu, mut bus) = setup(&[0xD9]);
    cpu.regs.sp = 0xDFF0;
    bus.poke_slice(0xDFF0, &[0x34, 0x12]);

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert!(cpu.ime());
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xDFF2);
}

#[test]
fn reset_is_idempotent() {
    let (mut cpu, mut bus) = setup(&[0x06, 0x42, 0xFB, 0x00, 0x10, 0x00]);
    cpu.register_breakpoint(0x0102, |_| BreakAction::Continue);
    run_steps(&mut cpu, &mut bus, 4);
    assert!(!cpu.is_running());

    cpu.reset();
    let once = (cpu.regs, cpu.interrupts().clone(), cpu.cycles(), cpu.is_running());
    cpu.reset();
    let twice = (cpu.regs, cpu.interrupts().clone(), cpu.cycles(), cpu.is_running());

    assert_eq!(once, twice);
    let fresh = Cpu::new();
    assert_eq!(cpu.regs, fresh.regs);
    assert_eq!(cpu.interrupts(), fresh.interrupts());
    assert_eq!(cpu.cycles(), 0);
    assert!(cpu.is_running());
    assert!(!cpu.is_waiting());
    assert!(cpu.has_breakpoint(0x0102));
}

#[test]
fn cycle_counter_is_the_sum_of_step_costs() {
    let program = [
        0x00, // NOP              4
        0x06, 0x42, // LD B,0x42        8
        0x21, 0x00, 0xC0, // LD HL,0xC000    12
        0x77, // LD (HL),A        8
        0x34, // INC (HL)        12
        0xC3, 0x00, 0x02, // JP 0x0200       16
    ];
    let (mut cpu, mut bus) = setup(&program);

    let costs: Vec<_> = (0..6).map(|_| cpu.step(&mut bus).unwrap()).collect();
    assert_eq!(costs, vec![4, 8, 12, 8, 12, 16]);
    assert_eq!(cpu.cycles(), costs.iter().map(|&c| u64::from(c)).sum::<u64>());
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(bus.peek(0xC000), 0x02);
}

#[test]
fn fetch_fault_leaves_state_untouched() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    bus.unmap(0x0100..=0x0100);
    let before = cpu.regs;

    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::Memory(MemoryFault::read(0x0100)))
    );
    assert_eq!(cpu.regs, before);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn execution_fault_propagates_unchanged() {
    // LD HL,0xC000; LD (HL),A
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0xC0, 0x77]);
    bus.unmap(0xC000..=0xCFFF);

    cpu.step(&mut bus).unwrap();
    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(err, CpuError::Memory(MemoryFault::write(0xC000)));
    assert_eq!(err.to_string(), "memory fault: write at 0xC000");

    // No rollback: PC is past the opcode and nothing was charged.
    assert_eq!(cpu.regs.pc, 0x0104);
    assert_eq!(cpu.cycles(), 12);
}

#[test]
fn stack_fault_during_dispatch_propagates() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x00]);
    bus.poke(0xFFFF, 0x01);
    bus.poke(0xFF0F, 0x01);
    bus.unmap(0xFF80..=0xFFFD);
    cpu.enable_interrupts();

    cpu.step(&mut bus).unwrap();
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::Memory(MemoryFault::write(0xFFFC)))
    );

    // The request survives the failed call.
    assert_eq!(bus.read_if() & 0x01, 0x01);
    assert_eq!(cpu.last_serviced(InterruptSource::VBlank), None);
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn unimplemented_opcode_reports_its_address() {
    let (mut cpu, mut bus) = setup(&[0x00, 0xD3]);
    cpu.step(&mut bus).unwrap();

    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::UnimplementedOpcode {
            opcode: 0xD3,
            pc: 0x0101
        })
    );
    assert_eq!(cpu.last_opcode(), 0xD3);
}

#[test]
fn prefix_consumes_its_second_byte() {
    let (mut cpu, mut bus) = setup(&[0xCB, 0x37]);

    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::UnsupportedExtension {
            opcode: 0x37,
            pc: 0x0100
        })
    );
    assert_eq!(cpu.regs.pc, 0x0102);
}

const DEBUG_PROGRAM: [u8; 9] = [
    0x3E, 0x0F, // LD A,0x0F
    0xC6, 0x01, // ADD A,0x01
    0x47, // LD B,A
    0xC5, // PUSH BC
    0xE1, // POP HL
    0x18, 0xF7, // JR -9
];

fn run_debug_program(cpu: &mut Cpu) -> (Registers, u64) {
    let mut bus = FlatBus::new();
    bus.poke_slice(0x0100, &DEBUG_PROGRAM);
    run_steps(cpu, &mut bus, 12);
    (cpu.regs, cpu.cycles())
}

#[test]
fn breakpoints_observe_without_changing_results() {
    let baseline = run_debug_program(&mut Cpu::new());

    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut cpu = Cpu::new();
    for addr in [0x0100, 0x0104, 0x0107] {
        let hits = Rc::clone(&hits);
        cpu.register_breakpoint(addr, move |hit| {
            hits.borrow_mut().push((hit.pc, hit.opcode));
            BreakAction::Continue
        });
    }

    assert_eq!(run_debug_program(&mut cpu), baseline);
    assert_eq!(
        hits.borrow()[..3],
        [(0x0100, 0x3E), (0x0104, 0x47), (0x0107, 0x18)]
    );
    assert_eq!(hits.borrow().len(), 6);
}

#[test]
fn breakpoint_snapshot_is_taken_before_execution() {
    let (mut cpu, mut bus) = setup(&DEBUG_PROGRAM);
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    cpu.register_breakpoint(0x0102, move |hit| {
        *sink.borrow_mut() = Some(hit.clone());
        BreakAction::Continue
    });

    run_steps(&mut cpu, &mut bus, 2);

    let hit = seen.borrow().clone().expect("breakpoint not hit");
    assert_eq!(hit.pc, 0x0102);
    assert_eq!(hit.opcode, 0xC6);
    assert_eq!(hit.regs.a, 0x0F);
    assert_eq!(hit.cycles, 8);
    assert!(!hit.ime);
    assert_eq!(cpu.regs.a, 0x10);
}

#[test]
fn removed_breakpoints_stop_firing() {
    let (mut cpu, mut bus) = setup(&[0x00; 4]);
    let count = Rc::new(Cell::new(0));
    for addr in [0x0100, 0x0101] {
        let count = Rc::clone(&count);
        cpu.register_breakpoint(addr, move |_| {
            count.set(count.get() + 1);
            BreakAction::Continue
        });
    }

    assert!(cpu.remove_breakpoint(0x0101));
    assert!(!cpu.remove_breakpoint(0x0101));
    run_steps(&mut cpu, &mut bus, 2);
    assert_eq!(count.get(), 1);

    cpu.clear_breakpoints();
    assert!(!cpu.has_breakpoint(0x0100));
}

#[test]
fn breakpoint_can_request_a_pause_on_the_next_step() {
    let (mut cpu, mut bus) = setup(&[0x00; 4]);
    cpu.register_breakpoint(0x0100, |_| BreakAction::Pause);
    let paused_at = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&paused_at);
    cpu.set_pause_handler(move |report: &PauseReport| sink.borrow_mut().push(report.pc));

    run_steps(&mut cpu, &mut bus, 3);
    assert_eq!(*paused_at.borrow(), vec![0x0101]);
}

#[test]
fn single_step_pauses_before_every_instruction() {
    let baseline = run_debug_program(&mut Cpu::new());

    let mut cpu = Cpu::new();
    assert!(!cpu.is_single_step());
    cpu.set_single_step(true);
    assert!(cpu.is_single_step());
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);
    cpu.set_pause_handler(move |report: &PauseReport| sink.borrow_mut().push(report.clone()));

    assert_eq!(run_debug_program(&mut cpu), baseline);

    let reports = reports.borrow();
    assert_eq!(reports.len(), 12);
    let pcs: Vec<_> = reports.iter().take(6).map(|r| r.pc).collect();
    assert_eq!(pcs, vec![0x0100, 0x0102, 0x0104, 0x0105, 0x0106, 0x0107]);
    assert_eq!(reports[0].disassembly, "LD A,0x0F");
    assert_eq!(reports[5].disassembly, "JR 0x0100");
}

#[test]
fn pause_report_reads_speculatively() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.regs.set_hl(0xC000);
    bus.poke_slice(0xC000, &[0x34, 0x12]);
    bus.poke_slice(0xFFFE, &[0xCD]);
    bus.unmap(0xA000..=0xBFFF);

    let report = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&report);
    cpu.set_pause_handler(move |r: &PauseReport| *sink.borrow_mut() = Some(r.clone()));
    cpu.break_now();

    assert_eq!(cpu.step(&mut bus), Ok(4));

    let report = report.borrow().clone().expect("pause handler not called");
    assert_eq!(report.disassembly, "NOP");
    assert_eq!(report.hl_word, Some(0x1234));
    // High byte of (SP) comes from IE at 0xFFFF.
    assert_eq!(report.sp_word, Some(0x00CD));
    assert_eq!(report.sram_word, None);
    assert_eq!(report.if_reg, 0xE1);
    assert_eq!(report.ie_reg, 0x00);

    // One-shot: the next step does not pause again.
    let pauses = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pauses);
    cpu.set_pause_handler(move |_: &PauseReport| counter.set(counter.get() + 1));
    cpu.step(&mut bus).unwrap();
    assert_eq!(pauses.get(), 0);
}

#[test]
fn halt_waits_until_a_source_is_pending() {
    // HALT; NOP
    let (mut cpu, mut bus) = setup(&[0x76, 0x00]);

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert!(cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x0101);

    assert_eq!(cpu.step(&mut bus), Ok(WAIT_IDLE_CYCLES));
    assert!(cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x0101);

    // IME is off: the pending source only wakes the CPU.
    bus.poke(0xFFFF, 0x04);
    bus.poke(0xFF0F, 0x04);
    assert_eq!(cpu.step(&mut bus), Ok(WAIT_IDLE_CYCLES));
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x0101);

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.cycles(), 16);
}

#[test]
fn halt_with_ime_dispatches_on_wake() {
    // EI; HALT
    let (mut cpu, mut bus) = setup(&[0xFB, 0x76]);
    run_steps(&mut cpu, &mut bus, 2);
    assert!(cpu.ime());
    assert!(cpu.is_waiting());

    bus.request_interrupt(InterruptSource::Timer);
    bus.poke(0xFFFF, 0x04);
    assert_eq!(
        cpu.step(&mut bus),
        Ok(WAIT_IDLE_CYCLES + INTERRUPT_SERVICE_CYCLES)
    );
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(read_word(&bus, cpu.regs.sp), 0x0102);
}

#[test]
fn stop_clears_running_and_skips_padding() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00]);
    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert!(!cpu.is_running());
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn call_and_return() {
    let (mut cpu, mut bus) = setup(&[0xCD, 0x00, 0x02]);
    bus.poke(0x0200, 0xC9);

    assert_eq!(cpu.step(&mut bus), Ok(24));
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(read_word(&bus, 0xFFFC), 0x0103);

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn conditional_branches_follow_flags() {
    // Power-on F=0xB0 has Z and C set.
    // JR NZ,+5; JR Z,-2
    let (mut cpu, mut bus) = setup(&[0x20, 0x05, 0x28, 0xFE]);

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.pc, 0x0102);

    // CALL NC not taken, RET C taken.
    let (mut cpu, mut bus) = setup(&[0xD4, 0x00, 0x40, 0xD8]);
    cpu.regs.sp = 0xDFF0;
    bus.poke_slice(0xDFF0, &[0x00, 0x30]);
    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs.pc, 0x3000);
}

#[test]
fn restart_pushes_the_next_address() {
    let (mut cpu, mut bus) = setup(&[0xFF]);
    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.pc, 0x0038);
    assert_eq!(read_word(&bus, cpu.regs.sp), 0x0101);
}

#[test]
fn pop_af_masks_the_flag_nibble() {
    // PUSH BC; POP AF
    let (mut cpu, mut bus) = setup(&[0xC5, 0xF1]);
    cpu.regs.set_bc(0x12FF);
    run_steps(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0xF0);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn loads_move_data_through_memory() {
    let program = [
        0x21, 0x00, 0xC0, // LD HL,0xC000
        0x3E, 0x5A, // LD A,0x5A
        0x22, // LD (HL+),A
        0x32, // LD (HL-),A
        0xE0, 0x80, // LDH (0xFF80),A
        0xEA, 0x10, 0xC0, // LD (0xC010),A
        0x2A, // LD A,(HL+)
        0x08, 0x20, 0xC0, // LD (0xC020),SP
    ];
    let (mut cpu, mut bus) = setup(&program);
    run_steps(&mut cpu, &mut bus, 8);

    assert_eq!(bus.peek(0xC000), 0x5A);
    assert_eq!(bus.peek(0xC001), 0x5A);
    assert_eq!(bus.peek(0xFF80), 0x5A);
    assert_eq!(bus.peek(0xC010), 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);
    assert_eq!(read_word(&bus, 0xC020), 0xFFFE);
}

#[test]
fn alu_and_incdec_update_flags() {
    let program = [
        0x3E, 0x0F, // LD A,0x0F
        0xC6, 0x01, // ADD A,0x01
        0xFE, 0x10, // CP 0x10
        0x3D, // DEC A
        0x2F, // CPL
        0x37, // SCF
        0x3F, // CCF
    ];
    let (mut cpu, mut bus) = setup(&program);

    run_steps(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.flag_string(), "--H-");

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.flag_string(), "ZN--");

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0x0F);
    assert_eq!(cpu.regs.flag_string(), "-NH-");

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0xF0);

    cpu.step(&mut bus).unwrap();
    assert!(cpu.get_flag(Flag::C));
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn sixteen_bit_arithmetic() {
    // ADD HL,BC; INC DE; LD HL,SP-2; LD SP,HL
    let (mut cpu, mut bus) = setup(&[0x09, 0x13, 0xF8, 0xFE, 0xF9]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert!(cpu.get_flag(Flag::H));

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.de(), 0x00D9);

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.hl(), 0xFFFC);

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.sp, 0xFFFC);
}
