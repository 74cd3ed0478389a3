use std::time::{Duration, Instant};

use emu8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_ROM_SIZE, MEMORY_SIZE};
use emu8::{Chip8, Config, Keypad, LoadError};

fn chip8() -> Chip8 {
    Chip8::with_config(Config::default().with_seed(0x5EED)).unwrap()
}

#[test]
fn test_clear_then_load_then_add() {
    let mut chip8 = chip8();
    // CLS; LD V0, 5; ADD V0, 3
    chip8.load(&[0x00, 0xE0, 0x60, 0x05, 0x70, 0x03]).unwrap();

    let frame = chip8.step(Keypad::new()).unwrap();
    let frame = frame.expect("clear redraws the display");
    assert!(frame.iter().flatten().all(|&pixel| !pixel));
    assert_eq!(chip8.state().pc, 0x202);

    assert_eq!(chip8.step(Keypad::new()).unwrap(), None);
    assert_eq!(chip8.state().v[0x0], 5);
    assert_eq!(chip8.state().pc, 0x204);

    assert_eq!(chip8.step(Keypad::new()).unwrap(), None);
    assert_eq!(chip8.state().v[0x0], 8);
    assert_eq!(chip8.state().pc, 0x206);
}

#[test]
fn test_add_immediate_wraps() {
    let mut chip8 = chip8();
    // LD V3, 0xFF; ADD V3, 1
    chip8.load(&[0x63, 0xFF, 0x73, 0x01]).unwrap();
    chip8.step(Keypad::new()).unwrap();
    chip8.step(Keypad::new()).unwrap();
    assert_eq!(chip8.state().v[0x3], 0);
}

#[test]
fn test_draw_clips_at_right_edge_and_toggles_back() {
    let mut chip8 = chip8();
    #[rustfmt::skip]
    let rom = [
        0x60, 0x3C, // LD V0, 60
        0x61, 0x00, // LD V1, 0
        0xA2, 0x0C, // LD I, 0x20C
        0xD0, 0x11, // DRW V0, V1, 1
        0xD0, 0x11, // DRW V0, V1, 1
        0x12, 0x0A, // JP 0x20A
        0xFF,       // sprite
    ];
    chip8.load(&rom).unwrap();
    for _ in 0..3 {
        chip8.step(Keypad::new()).unwrap();
    }

    let frame = chip8.step(Keypad::new()).unwrap().expect("draw redraws");
    for x in 0..DISPLAY_WIDTH {
        assert_eq!(frame[0][x], x >= 60, "column {}", x);
    }
    assert!(frame[1..DISPLAY_HEIGHT].iter().flatten().all(|&p| !p));
    assert_eq!(chip8.state().v[0xF], 0);

    let frame = chip8.step(Keypad::new()).unwrap().expect("draw redraws");
    assert!(frame.iter().flatten().all(|&p| !p));
    assert_eq!(chip8.frame(), &frame);
    assert_eq!(chip8.state().v[0xF], 1);
}

#[test]
fn test_largest_rom_fills_memory() {
    let mut chip8 = chip8();
    let mut rom = vec![0; MAX_ROM_SIZE];
    rom[MAX_ROM_SIZE - 1] = 0x99;
    chip8.load(&rom).unwrap();
    assert_eq!(chip8.state().memory.read(0xFFF), 0x99);
    assert_eq!(MEMORY_SIZE - 1, 0xFFF);
}

#[test]
fn test_rom_one_byte_too_large() {
    let mut chip8 = chip8();
    let rom = vec![0; MEMORY_SIZE - 0x200 + 1];
    assert!(matches!(
        chip8.load(&rom),
        Err(LoadError::RomTooLarge { .. })
    ));
}

#[test]
fn test_pc_wraps_after_last_word() {
    let mut chip8 = chip8();
    let mut rom = vec![0; MAX_ROM_SIZE];
    // JP 0xFFE
    rom[0] = 0x1F;
    rom[1] = 0xFE;
    // LD V0, 7 at 0xFFE
    rom[MAX_ROM_SIZE - 2] = 0x60;
    rom[MAX_ROM_SIZE - 1] = 0x07;
    chip8.load(&rom).unwrap();
    chip8.step(Keypad::new()).unwrap();
    assert_eq!(chip8.state().pc, 0xFFE);
    chip8.step(Keypad::new()).unwrap();
    assert_eq!(chip8.state().v[0x0], 7);
    assert_eq!(chip8.state().pc, 0x000);
}

#[test]
fn test_buzzer_stops_after_one_tick() {
    let mut chip8 = chip8();
    // LD V0, 1; LD ST, V0; JP 0x204
    chip8.load(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]).unwrap();
    let start = Instant::now();
    chip8.step_at(Keypad::new(), start).unwrap();
    chip8.step_at(Keypad::new(), start).unwrap();
    assert!(chip8.buzzer_active());

    let after_tick = start + Duration::from_millis(20);
    chip8.step_at(Keypad::new(), after_tick).unwrap();
    assert!(!chip8.buzzer_active());
    assert_eq!(chip8.state().sound_timer, 0);

    chip8.step_at(Keypad::new(), after_tick + Duration::from_secs(1)).unwrap();
    assert_eq!(chip8.state().sound_timer, 0);
}

#[test]
fn test_delay_timer_counts_down_between_reads() {
    let mut chip8 = chip8();
    #[rustfmt::skip]
    let rom = [
        0x60, 0x3C, // LD V0, 60
        0xF0, 0x15, // LD DT, V0
        0xF1, 0x07, // LD V1, DT
        0xF1, 0x07, // LD V1, DT
    ];
    chip8.load(&rom).unwrap();
    let start = Instant::now();
    chip8.step_at(Keypad::new(), start).unwrap();
    chip8.step_at(Keypad::new(), start).unwrap();
    chip8.step_at(Keypad::new(), start).unwrap();
    assert_eq!(chip8.state().v[0x1], 60);

    // half a second of ticks land after this step
    chip8
        .step_at(Keypad::new(), start + Duration::from_millis(500))
        .unwrap();
    let remaining = chip8.state().delay_timer;
    assert!((29..=31).contains(&remaining), "{}", remaining);
}

#[test]
fn test_wait_for_key_then_skip_if_pressed() {
    let mut chip8 = chip8();
    #[rustfmt::skip]
    let rom = [
        0xF2, 0x0A, // LD V2, K
        0xE2, 0x9E, // SKP V2
        0x63, 0x01, // LD V3, 1
        0x64, 0x01, // LD V4, 1
    ];
    chip8.load(&rom).unwrap();
    chip8.step(Keypad::new()).unwrap();
    assert!(chip8.is_awaiting_key());

    let mut pressed = [false; 16];
    pressed[0xB] = true;
    chip8.step(pressed).unwrap();
    assert_eq!(chip8.state().v[0x2], 0xB);

    chip8.step(pressed).unwrap();
    assert_eq!(chip8.state().pc, 0x206);
    chip8.step(pressed).unwrap();
    assert_eq!(chip8.state().v[0x3], 0);
    assert_eq!(chip8.state().v[0x4], 1);
}

#[test]
fn test_subroutine_round_trip() {
    let mut chip8 = chip8();
    #[rustfmt::skip]
    let rom = [
        0x22, 0x06, // CALL 0x206
        0x61, 0x02, // LD V1, 2
        0x12, 0x04, // JP 0x204
        0x60, 0x01, // LD V0, 1
        0x00, 0xEE, // RET
    ];
    chip8.load(&rom).unwrap();
    for _ in 0..4 {
        chip8.step(Keypad::new()).unwrap();
    }
    assert_eq!(chip8.state().v[0x0], 1);
    assert_eq!(chip8.state().v[0x1], 2);
    assert!(chip8.state().call_stack().is_empty());
}

#[test]
fn test_font_digit_draws() {
    let mut chip8 = chip8();
    #[rustfmt::skip]
    let rom = [
        0x60, 0x07, // LD V0, 7
        0xF0, 0x29, // LD F, V0
        0xD1, 0x15, // DRW V1, V1, 5
    ];
    chip8.load(&rom).unwrap();
    chip8.step(Keypad::new()).unwrap();
    chip8.step(Keypad::new()).unwrap();
    let frame = chip8.step(Keypad::new()).unwrap().expect("draw redraws");
    // the 7 glyph: F0 10 20 40 40
    assert_eq!(frame[0][0..4], [true, true, true, true]);
    assert_eq!(frame[1][0..4], [false, false, false, true]);
    assert_eq!(frame[4][0..4], [false, true, false, false]);
}
