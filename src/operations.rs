use log::{debug, warn};
use rand::Rng;

use crate::config::Quirks;
use crate::constants::{ADDRESS_MASK, FONT_GLYPH_SIZE, FONT_START, STACK_DEPTH};
use crate::error::Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::state::State;

/// Everything an instruction may consult besides the machine state.
pub struct Environment<'a, R: Rng> {
    pub keys: &'a Keypad,
    pub rng: &'a mut R,
    pub quirks: Quirks,
}

/// Applies a single instruction to `state`.
///
/// Expects the pc to already point past the instruction. On error nothing has been changed.
pub fn execute<R: Rng>(
    instruction: Instruction,
    state: &mut State,
    env: &mut Environment<'_, R>,
) -> Result<(), Error> {
    use Instruction::*;

    match instruction {
        Sys(addr) => warn!("ignoring machine code call to {:#05X}", addr),
        Clear => state.display.clear(),
        Return => ret(state)?,
        Jump(addr) => state.jump(addr),
        Call(addr) => call(state, addr)?,
        SkipEqImm { x, kk } => state.skip_if(state.register(x) == kk),
        SkipNeImm { x, kk } => state.skip_if(state.register(x) != kk),
        SkipEqReg { x, y } => state.skip_if(state.register(x) == state.register(y)),
        LoadImm { x, kk } => state.set_register(x, kk),
        AddImm { x, kk } => state.set_register(x, state.register(x).wrapping_add(kk)),
        Move { x, y } => state.set_register(x, state.register(y)),
        Or { x, y } => state.set_register(x, state.register(x) | state.register(y)),
        And { x, y } => state.set_register(x, state.register(x) & state.register(y)),
        Xor { x, y } => state.set_register(x, state.register(x) ^ state.register(y)),
        AddReg { x, y } => add(state, x, y),
        Sub { x, y } => sub(state, x, x, y),
        ShiftRight { x, y } => shr(state, x, y, env.quirks),
        SubN { x, y } => sub(state, x, y, x),
        ShiftLeft { x, y } => shl(state, x, y, env.quirks),
        SkipNeReg { x, y } => state.skip_if(state.register(x) != state.register(y)),
        LoadIndex(addr) => state.set_index(addr),
        JumpOffset(addr) => state.jump(u16::from(state.register(0x0)) + addr),
        Random { x, kk } => state.set_register(x, env.rng.gen::<u8>() & kk),
        Draw { x, y, n } => draw(state, x, y, n),
        SkipPressed { x } => state.skip_if(env.keys.is_pressed(state.register(x))),
        SkipNotPressed { x } => state.skip_if(!env.keys.is_pressed(state.register(x))),
        LoadDelay { x } => state.set_register(x, state.delay_timer),
        WaitKey { x } => {
            debug!("waiting for a key press into V{:X}", x);
            state.awaiting_key = Some(x);
        }
        SetDelay { x } => state.delay_timer = state.register(x),
        SetSound { x } => state.sound_timer = state.register(x),
        AddIndex { x } => state.set_index(state.i + u16::from(state.register(x))),
        LoadFont { x } => {
            state.set_index(FONT_START + u16::from(state.register(x) & 0xF) * FONT_GLYPH_SIZE)
        }
        StoreBcd { x } => bcd(state, x),
        StoreRegisters { x } => store(state, x, env.quirks),
        LoadRegisters { x } => load(state, x, env.quirks),
    }
    Ok(())
}

/// The address of the instruction being executed.
fn instruction_address(state: &State) -> u16 {
    state.pc.wrapping_sub(2) & ADDRESS_MASK
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<(), Error> {
    if state.sp == STACK_DEPTH {
        return Err(Error::StackOverflow {
            address: instruction_address(state),
        });
    }
    state.stack[state.sp] = state.pc;
    state.sp += 1;
    state.jump(addr);
    Ok(())
}

/// PC = STACK.pop()
fn ret(state: &mut State) -> Result<(), Error> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow {
            address: instruction_address(state),
        });
    }
    state.sp -= 1;
    state.jump(state.stack[state.sp]);
    Ok(())
}

/// Vx += Vy; VF = carry
fn add(state: &mut State, x: u8, y: u8) {
    let (res, carry) = state.register(x).overflowing_add(state.register(y));
    state.set_register(x, res);
    state.set_flag(carry);
}

/// Vx = Va - Vb; VF = !borrow
fn sub(state: &mut State, x: u8, a: u8, b: u8) {
    let (res, borrow) = state.register(a).overflowing_sub(state.register(b));
    state.set_register(x, res);
    state.set_flag(!borrow);
}

/// Vx = Vx >> 1; VF = shifted out bit
fn shr(state: &mut State, x: u8, y: u8, quirks: Quirks) {
    let value = state.register(if quirks.shift_uses_vy { y } else { x });
    state.set_register(x, value >> 1);
    state.set_flag(value & 0x1 == 0x1);
}

/// Vx = Vx << 1; VF = shifted out bit
fn shl(state: &mut State, x: u8, y: u8, quirks: Quirks) {
    let value = state.register(if quirks.shift_uses_vy { y } else { x });
    state.set_register(x, value << 1);
    state.set_flag(value & 0x80 == 0x80);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position Vx, Vy with clipping.
/// Sets VF if any pixels were erased
fn draw(state: &mut State, x: u8, y: u8, n: u8) {
    let mut sprite = [0; 15];
    for (row, byte) in sprite.iter_mut().enumerate().take(n as usize) {
        *byte = state.memory.read(state.i.wrapping_add(row as u16));
    }
    let (vx, vy) = (state.register(x), state.register(y));
    let collision = state.display.draw_sprite(vx, vy, &sprite[..n as usize]);
    state.set_flag(collision);
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: u8) {
    let value = state.register(x);
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.memory.write_block(state.i, &digits);
}

/// mem[I..=I+x] = V0..=Vx
fn store(state: &mut State, x: u8, quirks: Quirks) {
    let count = x as usize + 1;
    let registers = state.v;
    state.memory.write_block(state.i, &registers[..count]);
    if quirks.memory_increments_index {
        state.set_index(state.i + count as u16);
    }
}

/// V0..=Vx = mem[I..=I+x]
fn load(state: &mut State, x: u8, quirks: Quirks) {
    let count = x as usize + 1;
    for offset in 0..count {
        state.v[offset] = state.memory.read(state.i.wrapping_add(offset as u16));
    }
    if quirks.memory_increments_index {
        state.set_index(state.i + count as u16);
    }
}
