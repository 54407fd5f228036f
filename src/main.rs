use std::{fs, time::Instant};

use chip8_vm::{
    clock::FrameClock,
    debug,
    memory::PROGRAM_START_ADDRESS,
    peripherals::SharedKeypad,
    Emulator, Error, Rom,
};
use log::{error, info, trace, warn};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = cli::parse_args();

    if config.disassemble {
        match Rom::from_file(&config.chip8_program_path) {
            Ok(rom) => {
                for line in debug::disassemble(rom.bytes(), PROGRAM_START_ADDRESS as u16) {
                    println!("{line}");
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut emulator = Emulator::new(config.emulator);
    if let Err(e) = emulator.load_rom_file(&config.chip8_program_path) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    let snapshot_path = format!("{}.chip8state", config.chip8_program_path);

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title(format!("CHIP-8 - {}", config.chip8_program_path))
        .with_inner_size(LogicalSize::new(
            io::SCREEN_WIDTH * config.scale,
            io::SCREEN_HEIGHT * config.scale,
        ))
        .with_min_inner_size(LogicalSize::new(io::SCREEN_WIDTH, io::SCREEN_HEIGHT))
        .build(&event_loop)
    {
        Ok(window) => window,
        Err(e) => {
            eprintln!("Could not open a window: {e}");
            std::process::exit(1);
        }
    };
    let mut screen = match io::PixelScreen::new(&window) {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("Could not set up rendering: {e}");
            std::process::exit(1);
        }
    };
    let beeper = io::Beeper::new();
    let keypad = SharedKeypad::new();
    let mut clock = FrameClock::default();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Resized(size) => {
                screen.resize(size.width, size.height);
                window.request_redraw();
            }
            WindowEvent::Focused(false) => keypad.release_all(),
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(key),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if let Some(hex_key) = io::hex_key(key) {
                    keypad.set_key(hex_key, pressed);
                    return;
                }
                if !pressed {
                    return;
                }
                match key {
                    VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                    VirtualKeyCode::P => {
                        if emulator.toggle_pause() {
                            info!("Paused");
                            info!("{}", debug::dump_registers(emulator.state()));
                            trace!("\n{}", debug::dump_display(&emulator.state().display));
                            trace!("\n{}", debug::dump_memory(&emulator.state().ram));
                        } else {
                            info!("Resumed");
                        }
                    }
                    VirtualKeyCode::Back => match emulator.reset() {
                        Ok(()) => info!("Reset"),
                        Err(e) => error!("Reset failed: {e}"),
                    },
                    VirtualKeyCode::F5 => match fs::write(&snapshot_path, emulator.save_state()) {
                        Ok(()) => info!("Saved state to {snapshot_path}"),
                        Err(e) => error!("Could not save state to {snapshot_path}: {e}"),
                    },
                    VirtualKeyCode::F9 => {
                        let restored = fs::read(&snapshot_path)
                            .map_err(|e| Error::SnapshotUnreadable(format!("{snapshot_path}: {e}")))
                            .and_then(|bytes| emulator.restore_state(&bytes));
                        match restored {
                            Ok(()) => info!("Loaded state from {snapshot_path}"),
                            Err(e) => warn!("{e}"),
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        },
        Event::MainEventsCleared => {
            for _ in 0..clock.frames_due() {
                emulator.run_frame(&keypad, &beeper, &mut screen);
            }
            *control_flow = ControlFlow::WaitUntil(Instant::now() + clock.until_next_frame());
        }
        Event::RedrawRequested(_) => screen.render(),
        _ => {}
    });
}

mod io {
    use chip8_vm::{
        display::{DISPLAY_HEIGHT_PIXELS, DISPLAY_WIDTH_PIXELS},
        peripherals::{Screen, Tone},
    };
    use log::{error, warn};
    use pixels::{Pixels, SurfaceTexture};
    use rodio::{source::SineWave, OutputStream, Sink, Source};
    use winit::{event::VirtualKeyCode, window::Window};

    pub const SCREEN_WIDTH: u32 = DISPLAY_WIDTH_PIXELS as u32;
    pub const SCREEN_HEIGHT: u32 = DISPLAY_HEIGHT_PIXELS as u32;

    const TONE_FREQUENCY_HZ: f32 = 440.0;
    const TONE_VOLUME: f32 = 0.2;

    const PIXEL_ON: [u8; 4] = [0xE8, 0xE8, 0xE8, 0xFF];
    const PIXEL_OFF: [u8; 4] = [0x10, 0x10, 0x10, 0xFF];

    /// The usual mapping of the COSMAC VIP hex pad onto the left of a QWERTY
    /// keyboard:
    ///
    /// ```text
    /// 1 2 3 C      1 2 3 4
    /// 4 5 6 D  ->  Q W E R
    /// 7 8 9 E      A S D F
    /// A 0 B F      Z X C V
    /// ```
    pub fn hex_key(key: VirtualKeyCode) -> Option<u8> {
        use VirtualKeyCode::*;
        let hex_key = match key {
            Key1 => 0x1,
            Key2 => 0x2,
            Key3 => 0x3,
            Key4 => 0xC,
            Q => 0x4,
            W => 0x5,
            E => 0x6,
            R => 0xD,
            A => 0x7,
            S => 0x8,
            D => 0x9,
            F => 0xE,
            Z => 0xA,
            X => 0x0,
            C => 0xB,
            V => 0xF,
            _ => return None,
        };
        Some(hex_key)
    }

    /// Draws CHIP-8 frames into a window through `pixels`.
    pub struct PixelScreen {
        pixels: Pixels,
    }

    impl PixelScreen {
        pub fn new(window: &Window) -> Result<Self, pixels::Error> {
            let size = window.inner_size();
            let texture = SurfaceTexture::new(size.width, size.height, window);
            let pixels = Pixels::new(SCREEN_WIDTH, SCREEN_HEIGHT, texture)?;
            Ok(Self { pixels })
        }

        pub fn resize(&mut self, width: u32, height: u32) {
            if let Err(e) = self.pixels.resize_surface(width, height) {
                error!("Could not resize surface: {e}");
            }
        }

        pub fn render(&mut self) {
            if let Err(e) = self.pixels.render() {
                error!("Render failed: {e}");
            }
        }
    }

    impl Screen for PixelScreen {
        fn draw_buffer(&mut self, buffer: &[u8]) {
            let frame = self.pixels.frame_mut();
            for (index, rgba) in frame.chunks_exact_mut(4).enumerate() {
                let lit = buffer[index / 8] & (0x80 >> (index % 8)) != 0;
                rgba.copy_from_slice(if lit { &PIXEL_ON } else { &PIXEL_OFF });
            }
            self.render();
        }
    }

    /// A sine tone that is paused and resumed rather than rebuilt. Runs
    /// silently when there is no audio device.
    pub struct Beeper {
        sink: Option<Sink>,
        _stream: Option<OutputStream>,
    }

    impl Beeper {
        pub fn new() -> Self {
            match OutputStream::try_default() {
                Ok((stream, handle)) => match Sink::try_new(&handle) {
                    Ok(sink) => {
                        sink.pause();
                        sink.append(SineWave::new(TONE_FREQUENCY_HZ).amplify(TONE_VOLUME));
                        Self {
                            sink: Some(sink),
                            _stream: Some(stream),
                        }
                    }
                    Err(e) => {
                        warn!("No sound: {e}");
                        Self::silent()
                    }
                },
                Err(e) => {
                    warn!("No sound: {e}");
                    Self::silent()
                }
            }
        }

        fn silent() -> Self {
            Self {
                sink: None,
                _stream: None,
            }
        }
    }

    impl Tone for Beeper {
        fn start_tone(&self) {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }

        fn stop_tone(&self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn is_tone_on(&self) -> bool {
            self.sink.as_ref().map_or(false, |sink| !sink.is_paused())
        }
    }
}

mod cli {
    use chip8_vm::{emulator::DEFAULT_CYCLES_PER_FRAME, EmulatorConfig, Profile, Quirks};
    use clap::Parser;

    #[derive(Debug)]
    pub struct Config {
        pub chip8_program_path: String,
        pub emulator: EmulatorConfig,
        pub scale: u32,
        pub disassemble: bool,
    }

    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Path to the rom to emulate
        #[arg(name = "chip8_program_path", value_name = "CHIP-8_PROGRAM_PATH")]
        chip8_program_path: String,

        /// Instructions executed per 60Hz frame
        #[arg(long, default_value_t = DEFAULT_CYCLES_PER_FRAME)]
        cycles_per_frame: u32,

        /// Starting set of compatibility quirks
        #[arg(long, value_enum, default_value_t = Profile::Default)]
        profile: Profile,

        /// 8XY6/8XYE shift VX in place instead of VY
        #[arg(long)]
        shift_uses_vx: bool,

        /// FX55/FX65 leave I advanced by X instead of X + 1
        #[arg(long)]
        memory_increment_by_x: bool,

        /// FX55/FX65 leave I unchanged
        #[arg(long)]
        memory_leave_i_unchanged: bool,

        /// BNNN jumps to NNN + VX instead of NNN + V0
        #[arg(long)]
        jump_adds_vx: bool,

        /// Sprites wrap around the screen edges instead of being clipped
        #[arg(long)]
        wrap_sprites: bool,

        /// 8XY1/8XY2/8XY3 reset VF to 0
        #[arg(long)]
        vf_reset: bool,

        /// Stop when the word 0000 is executed
        #[arg(long)]
        halt_on_zero: bool,

        /// Window pixels per CHIP-8 pixel
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Print the rom's disassembly and exit
        #[arg(long)]
        disassemble: bool,
    }

    impl Args {
        fn quirks(&self) -> Quirks {
            let mut quirks = Quirks::from(self.profile);
            quirks.shift_uses_vx |= self.shift_uses_vx;
            quirks.memory_increment_by_x |= self.memory_increment_by_x;
            quirks.memory_leave_i_unchanged |= self.memory_leave_i_unchanged;
            quirks.jump_adds_vx |= self.jump_adds_vx;
            quirks.wrap_sprites |= self.wrap_sprites;
            quirks.vf_reset |= self.vf_reset;
            quirks.halt_on_zero |= self.halt_on_zero;
            quirks
        }
    }

    pub fn parse_args() -> Config {
        let args = Args::parse();
        Config {
            emulator: EmulatorConfig {
                quirks: args.quirks(),
                cycles_per_frame: args.cycles_per_frame,
            },
            chip8_program_path: args.chip8_program_path,
            scale: args.scale,
            disassemble: args.disassemble,
        }
    }
}
