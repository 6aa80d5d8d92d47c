//! falar main entry point
//!
//! The main loop watches two sources:
//! 1. stdin (user input) - one command or text per line
//! 2. the engine's voice-change signal - rebuilds the voice list
//!
//! Each event is handled to completion before the next one.

use falar::cli::{Options, USAGE};
use falar::input::{drain_input, LineBuffer, ReadMode, ReadStatus};
use falar::platform::{is_wsl, NonBlocking};
use falar::speech::{create_engine, VoiceSignal};
use falar::state::config::Config;
use falar::state::State;
use falar::ui::{render_json, render_options, TerminalNotifier};
use falar::voices::VoiceRegistry;
use falar::{FalarError, Result};
use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token, Waker};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::mem::ManuallyDrop;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::process;
use std::sync::Arc;

/// Token for stdin in mio poll
const STDIN: Token = Token(0);
/// Token for the voice-change waker
const VOICES: Token = Token(1);

/// How long select() waits before re-checking the voice signal
const SELECT_TIMEOUT_MS: i64 = 100;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("falar: {}", e);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if options.help {
        println!("{}", USAGE);
        return;
    }
    if options.version {
        println!("{} {}", falar::APP_NAME, falar::VERSION);
        return;
    }

    init_logging(options.debug);

    if let Err(e) = run(options) {
        error!("Fatal error: {}", e);
        eprintln!("falar: {}", e);
        process::exit(1);
    }
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("falar.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open falar.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "falar version {} starting (debug mode, logging to falar.log)",
            falar::VERSION
        );
    } else {
        // Errors only, unless RUST_LOG says otherwise
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error"))
            .init();
    }
}

fn run(options: Options) -> Result<()> {
    debug!("Initializing falar");

    let config = Config::load()?;
    info!("Configuration loaded from {:?}", config.path());

    let kind = match options.backend {
        Some(kind) => kind,
        None => config.backend()?,
    };
    let mut engine = create_engine(kind)?;
    info!("Speech engine created: {}", engine.name());

    if options.list_voices {
        let mut registry = VoiceRegistry::new();
        registry.refresh(engine.as_mut())?;
        let listing = if options.json {
            render_json(registry.snapshot())?
        } else {
            render_options(registry.selector())
        };
        println!("{}", listing);
        return Ok(());
    }

    let mut poll = Poll::new()?;
    let waker = Arc::new(Waker::new(poll.registry(), VOICES)?);

    let mut state = State::new(
        config,
        engine,
        Box::new(TerminalNotifier::stderr()),
        VoiceSignal::with_waker(waker),
        Box::new(io::stdout()),
    )?;

    let interactive = io::stdin().is_terminal();
    let stdin_fd = io::stdin().as_raw_fd();

    // WSL doesn't support epoll on TTY file descriptors, and regular files
    // can't be registered at all, so those fall back to select()
    let use_select = is_wsl() || {
        let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
        match poll
            .registry()
            .register(&mut stdin_source, STDIN, Interest::READABLE)
        {
            Ok(()) => false,
            Err(e) => {
                debug!("stdin cannot be polled ({}), using select()", e);
                true
            }
        }
    };
    let mut events = Events::with_capacity(16);

    if interactive {
        println!(
            "{} {} ({} backend). Type /help for commands.",
            falar::APP_NAME,
            falar::VERSION,
            state.engine_name()
        );
    }
    info!("falar ready - entering event loop");

    // Edge-triggered epoll needs stdin drained to EAGAIN on every event
    let (_non_blocking, read_mode) = if use_select {
        (None, ReadMode::Once)
    } else {
        (Some(NonBlocking::enable(stdin_fd)?), ReadMode::UntilWouldBlock)
    };

    // Unbuffered view of fd 0, so no input hides in std's stdin buffer
    // while the poll waits for the next edge
    let mut stdin = ManuallyDrop::new(unsafe { File::from_raw_fd(stdin_fd) });

    let prompt = state.config.prompt();
    let mut lines = LineBuffer::new();
    let mut prompt_due = true;

    loop {
        if state.process_pending() {
            prompt_due = true;
        }

        if interactive && prompt_due {
            let mut stdout = io::stdout();
            write!(stdout, "{}", prompt)?;
            stdout.flush()?;
            prompt_due = false;
        }

        let stdin_ready = if use_select {
            wait_select(stdin_fd)?
        } else {
            poll.poll(&mut events, None)?;
            events.iter().any(|event| event.token() == STDIN)
        };

        if stdin_ready {
            prompt_due = true;
            if drain_input(&mut *stdin, &mut lines, &mut state, read_mode)? == ReadStatus::Quit {
                info!("Leaving event loop");
                return Ok(());
            }
        }
    }
}

/// Wait for stdin with select(), waking up regularly for the voice signal
fn wait_select(stdin_fd: RawFd) -> Result<bool> {
    use nix::sys::select::{select, FdSet};
    use nix::sys::time::{TimeVal, TimeValLike};
    use std::os::unix::io::BorrowedFd;

    let stdin_borrowed = unsafe { BorrowedFd::borrow_raw(stdin_fd) };

    let mut read_fds = FdSet::new();
    read_fds.insert(stdin_borrowed);
    let mut timeout = TimeVal::milliseconds(SELECT_TIMEOUT_MS);

    match select(None, Some(&mut read_fds), None, None, Some(&mut timeout)) {
        Ok(_) => Ok(read_fds.contains(stdin_borrowed)),
        Err(nix::errno::Errno::EINTR) => {
            debug!("select() interrupted by signal");
            Ok(false)
        }
        Err(e) => {
            error!("select() error: {:?}", e);
            Err(FalarError::Io(io::Error::from_raw_os_error(e as i32)))
        }
    }
}
