//! Command line options

use crate::speech::EngineKind;
use crate::{FalarError, Result};

pub const USAGE: &str = "\
Usage: falar [OPTIONS]

Type text, pick a voice, hear it spoken.

Options:
  -b, --backend NAME   speech backend: auto, native, espeak, sapi
  -l, --list-voices    print the available voices and exit
      --json           with --list-voices, print them as JSON
  -d, --debug          write a debug log to falar.log
  -h, --help           show this help
  -V, --version        show the version";

/// Parsed command line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    pub debug: bool,
    pub backend: Option<EngineKind>,
    pub list_voices: bool,
    pub json: bool,
    pub help: bool,
    pub version: bool,
}

impl Options {
    /// Parse arguments (without the program name)
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            match arg {
                "-d" | "--debug" => options.debug = true,
                "-l" | "--list-voices" => options.list_voices = true,
                "--json" => options.json = true,
                "-h" | "--help" => options.help = true,
                "-V" | "--version" => options.version = true,
                "-b" | "--backend" => {
                    let value = args.next().ok_or_else(|| {
                        FalarError::Usage(format!("{} needs a backend name", arg))
                    })?;
                    options.backend = Some(parse_backend(value.as_ref())?);
                }
                _ => {
                    if let Some(value) = arg.strip_prefix("--backend=") {
                        options.backend = Some(parse_backend(value)?);
                    } else {
                        return Err(FalarError::Usage(format!("Unknown argument: {}", arg)));
                    }
                }
            }
        }

        if options.json && !options.list_voices {
            return Err(FalarError::Usage(
                "--json only applies to --list-voices".to_string(),
            ));
        }

        Ok(options)
    }
}

fn parse_backend(value: &str) -> Result<EngineKind> {
    value
        .parse()
        .map_err(|e: FalarError| FalarError::Usage(e.to_string()))
}
