use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Instant;

use barsynth_decoder::{Decoder, ModuleDecoder};
use barsynth_error::SynthError;
use barsynth_harness::{DriverConfig, FuzzDriver};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const DEFAULT_VERBOSITY: u8 = 1;

/// One command-line action, executed in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// `-r`: pick a new seed from the clock.
    Reseed,
    /// `-s <seed>`
    Seed(u32),
    /// `-n <count>`
    Run(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    verbosity: u8,
    actions: Vec<Action>,
    show_help: bool,
}

/// How the process should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Code(i32),
    /// Oracle violation: the seed has been reported, do not unwind.
    Abort,
}

fn main() {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let exit = run(
        std::env::args_os(),
        &mut stdout,
        &mut stderr,
        init_tracing,
        default_decoder,
    );
    match exit {
        Exit::Code(0) => {}
        Exit::Code(code) => std::process::exit(code),
        Exit::Abort => std::process::abort(),
    }
}

fn default_decoder() -> Box<dyn Decoder> {
    Box::new(ModuleDecoder::new())
}

/// Install the leveled log sink: errors to stderr, everything else to
/// stdout, no timestamps.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let writer = io::stderr.with_max_level(Level::ERROR).or_else(io::stdout);
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .without_time()
        .with_target(false)
        .with_level(false)
        .try_init();
    if let Err(e) = installed {
        let _ = writeln!(io::stderr(), "warning: logging unavailable: {e}");
    }
}

fn run<I, W, E, L, D>(
    args: I,
    out: &mut W,
    err: &mut E,
    init_logging: L,
    make_decoder: D,
) -> Exit
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: FnOnce(u8),
    D: FnOnce() -> Box<dyn Decoder>,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "ERROR: {message}");
            let _ = write_usage(err);
            return Exit::Code(SynthError::usage(message).exit_code());
        }
    };

    if options.show_help {
        if write_usage(out).is_err() {
            return Exit::Code(1);
        }
        return Exit::Code(0);
    }

    init_logging(options.verbosity);

    let started = Instant::now();
    match execute(&options.actions, make_decoder(), err) {
        Ok(iterations) => {
            if options.verbosity == 0 {
                return Exit::Code(0);
            }
            let elapsed = started.elapsed().as_secs_f64();
            if writeln!(out, "Ran {iterations} iterations in {elapsed:.3}s\n\nOK").is_err() {
                return Exit::Code(1);
            }
            Exit::Code(0)
        }
        Err(e) if e.is_fatal() => {
            // Written directly so the seed survives a missing log sink.
            let _ = writeln!(err, "{e}");
            let _ = err.flush();
            Exit::Abort
        }
        Err(e) => {
            let _ = writeln!(err, "ERROR: {e}");
            Exit::Code(e.exit_code())
        }
    }
}

/// Run the actions against a fresh driver; returns the iteration count.
fn execute<E>(
    actions: &[Action],
    decoder: Box<dyn Decoder>,
    err: &mut E,
) -> Result<u64, SynthError>
where
    E: Write,
{
    let mut driver = FuzzDriver::new(decoder, DriverConfig::default())?;
    for action in actions {
        match *action {
            Action::Reseed => {
                let seed = driver.reseed_from_time();
                let _ = writeln!(err, "-r SEED={seed}");
            }
            Action::Seed(seed) => driver.set_seed(seed),
            Action::Run(count) => driver.run(count)?,
        }
    }
    if driver.iterations() == 0 {
        driver.run_iteration()?;
    }
    Ok(driver.iterations())
}

/// Parse every argument before anything runs.
///
/// Flags may be bundled (`-vvn10`); `s` and `n` take the rest of the token
/// or, when that is empty, the next argument, and flag parsing resumes
/// after the number.
fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<String> = args
        .into_iter()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let mut verbosity = DEFAULT_VERBOSITY;
    let mut actions = Vec::new();
    let mut show_help = false;

    let mut index = 0;
    while index < args.len() {
        let Some(flags) = args[index].strip_prefix('-') else {
            return Err(format!("unknown argument: {}", args[index]));
        };
        let mut token = flags.as_bytes().to_vec();
        let mut pos = 0;
        while pos < token.len() {
            let flag = token[pos];
            pos += 1;
            match flag {
                b'q' => verbosity = 0,
                b'v' => verbosity = verbosity.saturating_add(1),
                b'r' => actions.push(Action::Reseed),
                b'h' => show_help = true,
                b's' | b'n' => {
                    if pos == token.len() {
                        index += 1;
                        let next = args.get(index).ok_or_else(|| {
                            let what = if flag == b's' { "<seed>" } else { "<num>" };
                            format!("-{} needs {what} argument", char::from(flag))
                        })?;
                        token = next.as_bytes().to_vec();
                        pos = 0;
                    }
                    let text = String::from_utf8_lossy(&token[pos..]).into_owned();
                    let (action, used) = if flag == b's' {
                        let (seed, used) = parse_seed(&text)?;
                        (Action::Seed(seed), used)
                    } else {
                        let (count, used) = parse_count(&text)?;
                        (Action::Run(count), used)
                    };
                    actions.push(action);
                    pos += used;
                }
                other => return Err(format!("unknown option: -{}", char::from(other))),
            }
        }
        index += 1;
    }

    Ok(CliOptions {
        verbosity,
        actions,
        show_help,
    })
}

/// Seed: signed integer in C notation, wrapped to 32 bits, never zero.
fn parse_seed(text: &str) -> Result<(u32, usize), String> {
    let invalid = || format!("invalid <seed>: \"{text}\"");
    if !text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return Err(invalid());
    }
    let (value, used) = parse_int_prefix(text).ok_or_else(invalid)?;
    if value == 0 || value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
        return Err(invalid());
    }
    let wrapped = u32::try_from(value.rem_euclid(1_i64 << 32)).map_err(|_| invalid())?;
    Ok((wrapped, used))
}

/// Iteration count: positive integer in C notation.
fn parse_count(text: &str) -> Result<(u64, usize), String> {
    let invalid = || format!("invalid <num>: \"{text}\"");
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (value, used) = parse_int_prefix(text).ok_or_else(invalid)?;
    let count = u64::try_from(value).map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }
    Ok((count, used))
}

/// Longest integer prefix: optional `-`, then `0x` hex, `0` octal or
/// decimal digits. Returns the value and the bytes consumed.
fn parse_int_prefix(text: &str) -> Option<(i64, usize)> {
    let bytes = text.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut start = usize::from(negative);

    let radix = if bytes.get(start) == Some(&b'0')
        && matches!(bytes.get(start + 1), Some(b'x' | b'X'))
        && bytes.get(start + 2).is_some_and(u8::is_ascii_hexdigit)
    {
        start += 2;
        16
    } else if bytes.get(start) == Some(&b'0') {
        8
    } else {
        10
    };

    let digits = bytes[start..]
        .iter()
        .take_while(|b| char::from(**b).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }
    let end = start + digits;
    let magnitude = i64::from_str_radix(&text[start..end], radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    Some((value, end))
}

fn write_usage<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "Usage: barsynth [-qvrh] [-s <seed>] [-n <num>]\n\
         \n\
         Feed synthetic barcode scans to the decoder and check every result.\n\
         \n\
         -q         only report failures (no run summary)\n\
         -v         more output (repeatable)\n\
         -r         pick a random seed from the clock\n\
         -s <seed>  set the seed (0x hex and 0 octal accepted)\n\
         -n <num>   run <num> iterations from the current seed\n\
         -h         show this help\n\
         \n\
         Flags run in order: barsynth -n2 -s7 -n1\n",
    )
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use barsynth_decoder::Decoder;
    use barsynth_types::{Color, Decoded, SymbolType};

    use super::{Action, CliOptions, Exit, default_decoder, parse_args, parse_int_prefix, run};

    /// Claims a Code 39 symbol on every element it is fed.
    struct Spurious;

    impl Decoder for Spurious {
        fn name(&self) -> &'static str {
            "spurious"
        }

        fn set_min_len(&mut self, _: Option<SymbolType>, _: usize) {}

        fn color(&self) -> Color {
            Color::Space
        }

        fn decode_width(&mut self, _: u8) -> Option<Decoded> {
            Some(Decoded::new(SymbolType::Code39, "GHOST"))
        }

        fn reset(&mut self) {}
    }

    fn spurious() -> Box<dyn Decoder> {
        Box::new(Spurious)
    }

    fn parse_from(args: &[&str]) -> Result<CliOptions, String> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        parse_args(os_args)
    }

    fn run_with(args: &[&str]) -> (Exit, String, String) {
        run_with_decoder(args, default_decoder)
    }

    fn run_with_decoder(
        args: &[&str],
        make_decoder: fn() -> Box<dyn Decoder>,
    ) -> (Exit, String, String) {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let exit = run(os_args, &mut out, &mut err, |_| {}, make_decoder);
        (
            exit,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse_from(&["barsynth"]).unwrap();
        assert_eq!(options.verbosity, 1);
        assert!(options.actions.is_empty());
        assert!(!options.show_help);
    }

    #[test]
    fn test_parse_bundled_flags() {
        let options = parse_from(&["barsynth", "-vvs7n2"]).unwrap();
        assert_eq!(options.verbosity, 3);
        assert_eq!(options.actions, vec![Action::Seed(7), Action::Run(2)]);
    }

    #[test]
    fn test_parse_separate_values_resume_flags() {
        let options = parse_from(&["barsynth", "-s", "0x10v", "-n", "3", "-q"]).unwrap();
        assert_eq!(options.verbosity, 0);
        assert_eq!(options.actions, vec![Action::Seed(16), Action::Run(3)]);
    }

    #[test]
    fn test_parse_keeps_action_order() {
        let options = parse_from(&["barsynth", "-n2", "-s7", "-r", "-n1"]).unwrap();
        assert_eq!(
            options.actions,
            vec![Action::Run(2), Action::Seed(7), Action::Reseed, Action::Run(1)]
        );
    }

    #[test]
    fn test_parse_seed_formats() {
        let seed = |arg: &str| parse_from(&["barsynth", arg]).unwrap().actions[0];
        assert_eq!(seed("-s010"), Action::Seed(8));
        assert_eq!(seed("-s0xbabeface"), Action::Seed(0xbabe_face));
        assert_eq!(seed("-s-1"), Action::Seed(u32::MAX));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        for args in [
            &["barsynth", "-s0"][..],
            &["barsynth", "-sx"],
            &["barsynth", "-s"],
            &["barsynth", "-s99999999999"],
            &["barsynth", "-n0"],
            &["barsynth", "-n-3"],
            &["barsynth", "-n"],
        ] {
            assert!(parse_from(args).is_err(), "{args:?} should fail");
        }
    }

    #[test]
    fn test_parse_positional_and_unknown_fail() {
        assert!(parse_from(&["barsynth", "file"]).is_err());
        assert!(parse_from(&["barsynth", "-x"]).is_err());
    }

    #[test]
    fn test_int_prefix_stops_at_non_digit() {
        assert_eq!(parse_int_prefix("12v"), Some((12, 2)));
        assert_eq!(parse_int_prefix("019"), Some((1, 2)));
        assert_eq!(parse_int_prefix("0x"), Some((0, 1)));
        assert_eq!(parse_int_prefix("-0x1f"), Some((-31, 5)));
        assert_eq!(parse_int_prefix("q"), None);
    }

    #[test]
    fn test_usage_error_exits_2() {
        let (exit, out, err) = run_with(&["barsynth", "extra"]);
        assert_eq!(exit, Exit::Code(2));
        assert!(out.is_empty());
        assert!(err.contains("unknown argument: extra"));
        assert!(err.contains("Usage: barsynth"));
    }

    #[test]
    fn test_help_exits_0() {
        let (exit, out, _) = run_with(&["barsynth", "-h"]);
        assert_eq!(exit, Exit::Code(0));
        assert!(out.starts_with("Usage: barsynth"));
    }

    #[test]
    fn test_default_run_reports_one_iteration() {
        let (exit, out, _) = run_with(&["barsynth"]);
        assert_eq!(exit, Exit::Code(0));
        assert!(out.starts_with("Ran 1 iterations in "));
        assert!(out.ends_with("\n\nOK\n"));
    }

    #[test]
    fn test_quiet_run_prints_nothing() {
        let (exit, out, err) = run_with(&["barsynth", "-q", "-n2"]);
        assert_eq!(exit, Exit::Code(0));
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_oracle_violation_aborts_with_seed() {
        let (exit, out, err) = run_with_decoder(&["barsynth", "-q", "-s77"], spurious);
        assert_eq!(exit, Exit::Abort);
        assert!(out.is_empty());
        assert!(err.contains("decode CODE-39:GHOST"));
        assert!(err.contains("SEED="));
    }

    #[test]
    fn test_actions_accumulate_iterations() {
        let (exit, out, err) = run_with(&["barsynth", "-n2", "-r", "-n1"]);
        assert_eq!(exit, Exit::Code(0));
        assert!(out.starts_with("Ran 3 iterations in "));
        assert!(err.starts_with("-r SEED="));
    }
}
