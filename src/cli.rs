//! Option parsing shared by the `transpose` and `contour` tools.
//!
//! Flags follow getopt conventions: they precede the positional arguments and
//! take their value either attached (`-d5`) or as the next argument (`-d -5`).
use std::path::PathBuf;

use crate::config::ContourParams;

/// Exit status for a malformed command line.
pub const USAGE_EXIT_CODE: u8 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub params: ContourParams,
    /// Value of `-d`, when given.
    pub semitones: Option<i32>,
    pub paths: Vec<PathBuf>,
}

/// Parse `args` (without the program name). `params` holds the defaults;
/// `male` is the range selected by `-M`. `-d` is accepted only with
/// `allow_shift`. Returns `None` for a usage error.
pub fn parse<I>(
    args: I,
    params: ContourParams,
    male: ContourParams,
    allow_shift: bool,
) -> Option<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options {
        params,
        semitones: None,
        paths: Vec::new(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if !options.paths.is_empty() || arg == "-" || !arg.starts_with('-') {
            options.paths.push(PathBuf::from(arg));
            continue;
        }
        if arg == "--" {
            options.paths.extend(args.by_ref().map(PathBuf::from));
            break;
        }

        let rest = &arg[1..];
        let (flag, attached) = rest.split_at(rest.chars().next().map_or(0, char::len_utf8));
        let mut value = || -> Option<String> {
            if attached.is_empty() {
                args.next()
            } else {
                Some(attached.to_string())
            }
        };
        match flag {
            "M" if attached.is_empty() => {
                options.params = options.params.with_range(male.pitch_min, male.pitch_max)
            }
            "F" if attached.is_empty() => {
                let female = ContourParams::female();
                options.params = options.params.with_range(female.pitch_min, female.pitch_max)
            }
            "n" => options.params.pitch_min = value()?.parse().ok()?,
            "m" => options.params.pitch_max = value()?.parse().ok()?,
            "t" => options.params.threshold = value()?.parse().ok()?,
            "d" if allow_shift => options.semitones = Some(value()?.parse().ok()?),
            _ => return None,
        }
    }
    Some(options)
}
