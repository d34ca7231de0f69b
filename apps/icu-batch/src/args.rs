//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "\
usage: icu-batch --time <days> [--config <path>] [--history <csv>] [--surge <csv>] [--out <dir>]

  --time <days>     simulated days per parameter set (required)
  --config <path>   JSON array of parameter sets   [batch_run_config.json]
  --history <csv>   historical ICU admissions      [opnames.csv]
  --surge <csv>     national ICU admissions (;)    [data/COVID-19_ic_opnames.csv]
  --out <dir>       output root                    [runs]";

#[derive(Clone, Debug, PartialEq)]
pub struct Args {
    pub days:    u64,
    pub config:  PathBuf,
    pub history: PathBuf,
    pub surge:   PathBuf,
    pub out:     PathBuf,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut days = None;
        let mut config = PathBuf::from("batch_run_config.json");
        let mut history = PathBuf::from("opnames.csv");
        let mut surge = PathBuf::from("data/COVID-19_ic_opnames.csv");
        let mut out = PathBuf::from("runs");

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().with_context(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--time" => {
                    let raw = value()?;
                    days = Some(raw.parse::<u64>().with_context(|| format!("--time: `{raw}` is not a day count"))?);
                }
                "--config"  => config = value()?.into(),
                "--history" => history = value()?.into(),
                "--surge"   => surge = value()?.into(),
                "--out"     => out = value()?.into(),
                other => bail!("unknown argument `{other}`\n\n{USAGE}"),
            }
        }

        let Some(days) = days else {
            bail!("--time is required\n\n{USAGE}");
        };
        Ok(Self { days, config, history, surge, out })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let args = parse(&["--time", "3"]).unwrap();
        assert_eq!(args.days, 3);
        assert_eq!(args.config, PathBuf::from("batch_run_config.json"));
        assert_eq!(args.history, PathBuf::from("opnames.csv"));
        assert_eq!(args.out, PathBuf::from("runs"));
    }

    #[test]
    fn overrides_in_any_order() {
        let args = parse(&["--out", "/tmp/x", "--time", "30", "--config", "a.json", "--surge", "s.csv"]).unwrap();
        assert_eq!(args.days, 30);
        assert_eq!(args.out, PathBuf::from("/tmp/x"));
        assert_eq!(args.config, PathBuf::from("a.json"));
        assert_eq!(args.surge, PathBuf::from("s.csv"));
    }

    #[test]
    fn time_is_required() {
        let err = parse(&["--out", "x"]).unwrap_err();
        assert!(err.to_string().contains("--time is required"), "{err}");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse(&["--time", "three"]).is_err());
        assert!(parse(&["--time"]).is_err());
        assert!(parse(&["--time", "1", "--verbose"]).is_err());
    }
}
