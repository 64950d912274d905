// args.rs - Command line parsing
//
// img2stl <image> [-o|--output PATH] [--scale F] [--height F] [--smooth F] [--no-mirror]

use std::path::PathBuf;

use relief_engine::ReliefConfig;

pub const DEFAULT_OUTPUT: &str = "output.stl";

#[derive(Debug, PartialEq)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: ReliefConfig,
    pub mirror: bool,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <image> [-o|--output PATH] [--scale F] [--height F] [--smooth F] [--no-mirror]"
    )
}

/// Parse everything after the program name
pub fn parse(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    let mut config = ReliefConfig::default();
    let mut mirror = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => { output = PathBuf::from(value(args, i)?); i += 2; }
            "--scale" => { config.spatial_scale = number(args, i)?; i += 2; }
            "--height" => { config.height_scale = number(args, i)?; i += 2; }
            "--smooth" => { config.smoothing_sigma = number(args, i)?; i += 2; }
            "--no-mirror" => { mirror = false; i += 1; }
            flag if flag.starts_with('-') => return Err(format!("unknown flag {flag}")),
            path => {
                if input.is_some() {
                    return Err(format!("unexpected argument {path}"));
                }
                input = Some(PathBuf::from(path));
                i += 1;
            }
        }
    }

    let input = input.ok_or_else(|| "missing input image".to_string())?;
    Ok(Args { input, output, config, mirror })
}

fn value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", args[i]))
}

fn number(args: &[String], i: usize) -> Result<f32, String> {
    let raw = value(args, i)?;
    raw.parse()
        .map_err(|_| format!("{} expects a number, got {raw:?}", args[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn defaults() {
        let args = parse(&argv("photo.png")).unwrap();
        assert_eq!(args.input, PathBuf::from("photo.png"));
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(args.config, ReliefConfig::default());
        assert!(args.mirror);
    }

    #[test]
    fn all_flags() {
        let args = parse(&argv(
            "--scale 0.1 photo.jpg -o relief.stl --height 5 --smooth 0 --no-mirror",
        ))
        .unwrap();
        assert_eq!(args.input, PathBuf::from("photo.jpg"));
        assert_eq!(args.output, PathBuf::from("relief.stl"));
        assert_eq!(args.config.spatial_scale, 0.1);
        assert_eq!(args.config.height_scale, 5.0);
        assert_eq!(args.config.smoothing_sigma, 0.0);
        assert!(!args.mirror);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&argv("")).unwrap_err().contains("missing input"));
        assert!(parse(&argv("a.png --scale")).unwrap_err().contains("needs a value"));
        assert!(parse(&argv("a.png --height tall")).unwrap_err().contains("expects a number"));
        assert!(parse(&argv("a.png --wat")).unwrap_err().contains("unknown flag"));
        assert!(parse(&argv("a.png b.png")).unwrap_err().contains("unexpected"));
    }

    #[test]
    fn negative_values_parse_and_fail_later() {
        // "-1" is a value here, not a flag
        let args = parse(&argv("a.png --scale -1")).unwrap();
        assert!(args.config.validate().is_err());
    }
}
