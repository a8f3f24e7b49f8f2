//! air_canvas: interactive entry point.
//!
//! ```text
//! air_canvas [--quick] [--config <file.toml>] [--replay <file.jsonl>]
//! ```

use air_canvas::app::run;
use air_canvas::config::{AppConfig, SourceKind};
use anyhow::{Context, Result};
use sketch_session::{Color, DrawingMode, Modes, ShapeMode, PALETTE};
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Air Canvas — Hand Gesture Drawing Surface           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  LeapMotion hardware available  (source kind \"leap\")");
    #[cfg(not(feature = "leap"))]
    println!("  Mouse simulation  (use --features leap for hardware)");
    println!();

    let cfg = match configure(std::env::args().skip(1).collect()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("  Opening canvas window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Command line
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, PartialEq)]
struct Args {
    quick:  bool,
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--quick"  => out.quick = true,
            "--config" => out.config = Some(it.next().context("--config needs a file")?.into()),
            "--replay" => out.replay = Some(it.next().context("--replay needs a file")?.into()),
            other      => anyhow::bail!("unknown argument {:?}", other),
        }
    }
    Ok(out)
}

fn configure(argv: Vec<String>) -> Result<AppConfig> {
    let args = parse_args(argv)?;

    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None if args.quick => {
            println!("  Quick-start: pen, free draw, black, size 5, mouse simulation\n");
            AppConfig::default()
        }
        None => configure_interactively(),
    };

    if let Some(path) = args.replay {
        cfg.source.kind = SourceKind::Replay;
        cfg.source.path = Some(path);
        cfg.source.autostart = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

// ════════════════════════════════════════════════════════════════════════════
// Interactive prompts
// ════════════════════════════════════════════════════════════════════════════

fn configure_interactively() -> AppConfig {
    let modes = Modes {
        drawing_mode: pick_drawing_mode(),
        shape_mode:   pick_shape_mode(),
        color:        pick_color(),
        stroke_width: read_line("  Pen size 1–50 (default 5): ")
            .trim().parse::<u32>().unwrap_or(5).clamp(1, 50),
    };

    let mut cfg = AppConfig { modes, ..AppConfig::default() };

    println!("  Source: 1=Mouse simulation  2=Replay file  3=LeapMotion");
    match read_line("  Choice (default 1): ").trim() {
        "2" => {
            let path = read_line("  Recording path: ");
            cfg.source.kind = SourceKind::Replay;
            cfg.source.path = Some(PathBuf::from(path.trim()));
            cfg.source.autostart = true;
        }
        "3" => cfg.source.kind = SourceKind::Leap,
        _   => {}
    }
    cfg
}

fn pick_drawing_mode() -> DrawingMode {
    println!("  Drawing mode: 1=Pen  2=Spray  3=Eraser  4=Rainbow");
    match read_line("  Choice (default 1): ").trim() {
        "2" => DrawingMode::Spray,
        "3" => DrawingMode::Eraser,
        "4" => DrawingMode::Rainbow,
        _   => DrawingMode::Pen,
    }
}

fn pick_shape_mode() -> ShapeMode {
    println!("  Shape: 1=Free  2=Line  3=Circle  4=Rectangle");
    match read_line("  Choice (default 1): ").trim() {
        "2" => ShapeMode::Line,
        "3" => ShapeMode::Circle,
        "4" => ShapeMode::Rectangle,
        _   => ShapeMode::Free,
    }
}

fn pick_color() -> Color {
    let names: Vec<String> = PALETTE.iter().map(|c| c.to_string()).collect();
    println!("  Palette: {}", names.join("  "));
    loop {
        let answer = read_line("  Colour #rrggbb (default #000000): ");
        let answer = answer.trim();
        if answer.is_empty() {
            break Color::BLACK;
        }
        match answer.parse::<Color>() {
            Ok(c)  => break c,
            Err(e) => println!("    ⚠  {}", e),
        }
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let a = parse_args(argv(&["--quick", "--replay", "wave.jsonl"])).unwrap();
        assert!(a.quick);
        assert_eq!(a.replay, Some(PathBuf::from("wave.jsonl")));
        assert_eq!(a.config, None);
    }

    #[test]
    fn rejects_unknown_and_dangling_flags() {
        assert!(parse_args(argv(&["--fast"])).is_err());
        assert!(parse_args(argv(&["--config"])).is_err());
    }

    #[test]
    fn replay_flag_overrides_source() {
        let cfg = configure(argv(&["--quick", "--replay", "wave.jsonl"])).unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Replay);
        assert!(cfg.source.autostart);
        assert_eq!(cfg.modes, Modes::default());
    }
}
