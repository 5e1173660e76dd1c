use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use beachside::{
    AppConfig, BeachScene, CYCLE_SECONDS, DrawList, FrameTime, Material, Painter, ViewAngles,
};

/// A procedurally animated beach scene.
#[derive(Debug, Parser)]
#[command(name = "beachside", version, about)]
struct Cli {
    /// Window width in logical pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Window title.
    #[arg(long, default_value = "Beachside")]
    title: String,

    /// Directory holding one `<material>/DIF.jpg` per material.
    #[arg(long, value_name = "DIR")]
    textures: Option<PathBuf>,

    /// Start with the animation stopped.
    #[arg(long)]
    paused: bool,

    /// Animation time to start from, in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    start_time: f32,

    /// Compose the frame at this time without opening a window and print its draw counts.
    #[arg(long, value_name = "SECONDS")]
    summary_at: Option<f32>,

    /// Increase logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::new()
            .title(&self.title)
            .size(self.width, self.height)
            .paused(self.paused)
            .start_time(self.start_time);
        if let Some(dir) = &self.textures {
            config = config.textures(dir);
        }
        config
    }
}

fn summary(elapsed: f32) -> beachside::Result<()> {
    let scene = BeachScene::new()?;
    let mut painter = Painter::new(DrawList::new());
    let time = FrameTime {
        elapsed,
        cycle: elapsed.rem_euclid(CYCLE_SECONDS),
    };
    let camera = scene.compose(&mut painter, time, ViewAngles::ZERO);
    let draws = painter.renderer();

    println!("t = {:.2}s (cycle {:.2}s)", time.elapsed, time.cycle);
    println!("camera eye {} -> target {}", camera.eye, camera.target);
    for material in Material::ALL {
        let count = draws.count_material(material);
        if count > 0 {
            println!("  {:<12} {count:>5}", material.folder());
        }
    }
    println!("  {:<12} {:>5}", "total", draws.len());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let result = match cli.summary_at {
        Some(t) => summary(t),
        None => beachside::run(cli.app_config()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
