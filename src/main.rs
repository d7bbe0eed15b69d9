use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cable_forge::{obj, profiler, CableRegistry, Scene};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cable_forge")]
#[command(about = "Build cable meshes from a scene file and export them as OBJ")]
struct Args {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Directory receiving one OBJ per cable
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Drive a source cable before export, e.g. `--set lamp=on`
    #[arg(long = "set", value_name = "NAME=BOOL", value_parser = parse_toggle)]
    toggles: Vec<(String, bool)>,

    /// Write per-pass timings under `debug/`
    #[arg(long)]
    profile: bool,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

fn parse_toggle(toggle: &str) -> Result<(String, bool), String> {
    let (name, value) = toggle
        .split_once('=')
        .ok_or_else(|| format!("malformed toggle `{toggle}`, expected NAME=BOOL"))?;
    let value = parse_bool(value).ok_or_else(|| format!("`{value}` is not a boolean"))?;
    Ok((name.to_string(), value))
}

fn export(registry: &CableRegistry, out: &Path) -> anyhow::Result<()> {
    create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    for (_, cable) in registry.iter() {
        let path = out.join(format!("{}.obj", cable.name()));
        obj::save_obj(&path, cable.mesh(), cable.name())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "wrote {} ({} vertices, {} triangles)",
            path.display(),
            cable.mesh().vertex_count(),
            cable.mesh().total_triangle_count()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.profile {
        match profiler::init_session(Path::new("debug")) {
            Ok(Some(path)) => log::info!("profiling to {}", path.display()),
            Ok(None) => {}
            Err(err) => log::warn!("failed to initialise profiler: {err:?}"),
        }
    }

    let pass = profiler::begin_pass();
    let scene = profiler::scope(&pass, "load", || Scene::load(&args.scene))
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    let mut registry = profiler::scope(&pass, "build", || scene.build())
        .context("building cables from scene")?;

    for (name, value) in &args.toggles {
        let rebuilt = registry
            .set_active_by_name(name, *value)
            .with_context(|| format!("setting `{name}` to {value}"))?;
        log::info!("`{name}` = {value}, {} cables rebuilt", rebuilt.len());
    }

    profiler::scope(&pass, "export", || export(&registry, &args.out))?;
    Ok(())
}
