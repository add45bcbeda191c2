use super::AnyResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, time::Instant};
use tilt_bar::{AdvantageField, SweepCfg};

#[derive(clap::Args)]
pub(crate) struct Sweep {
    /// Sweep configuration file (RON), default settings when omitted
    cfg: Option<PathBuf>,
    /// Write the field as CSV rows (driver, coupler, follower, ratio)
    #[clap(long)]
    csv: Option<PathBuf>,
    /// Write the field and its axes in NPZ format
    #[clap(long)]
    npz: Option<PathBuf>,
    /// Write the best linkage as RON
    #[clap(long)]
    out: Option<PathBuf>,
}

pub(super) fn sweep(cmd: Sweep) -> AnyResult {
    let Sweep { cfg, csv, npz, out } = cmd;
    let cfg = match cfg {
        Some(path) => ron::from_str(&std::fs::read_to_string(path)?)?,
        None => SweepCfg::default(),
    };
    cfg.validate()?;
    let total = cfg.driver.res * cfg.coupler.res * cfg.follower.res;
    println!(
        "frame={} mm, candidates={total}, angle samples={}",
        cfg.frame, cfg.theta.res
    );
    const STYLE: &str = "{elapsed_precise} {wide_bar} {pos}/{len} {msg}";
    let pb = ProgressBar::new(total as u64);
    pb.set_style(ProgressStyle::with_template(STYLE)?);
    let t0 = Instant::now();
    let field = AdvantageField::make_with(&cfg, |n| pb.set_position(n as u64))?;
    pb.finish_with_message(format!("| spent: {:?}", t0.elapsed()));
    if let Some(path) = csv {
        std::fs::write(path, tilt_bar::csv::dump_csv(field.entries())?)?;
    }
    if let Some(path) = npz {
        field.write(std::fs::File::create(path)?)?;
    }
    let Some(best) = field.optimum() else {
        println!("no feasible design in the searched range");
        return Ok(());
    };
    let fb = &best.linkage;
    println!("driver   = {:.2} mm", fb.driver);
    println!("coupler  = {:.2} mm", fb.coupler);
    println!("follower = {:.2} mm", fb.follower);
    println!("frame    = {:.2} mm", fb.frame);
    println!("type     = {}", fb.ty().name());
    println!("worst-case ratio = {:.4}", best.advantage);
    if best.advantage <= 1. {
        println!("no advantageous design in the searched range (ratio <= 1)");
    }
    if let Some(path) = out {
        std::fs::write(path, ron::to_string(fb)?)?;
    }
    Ok(())
}
