use super::AnyResult;
use std::path::PathBuf;
use tilt_bar::{AngleSpan, Linkage};

#[derive(clap::Args)]
pub(crate) struct Solve {
    /// Linkage file paths (RON)
    files: Vec<PathBuf>,
    /// Link lengths in millimeters
    #[clap(long, num_args = 4, value_names = ["DRIVER", "COUPLER", "FOLLOWER", "FRAME"])]
    lengths: Option<Vec<f64>>,
    /// Plate tilt limit in degrees
    #[clap(long, default_value_t = 25.)]
    tilt: f64,
    /// Number of angle samples
    #[clap(long, default_value_t = 11)]
    res: usize,
}

pub(super) fn solve(cmd: Solve) -> AnyResult {
    let Solve { files, lengths, tilt, res } = cmd;
    if files.is_empty() && lengths.is_none() {
        return Err("no linkage given, pass --lengths or RON file paths".into());
    }
    let span = AngleSpan::from_plate_tilt(tilt.to_radians(), res);
    if let Some(&[driver, coupler, follower, frame]) = lengths.as_deref() {
        report(&Linkage::new(driver, coupler, follower, frame), &span);
    }
    for file in files {
        let fb = ron::from_str(&std::fs::read_to_string(&file)?)?;
        println!("[{}]", file.display());
        report(&fb, &span);
    }
    Ok(())
}

fn report(fb: &Linkage, span: &AngleSpan) {
    println!("type: {}", fb.ty().name());
    let mut worst = f64::INFINITY;
    for (theta, adv) in fb.advantage_in(span) {
        let t = theta.to_degrees();
        let plate = 90. - t;
        match (fb.angles(theta), adv) {
            (Some(angles), Some(adv)) => {
                let [alpha, beta, gamma] =
                    [angles.alpha, angles.beta, angles.gamma].map(f64::to_degrees);
                println!(
                    "plate {plate:+7.2} deg | theta {t:7.2} deg | \
                     alpha {alpha:7.2} | beta {beta:7.2} | gamma {gamma:7.2} | ratio {adv:.4}"
                );
                worst = worst.min(adv);
            }
            _ => println!("plate {plate:+7.2} deg | theta {t:7.2} deg | infeasible"),
        }
    }
    if worst.is_finite() {
        println!("worst-case ratio: {worst:.4}");
    } else {
        println!("the linkage cannot traverse the whole range");
    }
}
