//! Exhaustive sweep of the linkage design space.
//!
//! Three of the four links get a candidate range; the frame is fixed.
//! Every grid point is scored by its worst-case advantage ratio over the
//! required tilt range and the scores land in an [`AdvantageField`],
//! which then reduces to the single best [`OptimalDesign`].
use crate::mech::{linspace, AngleSpan, Linkage};
use ndarray::{Array3, ArrayView3, Zip};
#[cfg(feature = "npy")]
pub use ndarray_npy::{ReadNpzError, WriteNpzError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Candidate lengths for one link role.
///
/// `res` values linearly spaced from `lower` to `upper`, both included.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkRange {
    /// Lower bound of the candidate lengths
    pub lower: f64,
    /// Upper bound of the candidate lengths
    pub upper: f64,
    /// Number of candidates
    pub res: usize,
}

impl LinkRange {
    /// Create a new instance from the bounds and the resolution.
    pub const fn new(lower: f64, upper: f64, res: usize) -> Self {
        Self { lower, upper, res }
    }

    /// A single fixed length.
    pub const fn fixed(len: f64) -> Self {
        Self::new(len, len, 1)
    }

    /// Collect the candidate lengths.
    pub fn values(&self) -> Vec<f64> {
        linspace(self.lower, self.upper, self.res).collect()
    }

    fn validate(&self, role: &'static str) -> Result<(), CfgError> {
        if self.res == 0 {
            Err(CfgError::Empty(role))
        } else if !(self.lower.is_finite() && self.upper.is_finite())
            || self.lower <= 0.
            || self.upper <= 0.
        {
            Err(CfgError::Length(role))
        } else if self.lower > self.upper {
            Err(CfgError::Reversed(role))
        } else {
            Ok(())
        }
    }
}

/// Error of a malformed sweep configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CfgError {
    /// A length bound is not a positive finite number
    Length(&'static str),
    /// A range upper bound is below its lower bound
    Reversed(&'static str),
    /// A range or angle span has zero samples
    Empty(&'static str),
    /// A driving-angle bound is not finite
    Angle,
}

impl std::fmt::Display for CfgError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Length(role) => write!(f, "{role}: length bounds must be positive finite numbers"),
            Self::Reversed(role) => write!(f, "{role}: upper bound is below the lower bound"),
            Self::Empty(role) => write!(f, "{role}: at least one sample is required"),
            Self::Angle => write!(f, "theta: span bounds must be finite numbers"),
        }
    }
}

impl std::error::Error for CfgError {}

/// Sweep configuration.
///
/// The default mirrors the original plate study: driver and coupler
/// 30-50, follower 15-50 (20 candidates each), frame 35, plate tilt
/// 25 degrees both ways sampled at 3 angles.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SweepCfg {
    /// Driver link candidates
    pub driver: LinkRange,
    /// Coupler link candidates
    pub coupler: LinkRange,
    /// Follower link candidates
    pub follower: LinkRange,
    /// Fixed frame length
    pub frame: f64,
    /// Driving-angle samples covering the tilt range
    pub theta: AngleSpan,
}

impl Default for SweepCfg {
    fn default() -> Self {
        Self {
            driver: LinkRange::new(30., 50., 20),
            coupler: LinkRange::new(30., 50., 20),
            follower: LinkRange::new(15., 50., 20),
            frame: 35.,
            theta: AngleSpan::from_plate_tilt(25_f64.to_radians(), 3),
        }
    }
}

impl SweepCfg {
    /// Candidate driver lengths.
    pub fn driver(self, driver: LinkRange) -> Self {
        Self { driver, ..self }
    }

    /// Candidate coupler lengths.
    pub fn coupler(self, coupler: LinkRange) -> Self {
        Self { coupler, ..self }
    }

    /// Candidate follower lengths.
    pub fn follower(self, follower: LinkRange) -> Self {
        Self { follower, ..self }
    }

    /// Fixed frame length.
    pub fn frame(self, frame: f64) -> Self {
        Self { frame, ..self }
    }

    /// Driving-angle samples.
    pub fn theta(self, theta: AngleSpan) -> Self {
        Self { theta, ..self }
    }

    /// Reject malformed inputs before any computation.
    pub fn validate(&self) -> Result<(), CfgError> {
        self.driver.validate("driver")?;
        self.coupler.validate("coupler")?;
        self.follower.validate("follower")?;
        LinkRange::fixed(self.frame).validate("frame")?;
        if self.theta.res == 0 {
            Err(CfgError::Empty("theta"))
        } else if !(self.theta.start.is_finite() && self.theta.end.is_finite()) {
            Err(CfgError::Angle)
        } else {
            Ok(())
        }
    }
}

/// The best candidate of a sweep.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct OptimalDesign {
    /// Grid index `[i, j, k]` of the winner
    pub index: [usize; 3],
    /// Link lengths of the winner
    pub linkage: Linkage,
    /// Worst-case advantage over the sweep
    pub advantage: f64,
}

/// Worst-case advantage of every candidate in the grid.
///
/// Entry `[i, j, k]` belongs to `(driver[i], coupler[j], follower[k])`;
/// NaN marks a candidate that cannot traverse the whole sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvantageField {
    driver: Vec<f64>,
    coupler: Vec<f64>,
    follower: Vec<f64>,
    frame: f64,
    adv: Array3<f64>,
}

impl AdvantageField {
    /// Evaluate the whole grid.
    pub fn make(cfg: &SweepCfg) -> Result<Self, CfgError> {
        Self::make_with(cfg, |_| ())
    }

    /// Evaluate the whole grid with a callback counting the finished
    /// candidates.
    ///
    /// The field is allocated once at full grid size; candidates are
    /// independent of each other and each writes only its own slot, so
    /// the evaluation runs in parallel under the `rayon` feature.
    pub fn make_with<CB>(cfg: &SweepCfg, callback: CB) -> Result<Self, CfgError>
    where
        CB: Fn(usize) + Sync + Send,
    {
        cfg.validate()?;
        let driver = cfg.driver.values();
        let coupler = cfg.coupler.values();
        let follower = cfg.follower.values();
        let thetas = cfg.theta.values();
        let frame = cfg.frame;
        let mut adv = Array3::from_elem([driver.len(), coupler.len(), follower.len()], f64::NAN);
        let count = AtomicUsize::new(0);
        let eval = |(i, j, k): (usize, usize, usize), a: &mut f64| {
            let fb = Linkage::new(driver[i], coupler[j], follower[k], frame);
            *a = fb.min_advantage(thetas.iter().copied());
            callback(count.fetch_add(1, Ordering::Relaxed) + 1);
        };
        #[cfg(feature = "rayon")]
        Zip::indexed(&mut adv).par_for_each(eval);
        #[cfg(not(feature = "rayon"))]
        Zip::indexed(&mut adv).for_each(eval);
        Ok(Self { driver, coupler, follower, frame, adv })
    }

    /// Candidate driver lengths (axis 0).
    pub fn driver_values(&self) -> &[f64] {
        &self.driver
    }

    /// Candidate coupler lengths (axis 1).
    pub fn coupler_values(&self) -> &[f64] {
        &self.coupler
    }

    /// Candidate follower lengths (axis 2).
    pub fn follower_values(&self) -> &[f64] {
        &self.follower
    }

    /// Fixed frame length.
    pub const fn frame(&self) -> f64 {
        self.frame
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.adv.len()
    }

    /// Check if the grid has no candidate.
    pub fn is_empty(&self) -> bool {
        self.adv.is_empty()
    }

    /// Worst-case advantage per candidate.
    pub fn advantage(&self) -> ArrayView3<f64> {
        self.adv.view()
    }

    /// Rebuild the candidate at a grid index.
    pub fn linkage_at(&self, [i, j, k]: [usize; 3]) -> Linkage {
        Linkage::new(self.driver[i], self.coupler[j], self.follower[k], self.frame)
    }

    /// Flatten to `(driver, coupler, follower, advantage)` rows.
    pub fn entries(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.adv
            .indexed_iter()
            .map(|((i, j, k), &adv)| (self.driver[i], self.coupler[j], self.follower[k], adv))
    }

    /// Best candidate of the grid, if any closes the whole sweep.
    ///
    /// NaN entries never win; ties keep the first index in row-major
    /// order. A fully infeasible grid reduces to `None`.
    pub fn optimum(&self) -> Option<OptimalDesign> {
        let mut best = None;
        for ((i, j, k), &a) in self.adv.indexed_iter() {
            if a.is_finite() && best.map_or(true, |(_, b)| a > b) {
                best = Some(([i, j, k], a));
            }
        }
        best.map(|(index, advantage)| OptimalDesign {
            index,
            linkage: self.linkage_at(index),
            advantage,
        })
    }
}

#[cfg(feature = "npy")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "npy")))]
impl AdvantageField {
    /// Write the field and its axes in NPZ format.
    pub fn write<W>(&self, w: W) -> Result<(), WriteNpzError>
    where
        W: std::io::Write + std::io::Seek,
    {
        let mut npz = ndarray_npy::NpzWriter::new(w);
        npz.add_array("driver", &ndarray::arr1(&self.driver))?;
        npz.add_array("coupler", &ndarray::arr1(&self.coupler))?;
        npz.add_array("follower", &ndarray::arr1(&self.follower))?;
        npz.add_array("frame", &ndarray::arr0(self.frame))?;
        npz.add_array("adv", &self.adv)?;
        npz.finish().map(|_| ())
    }

    /// Read a field from NPZ format.
    pub fn read<R>(r: R) -> Result<Self, ReadNpzError>
    where
        R: std::io::Read + std::io::Seek,
    {
        let mut npz = ndarray_npy::NpzReader::new(r)?;
        let driver: ndarray::Array1<f64> = npz.by_name("driver")?;
        let coupler: ndarray::Array1<f64> = npz.by_name("coupler")?;
        let follower: ndarray::Array1<f64> = npz.by_name("follower")?;
        let frame: ndarray::Array0<f64> = npz.by_name("frame")?;
        let adv: Array3<f64> = npz.by_name("adv")?;
        let expect = [driver.len(), coupler.len(), follower.len()];
        for (actual, expect) in adv.shape().iter().zip(expect) {
            if *actual != expect {
                return Err(ReadNpzError::Npy(ndarray_npy::ReadNpyError::WrongNdim(
                    Some(expect),
                    *actual,
                )));
            }
        }
        Ok(Self {
            driver: driver.to_vec(),
            coupler: coupler.to_vec(),
            follower: follower.to_vec(),
            frame: frame.into_scalar(),
            adv,
        })
    }
}
