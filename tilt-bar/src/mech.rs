//! Linkage mechanism types and the closed-form angle solver.
use std::f64::consts::FRAC_PI_2;

/// Grashof class of a four-bar loop.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum LinkageTy {
    /// Grashof double crank (shortest link is the frame)
    DoubleCrank,
    /// Grashof crank rocker (shortest link is the driver)
    CrankRocker,
    /// Grashof double rocker (shortest link is the coupler)
    DoubleRocker,
    /// Grashof rocker crank (shortest link is the follower)
    RockerCrank,
    /// Non-Grashof triple rocker
    TripleRocker,
    /// The longest link exceeds the other three
    Invalid,
}

impl LinkageTy {
    /// Detect from a four-bar loop `[driver, coupler, follower, frame]`.
    pub fn from_loop(fb_loop: [f64; 4]) -> Self {
        let [driver, coupler, follower, frame] = fb_loop;
        let mut sorted = fb_loop;
        sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        let [s, p, q, l] = sorted;
        if l > s + p + q {
            Self::Invalid
        } else if s + l >= p + q {
            Self::TripleRocker
        } else if s == frame {
            Self::DoubleCrank
        } else if s == driver {
            Self::CrankRocker
        } else if s == coupler {
            Self::DoubleRocker
        } else {
            debug_assert!(s == follower);
            Self::RockerCrank
        }
    }

    /// Name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DoubleCrank => "Grashof double crank",
            Self::CrankRocker => "Grashof crank rocker",
            Self::DoubleRocker => "Grashof double rocker",
            Self::RockerCrank => "Grashof rocker crank",
            Self::TripleRocker => "Non-Grashof triple rocker",
            Self::Invalid => "Invalid",
        }
    }

    /// Check if the type is valid.
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Return true if the type is a Grashof linkage.
    pub const fn is_grashof(&self) -> bool {
        matches!(
            self,
            Self::DoubleCrank | Self::CrankRocker | Self::DoubleRocker | Self::RockerCrank
        )
    }
}

/// Interior angles of the closed loop at one driving angle.
///
/// All values are in radians.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Angles {
    /// Frame-driver included angle
    pub alpha: f64,
    /// Driver-coupler included angle
    pub beta: f64,
    /// Coupler-follower included angle
    pub gamma: f64,
}

/// A planar four-bar loop that tilts the plate.
///
/// # Parameters
///
/// + Driver link `l1`
/// + Coupler link `l2`
/// + Follower link `l3`
/// + Frame link `l4` (stationary)
///
/// The driving angle `theta` is the follower-frame included angle; the
/// plate is level at `theta = pi/2`.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Linkage {
    /// Length of the driver link
    pub driver: f64,
    /// Length of the coupler link
    pub coupler: f64,
    /// Length of the follower link
    pub follower: f64,
    /// Length of the frame link
    pub frame: f64,
}

impl Linkage {
    /// Create a new instance from the four link lengths.
    pub const fn new(driver: f64, coupler: f64, follower: f64, frame: f64) -> Self {
        Self { driver, coupler, follower, frame }
    }

    /// The plate linkage of the original landing-gear study.
    pub const fn example() -> Self {
        Self::new(35., 35., 35., 32.5)
    }

    /// Get the planar loop `[driver, coupler, follower, frame]`.
    pub const fn planar_loop(&self) -> [f64; 4] {
        [self.driver, self.coupler, self.follower, self.frame]
    }

    /// Return the type of this linkage.
    pub fn ty(&self) -> LinkageTy {
        LinkageTy::from_loop(self.planar_loop())
    }

    /// Check if the lengths can close a loop at all.
    pub fn is_valid(&self) -> bool {
        let fb_loop = self.planar_loop();
        fb_loop.iter().all(|l| *l > 0.) && LinkageTy::from_loop(fb_loop).is_valid()
    }

    /// Solve the remaining interior angles at the driving angle `theta`.
    ///
    /// Returns `None` when the loop does not close at `theta`. A pure
    /// function, identical inputs give bit-identical results.
    pub fn angles(&self, theta: f64) -> Option<Angles> {
        let Self { driver: l1, coupler: l2, follower: l3, frame: l4 } = *self;
        // Cosine law on the follower-frame triangle
        let d1_2 = l3 * l3 + l4 * l4 - 2. * l3 * l4 * theta.cos();
        if d1_2 < 0. {
            return None;
        }
        let d1 = d1_2.sqrt();
        // acos/asin return NaN outside their domain, the open-loop case
        let beta = ((d1_2 - l1 * l1 - l2 * l2) / (-2. * l1 * l2)).acos();
        let alpha = (l3 / d1 * theta.sin()).asin() + (l2 / d1 * beta.sin()).asin();
        let gamma = (l4 / d1 * theta.sin()).asin() + (l1 / d1 * beta.sin()).asin();
        [alpha, beta, gamma]
            .iter()
            .all(|a| a.is_finite())
            .then_some(Angles { alpha, beta, gamma })
    }

    /// Mechanical-advantage ratio at the driving angle `theta`.
    ///
    /// The ratio of the output to the input moment-arm terms,
    /// `(l3 * sin(gamma)) / (l1 * sin(beta))`. Returns `None` when the
    /// loop does not close or the ratio is undefined.
    pub fn advantage(&self, theta: f64) -> Option<f64> {
        let Angles { beta, gamma, .. } = self.angles(theta)?;
        let adv = self.follower * gamma.sin() / (self.driver * beta.sin());
        adv.is_finite().then_some(adv)
    }

    /// Worst-case advantage over a sweep of driving angles.
    ///
    /// The binding case is the minimum ratio; the running reduction
    /// starts from positive infinity (the identity of a minimum, also
    /// the result of an empty sweep). The first sample where the loop
    /// does not close scores the whole sweep NaN and skips the rest,
    /// since the plate must traverse the entire range.
    pub fn min_advantage<I>(&self, thetas: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut adv = f64::INFINITY;
        for theta in thetas {
            match self.advantage(theta) {
                Some(a) => adv = adv.min(a),
                None => return f64::NAN,
            }
        }
        adv
    }

    /// Advantage profile across a span, one `(theta, ratio)` per sample.
    pub fn advantage_in(&self, span: &AngleSpan) -> Vec<(f64, Option<f64>)> {
        span.iter().map(|t| (t, self.advantage(t))).collect()
    }
}

/// Driving-angle samples of the follower-frame joint.
///
/// Angles are in radians; `res` counts the samples and both endpoints
/// are included.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngleSpan {
    /// Start angle
    pub start: f64,
    /// End angle
    pub end: f64,
    /// Number of samples
    pub res: usize,
}

impl AngleSpan {
    /// Create a new instance from the bounds and the resolution.
    pub const fn new(start: f64, end: f64, res: usize) -> Self {
        Self { start, end, res }
    }

    /// Span of a plate tilting `tilt` radians both ways about the level
    /// pose, mapped to the driving angle as `theta = pi/2 - plate`.
    pub fn from_plate_tilt(tilt: f64, res: usize) -> Self {
        Self::new(FRAC_PI_2 - tilt, FRAC_PI_2 + tilt, res)
    }

    /// Iterate over the samples.
    pub fn iter(&self) -> impl Iterator<Item = f64> {
        linspace(self.start, self.end, self.res)
    }

    /// Collect the samples.
    pub fn values(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

pub(crate) fn linspace(start: f64, end: f64, res: usize) -> impl Iterator<Item = f64> {
    let step = if res > 1 { (end - start) / (res - 1) as f64 } else { 0. };
    (0..res).map(move |n| start + n as f64 * step)
}
