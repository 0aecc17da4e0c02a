//! Cross-checks a candidate pass against the sequential baseline.

use std::fmt;

use thiserror::Error;

use crate::particle::Forces;

pub const DEFAULT_TOLERANCE: f32 = 1e-3;

/// `|a - b| <= tolerance`. NaN on either side is never equal.
pub fn nearly_equal(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Potential,
    AccelX,
    AccelY,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Potential, Quantity::AccelX, Quantity::AccelY];

    fn values<'a>(&self, forces: &'a Forces) -> &'a [f32] {
        match self {
            Quantity::Potential => &forces.potential,
            Quantity::AccelX => &forces.accel_x,
            Quantity::AccelY => &forces.accel_y,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Potential => "potential",
            Quantity::AccelX => "x acceleration",
            Quantity::AccelY => "y acceleration",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        *self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum OracleError {
    #[error("candidate holds {candidate} bodies but the baseline holds {baseline}")]
    LengthMismatch { baseline: usize, candidate: usize },
}

/// First value found outside the tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mismatch {
    pub quantity: Quantity,
    pub index: usize,
    pub baseline: f32,
    pub candidate: f32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of body {} is {} but the baseline has {}",
            self.quantity, self.index, self.candidate, self.baseline
        )
    }
}

/// Snapshot of the sequential result. Taken once and only read afterwards.
#[derive(Clone, Debug)]
pub struct Baseline {
    forces: Forces,
}

impl Baseline {
    pub fn capture(forces: &Forces) -> Self {
        Baseline { forces: forces.clone() }
    }

    pub fn forces(&self) -> &Forces {
        &self.forces
    }

}

pub struct Oracle {
    baseline: Baseline,
    tolerance: f32,
}

impl Oracle {
    pub fn new(baseline: Baseline, tolerance: f32) -> Self {
        Oracle { baseline, tolerance }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Scans potential, then x, then y acceleration and stops at the first
    /// value more than the tolerance away from the baseline.
    pub fn first_mismatch(&self, candidate: &Forces) -> Result<Option<Mismatch>, OracleError> {
        let expected_len = self.baseline.forces.len();
        if candidate.len() != expected_len {
            return Err(OracleError::LengthMismatch {
                baseline: expected_len,
                candidate: candidate.len(),
            });
        }

        for quantity in Quantity::ALL {
            let expected = quantity.values(&self.baseline.forces);
            let actual = quantity.values(candidate);
            let found = expected
                .iter()
                .zip(actual)
                .position(|(&b, &c)| !nearly_equal(b, c, self.tolerance));
            if let Some(index) = found {
                return Ok(Some(Mismatch {
                    quantity,
                    index,
                    baseline: expected[index],
                    candidate: actual[index],
                }));
            }
        }
        Ok(None)
    }

    pub fn check(&self, candidate: &Forces) -> Result<Verdict, OracleError> {
        Ok(match self.first_mismatch(candidate)? {
            None => Verdict::Pass,
            Some(_) => Verdict::Fail,
        })
    }
}
