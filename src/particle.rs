use crate::kernel::Contribution;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
}

/// Structure-of-arrays storage for the bodies of one run. Index `i` names the
/// same body in every array.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub masses: Vec<f32>,
    pub count: usize,
}

impl ParticleSet {
    pub fn new(count: usize) -> Self {
        ParticleSet {
            xs: vec![0.0; count],
            ys: vec![0.0; count],
            masses: vec![0.0; count],
            count,
        }
    }

    pub fn from_bodies(bodies: &[Body]) -> Self {
        let mut set = ParticleSet::new(bodies.len());
        for (i, b) in bodies.iter().enumerate() {
            set.xs[i] = b.x;
            set.ys[i] = b.y;
            set.masses[i] = b.mass;
        }
        set
    }

    pub fn to_bodies(&self) -> Vec<Body> {
        (0..self.count).map(|i| self.body(i)).collect()
    }

    pub fn body(&self, i: usize) -> Body {
        Body {
            x: self.xs[i],
            y: self.ys[i],
            mass: self.masses[i],
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Positions uniform in [0,1), masses uniform in [0,1)/N so the total mass
    /// stays O(1) whatever the size. The same seed always gives the same set.
    pub fn random(count: usize, seed: u64) -> Self {
        let rng = fastrand::Rng::with_seed(seed);
        let mut set = ParticleSet::new(count);
        let scale = 1.0 / count as f32;
        for i in 0..count {
            set.xs[i] = rng.f32();
            set.ys[i] = rng.f32();
            set.masses[i] = rng.f32() * scale;
        }
        set
    }
}

/// Four equal masses on the corners of the unit square.
pub fn unit_square(mass: f32) -> ParticleSet {
    ParticleSet::from_bodies(&[
        Body { x: 0.0, y: 0.0, mass },
        Body { x: 1.0, y: 0.0, mass },
        Body { x: 0.0, y: 1.0, mass },
        Body { x: 1.0, y: 1.0, mass },
    ])
}

/// Per-body outputs of one evaluation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Forces {
    pub potential: Vec<f32>,
    pub accel_x: Vec<f32>,
    pub accel_y: Vec<f32>,
}

impl Forces {
    pub fn new(count: usize) -> Self {
        Forces {
            potential: vec![0.0; count],
            accel_x: vec![0.0; count],
            accel_y: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.potential.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potential.is_empty()
    }

    pub fn reset(&mut self) {
        self.potential.fill(0.0);
        self.accel_x.fill(0.0);
        self.accel_y.fill(0.0);
    }

    pub fn set(&mut self, i: usize, c: Contribution) {
        self.potential[i] = c.potential;
        self.accel_x[i] = c.accel_x;
        self.accel_y[i] = c.accel_y;
    }
}
