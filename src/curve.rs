use crate::params::Parameters;

pub const CURVE_STEP: f64 = 0.5;

/// Samples `J(x) = Pe·(x − Δπ)` across `[0, max_x]`. The sampler is a plain value, so
/// every call to [`CurveSampler::iter`] restarts the sequence from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSampler {
    pe: f64,
    delta_pi: f64,
    max_x: f64,
    step: f64,
}

impl CurveSampler {
    pub fn new(params: &Parameters, max_x: f64) -> Self {
        Self {
            pe: params.pe,
            delta_pi: params.delta_pi,
            max_x,
            step: CURVE_STEP,
        }
    }

    pub fn sample_count(&self) -> usize {
        (self.max_x / self.step).floor() as usize + 1
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.pe * (x - self.delta_pi)
    }

    pub fn iter(&self) -> CurveIter {
        CurveIter {
            sampler: *self,
            index: 0,
            count: self.sample_count(),
        }
    }
}

pub struct CurveIter {
    sampler: CurveSampler,
    index: usize,
    count: usize,
}

impl Iterator for CurveIter {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let x = self.index as f64 * self.sampler.step;
        self.index += 1;
        Some((x, self.sampler.eval(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveIter {}
