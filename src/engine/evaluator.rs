use anyhow::Result;
use nalgebra::DVector;

/// A scalar function over the search space.
///
/// Returning `Err` aborts the run. Returning a non-finite value does not:
/// the firefly is simply ranked below every finite one.
pub trait Objective {
    fn evaluate(&self, x: &DVector<f64>) -> Result<f64>;

    /// Human readable name, used in logs.
    fn name(&self) -> &str {
        "objective"
    }
}

impl<F> Objective for F
where
    F: Fn(&DVector<f64>) -> f64,
{
    #[inline]
    fn evaluate(&self, x: &DVector<f64>) -> Result<f64> {
        Ok(self(x))
    }
}

/// Wraps a closure that may fail, e.g. one backed by an external process.
pub struct Fallible<F> {
    func: F,
    name: String,
}

impl<F> Fallible<F>
where
    F: Fn(&DVector<f64>) -> Result<f64>,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<F> Objective for Fallible<F>
where
    F: Fn(&DVector<f64>) -> Result<f64>,
{
    fn evaluate(&self, x: &DVector<f64>) -> Result<f64> {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The outcome of evaluating one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    /// Value in minimization convention. `INFINITY` if `raw` was not finite.
    pub intensity: f64,
    /// Value exactly as the objective returned it.
    pub raw: f64,
}

impl EvaluationResult {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.raw.is_finite()
    }
}

/// Turns objective values into intensities and back.
///
/// Internally everything is minimization: when maximizing the objective
/// value is negated on the way in and negated again on the way out.
pub struct ObjectiveAdapter<O> {
    objective: O,
    maximize: bool,
}

impl<O: Objective> ObjectiveAdapter<O> {
    pub fn new(objective: O, maximize: bool) -> Self {
        Self {
            objective,
            maximize,
        }
    }

    pub fn evaluate(&self, x: &DVector<f64>) -> Result<EvaluationResult> {
        let raw = self.objective.evaluate(x)?;
        let intensity = if !raw.is_finite() {
            f64::INFINITY
        } else if self.maximize {
            -raw
        } else {
            raw
        };
        Ok(EvaluationResult { intensity, raw })
    }

    /// Maps an internal intensity back to the caller's sign convention.
    #[inline]
    pub fn external(&self, intensity: f64) -> f64 {
        if self.maximize {
            -intensity
        } else {
            intensity
        }
    }

    #[inline]
    pub fn maximize(&self) -> bool {
        self.maximize
    }

    pub fn name(&self) -> &str {
        self.objective.name()
    }
}
