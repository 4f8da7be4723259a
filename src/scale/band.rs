/// Categorical scale splitting a pixel range into equal bands.
///
/// Padding is a fraction of the step applied between bands and at both ends;
/// bands are centred within the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(categories: Vec<String>, range: [f64; 2], padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = categories.len() as f64;
        let [r0, r1] = range;
        let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };

        let step = (hi - lo) / (n - padding + padding * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;

        Self {
            categories,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of a category's band
    pub fn position(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| self.start + self.step * i as f64)
    }

    /// Centre of a category's band
    pub fn center(&self, category: &str) -> Option<f64> {
        self.position(category).map(|p| p + self.bandwidth * 0.5)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
