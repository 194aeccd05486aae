//! Comfort advisory appended to temperature readings.

/// Inclusive comfort band; readings outside it get a heating or cooling note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortAdvisory {
    pub min: f64,
    pub max: f64,
}

impl ComfortAdvisory {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Sentence to append after the phrased reading, leading space included.
    pub fn advise(&self, reading: f64) -> &'static str {
        if reading < self.min {
            " The temperature is getting cold right now. I will turn on the heat for you."
        } else if reading > self.max {
            " The temperature is getting hot. I will turn on the air conditioning for you."
        } else {
            " This temperature should be nice and comfortable."
        }
    }
}
