/// One parsed measurement: a metric value taken at a thread or process count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub degree: u32,
    pub value: f64,
}

impl Sample {
    pub fn new(degree: u32, value: f64) -> Self {
        Self { degree, value }
    }
}
