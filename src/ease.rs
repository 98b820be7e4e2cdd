#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    /// Fast start, slow finish: `1 - (1-t)^2`.
    Decelerate,
    /// Stronger deceleration: `1 - (1-t)^3`.
    DecelerateCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Self::DecelerateCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}
