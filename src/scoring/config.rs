/// Thresholds for the completion scorer.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Angle treated as a fully extended joint; completion is measured against it.
    pub reference_angle_deg: f64,

    /// Hand raises: average arm angle below this asks the user to lift higher.
    pub arms_low_deg: f64,
    /// Hand raises: average arm angle above this means the top is reached.
    pub arms_high_deg: f64,

    /// Hip hinge: hip angle above this means the torso is still too upright.
    pub hip_upright_deg: f64,
    /// Hip hinge: hip angle below this means the torso folded too far.
    pub hip_folded_deg: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_angle_deg: 180.0,
            arms_low_deg: 70.0,
            arms_high_deg: 160.0,
            hip_upright_deg: 150.0,
            hip_folded_deg: 70.0,
        }
    }
}
