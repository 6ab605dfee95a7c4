//! Fixed prompt templates.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Static agronomic context embedded in every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct AgronomicProfile {
    /// Crop being modelled
    #[builder(default = "\"maize\".to_string()")]
    crop: String,
    /// Region description
    #[builder(default = "\"semi-arid smallholder farms\".to_string()")]
    region: String,
    /// Typical annual rainfall range in mm
    #[builder(default = "(300.0, 1500.0)")]
    typical_rainfall_mm: (f64, f64),
    /// Optimal annual rainfall band in mm
    #[builder(default = "(600.0, 1000.0)")]
    optimal_rainfall_mm: (f64, f64),
    /// Typical yield range in t/ha
    #[builder(default = "(1.0, 6.0)")]
    typical_yield_t_ha: (f64, f64),
}

impl AgronomicProfile {
    /// Creates a builder for `AgronomicProfile`.
    pub fn builder() -> AgronomicProfileBuilder {
        AgronomicProfileBuilder::default()
    }
}

impl Default for AgronomicProfile {
    fn default() -> Self {
        Self {
            crop: "maize".to_string(),
            region: "semi-arid smallholder farms".to_string(),
            typical_rainfall_mm: (300.0, 1500.0),
            optimal_rainfall_mm: (600.0, 1000.0),
            typical_yield_t_ha: (1.0, 6.0),
        }
    }
}

/// System and user prompt pair for one rainfall figure.
///
/// # Examples
///
/// ```
/// use rainyield_core::{AgronomicProfile, PredictionPrompt};
///
/// let prompt = PredictionPrompt::new(850.0, &AgronomicProfile::default());
/// assert!(prompt.user().contains("850 mm"));
/// assert!(prompt.system().contains("600-1000 mm"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PredictionPrompt {
    /// Role, context and reply format
    system: String,
    /// The question for this rainfall
    user: String,
    /// Rainfall the prompt was built for
    rainfall: f64,
}

impl PredictionPrompt {
    /// Builds the prompt pair for `rainfall` millimetres.
    pub fn new(rainfall: f64, profile: &AgronomicProfile) -> Self {
        let (rain_lo, rain_hi) = profile.typical_rainfall_mm;
        let (opt_lo, opt_hi) = profile.optimal_rainfall_mm;
        let (yield_lo, yield_hi) = profile.typical_yield_t_ha;
        let crop = &profile.crop;

        let system = format!(
            "You are an agronomy assistant that predicts {crop} yields for {region}. \
             Typical annual rainfall in this region is {rain_lo}-{rain_hi} mm. \
             The optimal rainfall band for {crop} is {opt_lo}-{opt_hi} mm. \
             Typical yields are {yield_lo}-{yield_hi} metric tons per hectare. \
             Reply with the predicted yield in metric tons per hectare as a single number \
             on the first line, followed by one short sentence of explanation on the next line.",
            region = profile.region,
        );
        let user = format!(
            "Annual rainfall: {rainfall} mm. Predict the {crop} yield in metric tons per hectare."
        );

        Self {
            system,
            user,
            rainfall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = AgronomicProfile::builder().build().unwrap();
        assert_eq!(built, AgronomicProfile::default());
    }

    #[test]
    fn test_prompt_embeds_profile_constants() {
        let profile = AgronomicProfile::builder()
            .crop("sorghum")
            .typical_yield_t_ha((0.5, 3.0))
            .build()
            .unwrap();
        let prompt = PredictionPrompt::new(420.5, &profile);

        assert!(prompt.system().contains("sorghum"));
        assert!(prompt.system().contains("0.5-3 metric tons"));
        assert!(prompt.system().contains("300-1500 mm"));
        assert!(prompt.user().contains("420.5 mm"));
        assert_eq!(*prompt.rainfall(), 420.5);
    }
}
