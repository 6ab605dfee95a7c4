//! Chartable rainfall/yield points.

use crate::{HistoricalRow, PredictResponse, Provider};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use rainyield_error::{PredictionError, PredictionErrorKind};
use serde::{Deserialize, Serialize};

/// One rainfall to yield data point, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PredictionPoint {
    /// Annual rainfall in mm
    rainfall: f64,
    /// Yield in t/ha
    #[serde(rename = "yield")]
    yield_tons: f64,
    /// Source of the point
    provider: Provider,
    /// When the point was created
    timestamp: DateTime<Utc>,
    /// Provider's explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl PredictionPoint {
    /// Creates a point.
    pub fn new(
        rainfall: f64,
        yield_tons: f64,
        provider: Provider,
        timestamp: DateTime<Utc>,
        comment: Option<String>,
    ) -> Self {
        Self {
            rainfall,
            yield_tons,
            provider,
            timestamp,
            comment,
        }
    }

    /// Tags an uploaded row as historical data stamped at `timestamp`.
    pub fn historical(row: HistoricalRow, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            row.rainfall,
            row.yield_tons,
            Provider::Historical,
            timestamp,
            None,
        )
    }

    /// Whether the point can be drawn.
    pub fn is_plottable(&self) -> bool {
        self.rainfall.is_finite() && self.yield_tons.is_finite()
    }
}

impl TryFrom<PredictResponse> for PredictionPoint {
    type Error = PredictionError;

    fn try_from(response: PredictResponse) -> Result<Self, Self::Error> {
        let yield_tons: f64 = response.prediction().trim().parse().map_err(|_| {
            PredictionError::new(PredictionErrorKind::Unparseable(
                response.prediction().clone(),
            ))
        })?;
        Ok(Self::new(
            *response.rainfall(),
            yield_tons,
            *response.provider(),
            *response.timestamp(),
            response.comment().clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_predict_response() {
        let now = Utc::now();
        let response = PredictResponse::builder()
            .prediction("3.40")
            .comment(Some("Good season".to_string()))
            .provider(Provider::OpenAi)
            .rainfall(900.0)
            .timestamp(now)
            .build()
            .unwrap();

        let point = PredictionPoint::try_from(response).unwrap();
        assert_eq!(*point.yield_tons(), 3.4);
        assert_eq!(*point.rainfall(), 900.0);
        assert_eq!(*point.provider(), Provider::OpenAi);
        assert_eq!(*point.timestamp(), now);
        assert_eq!(point.comment().as_deref(), Some("Good season"));
    }

    #[test]
    fn test_historical_tagging() {
        let point = PredictionPoint::historical(HistoricalRow::new(800.0, 2.1), Utc::now());
        assert_eq!(*point.provider(), Provider::Historical);
        assert!(point.is_plottable());

        let broken = PredictionPoint::historical(HistoricalRow::new(800.0, f64::NAN), Utc::now());
        assert!(!broken.is_plottable());
    }
}
