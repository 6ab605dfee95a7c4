//! `POST /api/upload`.

use crate::{AppState, CsvPolicy};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use rainyield_core::{HistoricalRow, UploadResponse};
use rainyield_error::{RainyieldError, RainyieldResult, RequestError, RequestErrorKind};
use tracing::{debug, info, instrument, warn};

/// Multipart field carrying the CSV.
pub const FILE_FIELD: &str = "file";

const RAINFALL_COLUMN: &str = "rainfall";
const YIELD_COLUMN: &str = "yield";

/// Parse a CSV with a `rainfall,yield` header into rows, in file order.
///
/// Header names match case-insensitively after trimming; other columns are
/// ignored and short rows are tolerated. Fields that are not finite numbers
/// are handled according to `policy`.
///
/// # Examples
///
/// ```
/// use rainyield_server::{CsvPolicy, parse_csv};
///
/// let rows = parse_csv(b"Rainfall , Yield\n800,2.1\n1500,3.4\n", CsvPolicy::PassThrough).unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].yield_tons, 3.4);
/// ```
#[track_caller]
pub fn parse_csv(bytes: &[u8], policy: CsvPolicy) -> Result<Vec<HistoricalRow>, RequestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers().map_err(malformed)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };
    let (Some(rainfall_idx), Some(yield_idx)) = (column(RAINFALL_COLUMN), column(YIELD_COLUMN))
    else {
        return Err(RequestError::new(RequestErrorKind::MissingCsvHeader));
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let rainfall = parse_number(record.get(rainfall_idx));
        let yield_tons = parse_number(record.get(yield_idx));

        let bad = [(RAINFALL_COLUMN, &rainfall), (YIELD_COLUMN, &yield_tons)]
            .into_iter()
            .find_map(|(name, parsed)| parsed.as_ref().err().map(|raw| (name, raw.clone())));

        match (bad, policy) {
            (None, _) => {}
            (Some(_), CsvPolicy::PassThrough) => {}
            (Some((name, raw)), CsvPolicy::SkipRow) => {
                warn!(line, column = name, value = %raw, "Skipping row with malformed number");
                continue;
            }
            (Some((name, raw)), CsvPolicy::RejectFile) => {
                return Err(RequestError::new(RequestErrorKind::InvalidCsvNumber {
                    column: name.to_string(),
                    value: raw,
                    row: line,
                }));
            }
        }

        rows.push(HistoricalRow::new(
            rainfall.unwrap_or(f64::NAN),
            yield_tons.unwrap_or(f64::NAN),
        ));
    }

    Ok(rows)
}

/// A finite number, or the raw text that failed to parse.
fn parse_number(field: Option<&str>) -> Result<f64, String> {
    let raw = field.unwrap_or_default().trim();
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| raw.to_string())
}

#[track_caller]
fn malformed(err: csv::Error) -> RequestError {
    RequestError::new(RequestErrorKind::MalformedCsv(err.to_string()))
}

/// Handle a CSV upload.
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<UploadResponse>) {
    let result = read_upload(multipart, *state.csv_policy()).await;

    #[cfg(feature = "metrics")]
    state.metrics().record_upload(
        result.is_ok(),
        result.as_ref().map(Vec::len).unwrap_or_default(),
    );

    match result {
        Ok(rows) => {
            info!(rows = rows.len(), "CSV upload parsed");
            (StatusCode::OK, Json(UploadResponse::ok(rows)))
        }
        Err(err) => {
            let err = crate::ApiError::from(err);
            err.log();
            (err.status(), Json(UploadResponse::failed(err.message())))
        }
    }
}

async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    policy: CsvPolicy,
) -> RainyieldResult<Vec<HistoricalRow>> {
    let mut multipart = multipart.map_err(|rejection| {
        RequestError::new(RequestErrorKind::InvalidBody(rejection.body_text()))
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::new(RequestErrorKind::InvalidBody(e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        debug!(filename = ?field.file_name(), "Reading uploaded file");
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RequestError::new(RequestErrorKind::InvalidBody(e.body_text())))?;
        return parse_csv(&bytes, policy).map_err(RainyieldError::from);
    }

    Err(RequestError::new(RequestErrorKind::MissingFile).into())
}
