use crate::infra::{apply_entries, AppState, CutoffEntries};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use gradebook::error::AppError;
use gradebook::roster::{
    export, import, process_roster, CohortSummary, CutoffEntryMode, CutoffTable, GradedRecord,
    ScorePolicy,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn with_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/cutoffs", get(get_cutoffs).put(update_cutoffs))
        .route("/api/v1/cutoffs/reset", post(reset_cutoffs))
        .route("/api/v1/roster/process", post(process_endpoint))
        .route("/api/v1/roster/export", post(export_endpoint))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CutoffUpdateRequest {
    #[serde(default = "default_entry_mode")]
    pub(crate) mode: CutoffEntryMode,
    pub(crate) entries: CutoffEntries,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterProcessRequest {
    pub(crate) roster_csv: String,
    #[serde(default)]
    pub(crate) include_summary: bool,
    /// Inline overrides apply to this run only; the session table is
    /// untouched.
    #[serde(default)]
    pub(crate) cutoffs: Option<CutoffEntries>,
    #[serde(default = "default_entry_mode")]
    pub(crate) entry_mode: CutoffEntryMode,
    #[serde(default)]
    pub(crate) policy: Option<ScorePolicy>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterProcessResponse {
    pub(crate) total: usize,
    pub(crate) cutoffs: CutoffTable,
    pub(crate) policy: ScorePolicy,
    pub(crate) records: Vec<GradedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<CohortSummary>,
}

fn default_entry_mode() -> CutoffEntryMode {
    CutoffEntryMode::StrictInteger
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn get_cutoffs(Extension(state): Extension<AppState>) -> Json<CutoffTable> {
    Json(state.cutoff_snapshot())
}

pub(crate) async fn update_cutoffs(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CutoffUpdateRequest>,
) -> Result<Json<CutoffTable>, AppError> {
    let table = apply_entries(&state.cutoff_snapshot(), &payload.entries, payload.mode)?;
    state.replace_cutoffs(table.clone());
    info!(?table, "cutoff table applied");
    Ok(Json(table))
}

pub(crate) async fn reset_cutoffs(Extension(state): Extension<AppState>) -> Json<CutoffTable> {
    let table = CutoffTable::default();
    state.replace_cutoffs(table.clone());
    info!("cutoff table reset to defaults");
    Json(table)
}

pub(crate) async fn process_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RosterProcessRequest>,
) -> Result<Json<RosterProcessResponse>, AppError> {
    let RosterProcessRequest {
        roster_csv,
        include_summary,
        cutoffs,
        entry_mode,
        policy,
    } = payload;

    let (cutoffs, policy) = resolve_run_options(&state, cutoffs, entry_mode, policy)?;
    let records = import::from_csv_reader(roster_csv.as_bytes())?;
    let graded = process_roster(records, &cutoffs, policy)?;

    let summary = include_summary.then(|| CohortSummary::from_records(&graded));
    Ok(Json(RosterProcessResponse {
        total: graded.len(),
        cutoffs,
        policy,
        records: graded,
        summary,
    }))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RosterProcessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let RosterProcessRequest {
        roster_csv,
        cutoffs,
        entry_mode,
        policy,
        ..
    } = payload;

    let (cutoffs, policy) = resolve_run_options(&state, cutoffs, entry_mode, policy)?;
    let source = roster_csv.into_bytes();
    let records = import::from_csv_reader(source.as_slice())?;
    let graded = process_roster(records, &cutoffs, policy)?;

    let workbook = export::write_workbook(&graded)?;
    let filename = export::export_filename(&source);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        workbook,
    ))
}

fn resolve_run_options(
    state: &AppState,
    cutoffs: Option<CutoffEntries>,
    entry_mode: CutoffEntryMode,
    policy: Option<ScorePolicy>,
) -> Result<(CutoffTable, ScorePolicy), AppError> {
    let snapshot = state.cutoff_snapshot();
    let cutoffs = match cutoffs {
        Some(entries) => apply_entries(&snapshot, &entries, entry_mode)?,
        None => snapshot,
    };
    Ok((cutoffs, policy.unwrap_or(state.score_policy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook::roster::GradeTier;
    use metrics_exporter_prometheus::PrometheusBuilder;

    const ROSTER_CSV: &str = "Name,Student ID,Class,Part A,Part B\n\
Chan Tai Man,20240001,Class 1,45,95\n\
Lee Ka Ho,20240002,Class 2,42,88\n";

    fn test_state() -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState::new(recorder.handle(), ScorePolicy::Strict);
        state.mark_ready();
        state
    }

    fn process_request(roster_csv: &str) -> RosterProcessRequest {
        RosterProcessRequest {
            roster_csv: roster_csv.to_string(),
            include_summary: true,
            cutoffs: None,
            entry_mode: default_entry_mode(),
            policy: None,
        }
    }

    #[tokio::test]
    async fn process_endpoint_returns_graded_rows_and_summary() {
        let state = test_state();
        let Json(body) = process_endpoint(Extension(state), Json(process_request(ROSTER_CSV)))
            .await
            .expect("roster processes");

        assert_eq!(body.total, 2);
        assert_eq!(body.records[0].composite, 92);
        assert_eq!(body.records[0].rank, 1);
        assert_eq!(body.records[0].grade, GradeTier::Level7);
        assert_eq!(body.records[1].rank, 2);

        let summary = body.summary.expect("summary requested");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.highest_composite, 92);
    }

    #[tokio::test]
    async fn process_endpoint_rejects_missing_columns() {
        let state = test_state();
        let request = process_request("Name,Part A\nChan Tai Man,45\n");

        let err = process_endpoint(Extension(state), Json(request))
            .await
            .expect_err("schema error surfaces");
        assert!(matches!(err, AppError::Import(_)));
    }

    #[tokio::test]
    async fn inline_cutoffs_do_not_touch_the_session_table() {
        let state = test_state();
        let mut request = process_request(ROSTER_CSV);
        request.cutoffs = Some(CutoffEntries {
            level7: Some("95".to_string()),
            ..CutoffEntries::default()
        });

        let Json(body) = process_endpoint(Extension(state.clone()), Json(request))
            .await
            .expect("roster processes with overrides");
        assert_eq!(body.cutoffs.level7, 95.0);
        assert_eq!(body.records[0].grade, GradeTier::Level6);

        assert_eq!(state.cutoff_snapshot(), CutoffTable::default());
    }

    #[tokio::test]
    async fn invalid_cutoff_update_retains_prior_table() {
        let state = test_state();
        let request = CutoffUpdateRequest {
            mode: CutoffEntryMode::StrictInteger,
            entries: CutoffEntries {
                level3: Some("53.5".to_string()),
                ..CutoffEntries::default()
            },
        };

        let err = update_cutoffs(Extension(state.clone()), Json(request))
            .await
            .expect_err("fractional entry rejected in strict mode");
        assert!(matches!(err, AppError::Cutoff(_)));
        assert_eq!(state.cutoff_snapshot(), CutoffTable::default());
    }

    #[tokio::test]
    async fn cutoff_apply_and_reset_round_trip() {
        let state = test_state();
        let request = CutoffUpdateRequest {
            mode: CutoffEntryMode::Decimal,
            entries: CutoffEntries {
                level2: Some("46.5".to_string()),
                ..CutoffEntries::default()
            },
        };

        let Json(applied) = update_cutoffs(Extension(state.clone()), Json(request))
            .await
            .expect("decimal entry applies");
        assert_eq!(applied.level2, 46.5);
        assert_eq!(state.cutoff_snapshot().level2, 46.5);

        let Json(reset) = reset_cutoffs(Extension(state.clone())).await;
        assert_eq!(reset, CutoffTable::default());
        assert_eq!(state.cutoff_snapshot(), CutoffTable::default());
    }
}
