use crate::calendar::{summarize, YearShape};
use crate::errors::AppError;
use crate::intake::SubmittedEntry;
use crate::models::{CalendarRange, EntryStatus, ModQuery, StatusChangeForm};
use crate::state::AppState;
use crate::storage::{persist_data, ListOrder};
use crate::{export, ui};
use axum::{
    extract::{ConnectInfo, Multipart, Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, Redirect},
    Form, Json,
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};

pub async fn index() -> Redirect {
    Redirect::to("/submit")
}

pub async fn submit_page(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_submit(state.config.captcha_site_key.as_deref()))
}

pub async fn success_page() -> Html<String> {
    Html(ui::render_success())
}

/// Submission intake pipeline: multipart parsing, captcha verification,
/// per-IP rate limiting, field validation, persistence.
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::forbidden("malformed form data"))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            // Photo uploads are accepted but not stored.
            let _ = field.bytes().await;
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|_| AppError::forbidden("malformed form data"))?;
        fields.insert(name, value);
    }

    let token = fields
        .get("captcha")
        .or_else(|| fields.get("g-recaptcha-response"))
        .map(String::as_str)
        .unwrap_or("");
    state.captcha.verify(token).await.map_err(|err| {
        warn!("rejected submission: {err}");
        AppError::forbidden("captcha verification failed")
    })?;

    let ip = client_ip(&headers, addr);
    if !state.limiter.lock().await.check(ip) {
        warn!("rate limited submission from {ip}");
        return Err(AppError::too_many_requests("too many submissions, try again later"));
    }

    let submitted = SubmittedEntry::from_fields(&fields).map_err(|err| {
        info!("invalid submission: {err}");
        AppError::unprocessable(err.to_string())
    })?;

    let mut book = state.book.lock().await;
    let id = book.insert(submitted);
    persist_data(&state.config.data_path, &book).await?;
    info!("accepted submission {id} from {ip}");

    Ok(Redirect::to("/success"))
}

pub async fn calendar_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let book = state.book.lock().await;
    let ranges = summarize(&book.daily_aggregates(), YearShape::Common)?;
    Ok(Html(ui::render_calendar(&ranges)))
}

pub async fn api_calendar(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalendarRange>>, AppError> {
    let book = state.book.lock().await;
    let ranges = summarize(&book.daily_aggregates(), YearShape::Common)?;
    Ok(Json(ranges.into_iter().map(CalendarRange::from).collect()))
}

pub async fn mod_index(
    State(state): State<AppState>,
    Query(query): Query<ModQuery>,
) -> Result<Redirect, AppError> {
    authorize(&state, &query.token)?;
    Ok(Redirect::to(&format!(
        "/mod/show/pending/sortby/date?token={}",
        query.token
    )))
}

pub async fn mod_show(
    State(state): State<AppState>,
    Path((status, order)): Path<(String, String)>,
    Query(query): Query<ModQuery>,
) -> Result<Html<String>, AppError> {
    authorize(&state, &query.token)?;
    let filter = parse_status_filter(&status)?;
    let order = ListOrder::parse(&order)
        .ok_or_else(|| AppError::bad_request(format!("unknown sort order '{order}'")))?;

    let book = state.book.lock().await;
    let entries = book.list(filter, order);
    Ok(Html(ui::render_mod(&entries, &status, order, &query.token)))
}

pub async fn mod_edit_status(
    State(state): State<AppState>,
    Form(form): Form<StatusChangeForm>,
) -> Result<Redirect, AppError> {
    authorize(&state, &form.token)?;
    let status = EntryStatus::parse(&form.status)
        .ok_or_else(|| AppError::bad_request(format!("unknown status '{}'", form.status)))?;

    let mut book = state.book.lock().await;
    book.change_status(form.id, status)?;
    persist_data(&state.config.data_path, &book).await?;
    info!("entry {} set to {}", form.id, status.as_str());

    Ok(Redirect::to(&format!(
        "/mod/show/{}/sortby/{}?token={}",
        form.state, form.order, form.token
    )))
}

pub async fn mod_export(
    State(state): State<AppState>,
    Query(query): Query<ModQuery>,
) -> Result<([(header::HeaderName, String); 2], String), AppError> {
    authorize(&state, &query.token)?;
    let book = state.book.lock().await;
    let chosen = book.list(Some(EntryStatus::Chosen), ListOrder::Date);
    let csv = export::entries_csv(&chosen);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}

fn authorize(state: &AppState, token: &str) -> Result<(), AppError> {
    let expected = &state.config.mod_token;
    if expected.is_empty() {
        return Err(AppError::unauthorized("moderation is disabled"));
    }
    if token != expected {
        return Err(AppError::unauthorized("bad moderation token"));
    }
    Ok(())
}

fn parse_status_filter(status: &str) -> Result<Option<EntryStatus>, AppError> {
    if status == "all" {
        return Ok(None);
    }
    EntryStatus::parse(status)
        .map(Some)
        .ok_or_else(|| AppError::bad_request(format!("unknown status '{status}'")))
}

/// First X-Forwarded-For hop when present, else the socket address.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(|| addr.ip())
}
