//! # Current Table Scraping
//!
//! Reads the published tidal-current table for the strait from tide736.net.
//!
//! ## Data Source
//! - **URL**: `https://tide736.net/current/?area=<area>&loc=<location>&date=<YYYYMMDD>`
//! - **Format**: HTML table, one row per event
//! - **Data**: time of each maximum flow and each reversal for the day
//!
//! ### Page Structure
//! ```html
//! <tr>
//!   <td>6:40</td>
//!   <td><span class="west">西流最強</span></td>
//!   <td>4.2kt</td>
//! </tr>
//! ```
//! A time cell followed by a cell holding a `<span>` label forms one event.
//! Labels mentioning west (西) or east (東) are maximum flows; everything else
//! is a reversal.
//!
//! ## Encoding
//! The page is not always UTF-8. The body is decoded with the charset named in
//! the `Content-Type` header, then the one in a `<meta>` tag, then UTF-8.
//!
//! ## Error Handling
//! A time cell that looks like a clock but names an impossible time rejects the
//! whole page. A page with no matching rows is not an error: it yields no
//! events and the resolver falls back to its model.

use crate::config::Config;
use crate::retry::{with_retry, RetryConfig, RetryError};
use crate::source::SourceError;
use crate::{InputError, TideEvent, TideEventKind};
use chrono::{NaiveDate, NaiveTime};
use encoding_rs::{Encoding, UTF_8};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

const CURRENT_URL: &str = "https://tide736.net/current/";

/// Fetch and parse the current table for `date`.
pub async fn fetch(
    client: &reqwest::Client,
    config: &Config,
    date: NaiveDate,
    retry: &RetryConfig,
) -> Result<Vec<TideEvent>, SourceError> {
    let params = [
        ("area", config.location.tide_area.to_string()),
        ("loc", config.location.tide_location.clone()),
        ("date", date.format("%Y%m%d").to_string()),
    ];
    let params = &params;
    let user_agent = config.network.user_agent.as_str();
    let timeout = Duration::from_secs(config.network.tide_timeout_secs);

    log::info!("Fetching current table for {}", date);
    let html = with_retry(
        move || async move {
            let response = client
                .get(CURRENT_URL)
                .query(params)
                .header(reqwest::header::USER_AGENT, user_agent)
                .timeout(timeout)
                .send()
                .await
                .map_err(RetryError::from_http)?;
            if !response.status().is_success() {
                return Err(RetryError::from_status(response.status()));
            }
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response.bytes().await.map_err(RetryError::from_http)?;
            Ok(decode_page(&body, content_type.as_deref()))
        },
        retry,
    )
    .await?;

    let events = parse_current_table(&html, date)?;
    log::info!("Current table for {} lists {} events", date, events.len());
    Ok(events)
}

/// How far into the body to look for a `<meta>` charset declaration.
const META_SNIFF_BYTES: usize = 1024;

/// Decode a page body using the header charset, the `<meta>` charset, or UTF-8.
pub fn decode_page(body: &[u8], content_type: Option<&str>) -> String {
    let label = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(body));
    let encoding = label
        .as_deref()
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        log::warn!("Current table had bytes invalid in {}", used.name());
    }
    text.into_owned()
}

/// `charset` parameter of a `Content-Type` value.
fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    })
}

/// Charset from `<meta charset=..>` or `<meta http-equiv .. content="..; charset=..">`.
fn meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let rest = head[start..].trim_start_matches(|c| c == '"' || c == '\'');
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| rest[..end].to_string())
}

/// Extract current events from a table page, stamped on `date` and sorted.
pub fn parse_current_table(html: &str, date: NaiveDate) -> Result<Vec<TideEvent>, SourceError> {
    let doc = Html::parse_document(html);
    let rows = Selector::parse("tr").map_err(|e| SourceError::Parse(e.to_string()))?;
    let cells = Selector::parse("td").map_err(|e| SourceError::Parse(e.to_string()))?;
    let spans = Selector::parse("span").map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut events = Vec::new();
    for row in doc.select(&rows) {
        let tds: Vec<ElementRef> = row.select(&cells).collect();
        for pair in tds.windows(2) {
            let text = cell_text(&pair[0]);
            let Some((hour, minute)) = clock_parts(&text) else {
                continue;
            };
            let Some(label) = pair[1].select(&spans).next().map(|s| cell_text(&s)) else {
                continue;
            };
            let time = NaiveTime::from_hms_opt(hour, minute, 0)
                .ok_or_else(|| InputError::Timestamp(text.clone()))?;
            let kind = kind_from_label(&label);
            log::debug!("Current event {} {:?} ({})", text, kind, label);
            events.push(TideEvent::new(date.and_time(time), kind));
        }
    }

    events.sort_by_key(|e| e.time);
    Ok(events)
}

/// Map a table label onto an event kind.
pub fn kind_from_label(label: &str) -> TideEventKind {
    if label.contains('西') {
        TideEventKind::WestFlow
    } else if label.contains('東') {
        TideEventKind::EastFlow
    } else {
        TideEventKind::Turning
    }
}

fn cell_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Split `H:MM` or `HH:MM` into hour and minute.
fn clock_parts(text: &str) -> Option<(u32, u32)> {
    let (hour, minute) = text.split_once(':')?;
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 || !digits(hour) || !digits(minute) {
        return None;
    }
    Some((hour.parse().ok()?, minute.parse().ok()?))
}
