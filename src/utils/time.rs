use chrono::{DateTime, Datelike, Timelike, Utc};
use futures_util::future::{select, Either};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::time::sleep;

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    use wasm_bindgen::JsValue;
    let millis = duration.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        let scheduled = web_sys::window()
            .map(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                    .is_ok()
            })
            .unwrap_or(false);
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Runs `fut` to completion, giving up after `limit`. `None` waits forever.
pub async fn with_timeout<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Duration> {
    let Some(limit) = limit else {
        return Ok(fut.await);
    };

    let fut = pin!(fut);
    let timer = pin!(sleep(limit));
    match select(fut, timer).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(limit),
    }
}

/// `YYYYMMDDHHMMSS` in UTC. Years outside 0..=9999 are clamped so the stamp
/// is always 14 digits.
pub fn compact_timestamp(now: DateTime<Utc>) -> String {
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year().clamp(0, 9999),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("storyboard_{}.docx", compact_timestamp(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn is_export_filename(name: &str) -> bool {
        let Some(stamp) = name
            .strip_prefix("storyboard_")
            .and_then(|rest| rest.strip_suffix(".docx"))
        else {
            return false;
        };
        stamp.len() == 14 && stamp.bytes().all(|b| b.is_ascii_digit())
    }

    #[test]
    fn test_compact_timestamp_truncates_to_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
            + chrono::Duration::milliseconds(987);
        assert_eq!(compact_timestamp(now), "20240309070501");
        assert_eq!(export_filename(now), "storyboard_20240309070501.docx");
    }

    #[test]
    fn test_export_filename_shape_for_any_clock() {
        let samples = [
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2038, 1, 19, 3, 14, 8).unwrap(),
            Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(12345, 6, 7, 8, 9, 10).unwrap(),
            Utc.with_ymd_and_hms(-44, 3, 15, 12, 0, 0).unwrap(),
            Utc::now(),
        ];
        for now in samples {
            let name = export_filename(now);
            assert!(is_export_filename(&name), "unexpected filename {}", name);
        }
    }

    #[test]
    fn test_out_of_range_years_are_clamped() {
        let far = Utc.with_ymd_and_hms(12345, 6, 7, 8, 9, 10).unwrap();
        assert_eq!(compact_timestamp(far), "99990607080910");

        let ancient = Utc.with_ymd_and_hms(-44, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(compact_timestamp(ancient), "00000315120000");
    }

    #[tokio::test]
    async fn test_with_timeout_gives_up() {
        let result = with_timeout(
            Some(Duration::from_millis(10)),
            futures_util::future::pending::<()>(),
        )
        .await;
        assert_eq!(result, Err(Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        assert_eq!(with_timeout(Some(Duration::from_secs(5)), async { 7 }).await, Ok(7));
        assert_eq!(with_timeout(None, async { 8 }).await, Ok(8));
    }
}
