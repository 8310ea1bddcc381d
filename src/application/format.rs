//! Display formatting for numbers the client receives from the backend.
//! Aggregation happens server-side; the client only renders.

use crate::domain::models::RepeatMode;

/// "M:SS" countdown display.
pub fn format_clock(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}

/// "X分" below one hour, "X時間Y分" above.
pub fn format_duration_ja(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{minutes}分");
    }
    let hours = minutes / 60;
    format!("{hours}時間{}分", minutes % 60)
}

/// Rounded percentage, or an em dash when there is no data to rate.
pub fn format_rate(value: f32, has_data: bool) -> String {
    if has_data {
        format!("{}%", (value * 100.0).round() as i64)
    } else {
        "—".to_string()
    }
}

pub fn skip_rate(done_count: u32, skip_count: u32) -> Option<f32> {
    let total = done_count + skip_count;
    if total == 0 {
        return None;
    }
    Some(skip_count as f32 / total as f32)
}

pub fn format_repeat_mode(repeat_mode: &RepeatMode) -> String {
    match repeat_mode {
        RepeatMode::Infinite => "無限".to_string(),
        RepeatMode::Count { value } => format!("{value}回"),
        RepeatMode::Duration { total_seconds } => {
            let minutes = (*total_seconds as f32 / 60.0).round() as u32;
            format!("{minutes}分")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(125), "2:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn duration_switches_to_hours() {
        assert_eq!(format_duration_ja(300), "5分");
        assert_eq!(format_duration_ja(3660), "1時間1分");
        assert_eq!(format_duration_ja(7200), "2時間0分");
    }

    #[test]
    fn rate_renders_percent_or_dash() {
        assert_eq!(format_rate(0.25, true), "25%");
        assert_eq!(format_rate(0.666, true), "67%");
        assert_eq!(format_rate(0.0, false), "—");
    }

    #[test]
    fn skip_rate_needs_data() {
        assert_eq!(skip_rate(0, 0), None);
        assert_eq!(skip_rate(3, 1), Some(0.25));
    }

    #[test]
    fn repeat_mode_labels() {
        assert_eq!(format_repeat_mode(&RepeatMode::Infinite), "無限");
        assert_eq!(format_repeat_mode(&RepeatMode::Count { value: 3 }), "3回");
        assert_eq!(
            format_repeat_mode(&RepeatMode::Duration {
                total_seconds: 1500
            }),
            "25分"
        );
    }
}
