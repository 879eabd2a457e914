//! Formatting helper for presenting latencies.

pub fn format_seconds(value: f64) -> String {
    format!("{value:.1} s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_display_precision() {
        assert_eq!(format_seconds(1.34), "1.3 s");
        assert_eq!(format_seconds(0.0), "0.0 s");
    }
}
