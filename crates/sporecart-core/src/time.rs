use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_utc_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

pub fn parse_rfc3339(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

pub fn is_rfc3339(value: &str) -> bool {
    parse_rfc3339(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_utc_rfc3339_formats_timestamp() {
        let value = now_utc_rfc3339().expect("timestamp");
        assert!(value.ends_with('Z'));
        assert!(value.contains('T'));
        assert!(is_rfc3339(&value));
    }

    #[test]
    fn parsed_timestamps_compare_across_offsets() {
        let utc = parse_rfc3339("2026-03-01T10:00:00Z").expect("utc");
        let eastern = parse_rfc3339("2026-03-01T09:00:00-05:00").expect("offset");
        assert!(eastern > utc);
    }

    #[test]
    fn rejects_non_timestamps() {
        assert!(!is_rfc3339("yesterday"));
    }
}
