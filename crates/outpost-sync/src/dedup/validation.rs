use outpost_core::models::{parse_date, EntityRecord};

/// Record construction rules applied before a record is created remotely.
pub fn validate_record(record: &EntityRecord) -> Result<(), String> {
    match record {
        EntityRecord::Notice(n) => {
            required("title", n.title.as_deref())?;
            required("organizationName", n.organization_name.as_deref())?;
            let start = required_date("eventStartDate", n.event_start_date.as_deref())?;
            let end = required_date("eventEndDate", n.event_end_date.as_deref())?;
            if end < start {
                return Err("eventEndDate is before eventStartDate".into());
            }
            Ok(())
        }
        EntityRecord::Report(r) => {
            required("title", r.title.as_deref())?;
            optional_date("createdAt", r.created_at.as_deref())
        }
        EntityRecord::Media(m) => {
            required("fileName", m.file_name.as_deref())?;
            required("mediaType", m.media_type.as_deref())?;
            optional_date("uploadedAt", m.uploaded_at.as_deref())
        }
        EntityRecord::Unchecked(u) => Err(format!("record does not match the {} schema", u.kind)),
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{field} is required")),
    }
}

fn required_date(
    field: &str,
    value: Option<&str>,
) -> Result<chrono::DateTime<chrono::Utc>, String> {
    let raw = required(field, value)?;
    parse_date(raw).ok_or_else(|| format!("{field} is not a valid date"))
}

fn optional_date(field: &str, value: Option<&str>) -> Result<(), String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) if parse_date(raw).is_none() => Err(format!("{field} is not a valid date")),
        _ => Ok(()),
    }
}
