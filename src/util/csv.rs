use crate::model::quote::Quote;

pub const QUOTE_CSV_HEADER: [&str; 8] =
    ["Name", "Email", "Service", "Subject", "Message", "Status", "Priority", "Date"];

/// Encode one field as quoted CSV when it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
}

/// Render quotes as CSV, header first, rows separated by `\n`.
pub fn quotes_to_csv(quotes: &[Quote]) -> String {
    let mut out = String::new();
    write_row(&mut out, &QUOTE_CSV_HEADER);
    for quote in quotes {
        out.push('\n');
        let date = quote.date.format("%Y-%m-%d").to_string();
        write_row(
            &mut out,
            &[
                quote.name.as_str(),
                quote.email.as_str(),
                quote.service.as_str(),
                quote.subject.as_str(),
                quote.message.as_str(),
                quote.status.as_str(),
                quote.priority.as_str(),
                date.as_str(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::{QuotePriority, QuoteStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_plain_field_untouched() {
        assert_eq!(escape_field("Website Development"), "Website Development");
    }

    #[test]
    fn test_comma_and_quote_are_quoted() {
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_quotes_to_csv() {
        let quote = Quote {
            id: "quote_1".to_string(),
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            subject: "Website".to_string(),
            message: "Need a site, fast".to_string(),
            service: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            status: QuoteStatus::New,
            priority: QuotePriority::Medium,
            created_at: 0,
        };
        let csv = quotes_to_csv(&[quote]);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], "Name,Email,Service,Subject,Message,Status,Priority,Date");
        assert_eq!(lines[1], "Asha,a@x.com,,Website,\"Need a site, fast\",new,medium,2025-03-09");
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(quotes_to_csv(&[]), "Name,Email,Service,Subject,Message,Status,Priority,Date");
    }
}
