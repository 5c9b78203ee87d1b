//! Enrichment-result → display-text formatting.
//!
//! Pure functions. Absent fields are skipped entirely — never rendered
//! as an empty or placeholder line.

use en_domain::record::{CompanyRecord, LookupResponse, PersonRecord, VerifyResponse};

/// Render a lookup response as agent-facing text.
///
/// An empty result is a successful no-match, not an error, and the
/// provider does not bill for it.
pub fn format_lookup(resp: &LookupResponse) -> String {
    let Some(person) = resp.data.first() else {
        return format!(
            "No match found for {}. No credit was consumed for this lookup.",
            resp.input()
        );
    };

    let mut out = String::new();
    push_person(&mut out, person);

    // A company block with no name would open with a bare "Company:"
    // placeholder; the raw JSON below still carries whatever fields the
    // provider sent.
    if let Some(company) = person.company.as_ref().filter(|c| c.name.is_some()) {
        out.push('\n');
        push_company(&mut out, company);
    }

    out.push_str("\nRaw data:\n");
    out.push_str(&raw_json(resp));
    out
}

/// Render an email-verification response as agent-facing text.
pub fn format_verification(resp: &VerifyResponse) -> String {
    let mut out = String::new();
    push_line(&mut out, "Email", resp.email.as_deref());
    push_line(&mut out, "Status", resp.status.as_deref());
    if let Some(score) = resp.score {
        out.push_str(&format!("Score: {score}/100\n"));
    }

    out.push_str("\nRaw data:\n");
    out.push_str(&raw_json(resp));
    out
}

fn push_person(out: &mut String, person: &PersonRecord) {
    if let Some(name) = &person.full_name {
        out.push_str(&format!("Found: {name}\n"));
    }
    if let Some(email) = &person.business_email {
        match &person.email_status {
            Some(status) => out.push_str(&format!("- Email: {email} ({status})\n")),
            None => out.push_str(&format!("- Email: {email}\n")),
        }
    }
    if let Some(title) = &person.job_title {
        match person.company.as_ref().and_then(|c| c.name.as_deref()) {
            Some(company) => out.push_str(&format!("- Title: {title} at {company}\n")),
            None => out.push_str(&format!("- Title: {title}\n")),
        }
    }
    push_field(out, "Seniority", person.seniority.as_deref());
    push_field(out, "Department", person.department.as_deref());
    push_field(out, "Location", person.location.as_deref());
    if !person.phone_numbers.is_empty() {
        out.push_str(&format!("- Phone: {}\n", person.phone_numbers.join(", ")));
    }
    push_field(out, "Profile", person.profile_url.as_deref());
}

fn push_company(out: &mut String, company: &CompanyRecord) {
    if let Some(name) = &company.name {
        out.push_str(&format!("Company: {name}\n"));
    }
    push_field(out, "Industry", company.industry.as_deref());
    push_field(out, "Size", company.size.as_deref());
    push_field(out, "Revenue", company.revenue.as_deref());
    push_field(out, "Website", company.website.as_deref());
    push_field(out, "Location", company.location.as_deref());
    push_field(out, "Phone", company.phone.as_deref());
    push_field(out, "Profile", company.profile_url.as_deref());
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value {
        out.push_str(&format!("- {label}: {v}\n"));
    }
}

fn push_line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value {
        out.push_str(&format!("{label}: {v}\n"));
    }
}

fn raw_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use en_domain::record::LookupMeta;

    fn no_match(input: &str) -> LookupResponse {
        LookupResponse {
            success: true,
            cached: false,
            data: vec![],
            meta: LookupMeta {
                input: Some(input.to_string()),
                result_count: 0,
            },
        }
    }

    #[test]
    fn empty_data_renders_no_match_message() {
        let text = format_lookup(&no_match("a@b.com"));
        assert_eq!(
            text,
            "No match found for a@b.com. No credit was consumed for this lookup."
        );
    }

    #[test]
    fn sparse_record_renders_only_present_fields() {
        let resp = LookupResponse {
            success: true,
            data: vec![PersonRecord {
                full_name: Some("Ada Lovelace".into()),
                business_email: Some("ada@acme.com".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = format_lookup(&resp);

        assert!(text.contains("Found: Ada Lovelace"));
        assert!(text.contains("- Email: ada@acme.com"));
        assert!(text.contains("Raw data:"));

        // No placeholder lines for absent fields.
        let field_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Found:") || l.starts_with("- "))
            .collect();
        assert_eq!(field_lines.len(), 2, "unexpected lines in:\n{text}");
        assert!(!text.contains("Title"));
        assert!(!text.contains("Company"));
    }

    #[test]
    fn full_record_renders_person_and_company_blocks() {
        let resp = LookupResponse {
            success: true,
            data: vec![PersonRecord {
                full_name: Some("Grace Hopper".into()),
                business_email: Some("grace@fleet.mil".into()),
                email_status: Some("valid".into()),
                job_title: Some("Rear Admiral".into()),
                seniority: Some("executive".into()),
                department: Some("engineering".into()),
                location: Some("Arlington, VA".into()),
                phone_numbers: vec!["+1 555 0100".into()],
                profile_url: Some("site.com/in/ghopper".into()),
                company: Some(CompanyRecord {
                    name: Some("US Navy".into()),
                    industry: Some("defense".into()),
                    size: Some("10001+".into()),
                    ..Default::default()
                }),
            }],
            ..Default::default()
        };
        let text = format_lookup(&resp);

        assert!(text.contains("- Email: grace@fleet.mil (valid)"));
        assert!(text.contains("- Title: Rear Admiral at US Navy"));
        assert!(text.contains("- Phone: +1 555 0100"));
        assert!(text.contains("Company: US Navy"));
        assert!(text.contains("- Industry: defense"));
        assert!(text.contains("- Size: 10001+"));
        // Absent company fields are skipped.
        assert!(!text.contains("Revenue"));
    }

    #[test]
    fn unnamed_company_block_is_skipped() {
        let resp = LookupResponse {
            success: true,
            data: vec![PersonRecord {
                full_name: Some("Ada Lovelace".into()),
                company: Some(CompanyRecord {
                    name: None,
                    industry: Some("computing".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = format_lookup(&resp);

        // No placeholder header, no orphaned company fields; the raw
        // JSON still carries the industry.
        assert!(!text.contains("Company:"));
        assert!(!text.contains("- Industry"));
        assert!(text.contains("\"industry\": \"computing\""));
    }

    #[test]
    fn first_record_wins_when_provider_returns_a_list() {
        let resp = LookupResponse {
            success: true,
            data: vec![
                PersonRecord {
                    full_name: Some("First".into()),
                    ..Default::default()
                },
                PersonRecord {
                    full_name: Some("Second".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let text = format_lookup(&resp);
        assert!(text.contains("Found: First"));
        assert!(!text.contains("Found: Second"));
    }

    #[test]
    fn verification_renders_status_and_score() {
        let resp = VerifyResponse {
            success: true,
            email: Some("a@b.com".into()),
            status: Some("valid".into()),
            score: Some(97),
            ..Default::default()
        };
        let text = format_verification(&resp);
        assert!(text.contains("Email: a@b.com"));
        assert!(text.contains("Status: valid"));
        assert!(text.contains("Score: 97/100"));
    }
}
