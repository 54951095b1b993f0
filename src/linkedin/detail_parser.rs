// src/linkedin/detail_parser.rs
//! Extended fields from a single job's detail page

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::types::{ApplyType, JobDetails};
use crate::utils::{element_text, element_text_joined, selector};

const EASY_APPLY_CLASS: &str = "jobs-apply-button--easy-apply";
const EXTERNAL_APPLY_TRACKING: &str = "public_jobs_apply_external";

struct DetailSelectors {
    description: Selector,
    criteria_list: Selector,
    list_item: Selector,
    criteria_header: Selector,
    criteria_value: Selector,
    apply_button: Selector,
    top_card: Selector,
    link: Selector,
    salary: Selector,
}

static SELECTORS: LazyLock<DetailSelectors> = LazyLock::new(|| DetailSelectors {
    description: selector("div.show-more-less-html__markup"),
    criteria_list: selector("ul.description__job-criteria-list"),
    list_item: selector("li"),
    criteria_header: selector("h3.description__job-criteria-subheader"),
    criteria_value: selector("span.description__job-criteria-text"),
    apply_button: selector("button.jobs-apply-button"),
    top_card: selector("div.top-card-layout__entity-info"),
    link: selector("a[href]"),
    salary: selector("div.salary-main-rail-card__salary-info-container"),
});

fn is_external_apply_link(link: ElementRef<'_>) -> bool {
    let element = link.value();
    if element.attr("data-tracking-control-name") == Some(EXTERNAL_APPLY_TRACKING) {
        return true;
    }
    element
        .attr("href")
        .map(|href| href.starts_with("http") && !href.contains("linkedin.com"))
        .unwrap_or(false)
}

/// Easy-apply button, then an external apply link in the top card, then unknown.
fn detect_apply_type(document: &Html) -> ApplyType {
    let s = &*SELECTORS;

    if let Some(button) = document.select(&s.apply_button).next() {
        return if button.value().classes().any(|c| c == EASY_APPLY_CLASS) {
            ApplyType::EasyApply
        } else {
            ApplyType::External
        };
    }

    let has_external_link = document
        .select(&s.top_card)
        .next()
        .map(|card| card.select(&s.link).any(is_external_apply_link))
        .unwrap_or(false);

    if has_external_link {
        ApplyType::External
    } else {
        ApplyType::Unknown
    }
}

pub fn parse_job_detail(html: &str) -> JobDetails {
    let s = &*SELECTORS;
    let document = Html::parse_document(html);

    let mut details = JobDetails {
        description: document
            .select(&s.description)
            .next()
            .map(|div| element_text_joined(div, "\n"))
            .unwrap_or_default(),
        apply_type: detect_apply_type(&document),
        salary: document
            .select(&s.salary)
            .next()
            .map(|div| element_text_joined(div, ""))
            .unwrap_or_default(),
        ..Default::default()
    };

    // Only the first criteria list belongs to the posting
    let items = document
        .select(&s.criteria_list)
        .next()
        .into_iter()
        .flat_map(|list| list.select(&s.list_item));

    for item in items {
        let (Some(header), Some(value)) = (
            item.select(&s.criteria_header).next(),
            item.select(&s.criteria_value).next(),
        ) else {
            continue;
        };

        let header = element_text(header).to_lowercase();
        let value = element_text(value);

        if header.contains("seniority level") {
            details.experience_level = value;
        } else if header.contains("employment type") {
            details.contract_type = value;
        } else if header.contains("job function") {
            details.work_type = value;
        } else if header.contains("industries") {
            details.sector = value;
        }
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = include_str!("../../tests/fixtures/job_detail.html");

    #[test]
    fn test_parses_criteria() {
        let details = parse_job_detail(PAGE);
        assert_eq!(details.experience_level, "Mid-Senior level");
        assert_eq!(details.contract_type, "Full-time");
        assert_eq!(details.work_type, "Finance and Sales");
        assert_eq!(details.sector, "Financial Services");
    }

    #[test]
    fn test_description_is_newline_joined() {
        let details = parse_job_detail(PAGE);
        assert_eq!(
            details.description,
            "About the role\nOwn the monthly\nvariance analysis\nfor the APAC region.\nBuild the annual operating plan\nPartner with business unit leads"
        );
    }

    #[test]
    fn test_salary_and_easy_apply() {
        let details = parse_job_detail(PAGE);
        assert_eq!(details.salary, "₹12,00,000/yr -₹18,00,000/yr");
        assert_eq!(details.apply_type, ApplyType::EasyApply);
    }

    #[test]
    fn test_plain_apply_button_is_external() {
        let html = r#"<button class="jobs-apply-button">Apply</button>"#;
        assert_eq!(parse_job_detail(html).apply_type, ApplyType::External);
    }

    #[test]
    fn test_external_link_fallbacks() {
        let tracked = r#"<div class="top-card-layout__entity-info">
            <a href="https://www.linkedin.com/jobs/apply?x" data-tracking-control-name="public_jobs_apply_external">Apply</a>
        </div>"#;
        let offsite = r#"<div class="top-card-layout__entity-info">
            <a href="https://in.linkedin.com/company/acme">Acme</a>
            <a href="https://careers.acme.example/jobs/77">Apply on company site</a>
        </div>"#;
        assert_eq!(parse_job_detail(tracked).apply_type, ApplyType::External);
        assert_eq!(parse_job_detail(offsite).apply_type, ApplyType::External);
    }

    #[test]
    fn test_only_first_criteria_list_is_read() {
        let html = r#"
            <ul class="description__job-criteria-list">
                <li>
                    <h3 class="description__job-criteria-subheader">Seniority level</h3>
                    <span class="description__job-criteria-text">Associate</span>
                </li>
            </ul>
            <ul class="description__job-criteria-list">
                <li>
                    <h3 class="description__job-criteria-subheader">Seniority level</h3>
                    <span class="description__job-criteria-text">Director</span>
                </li>
                <li>
                    <h3 class="description__job-criteria-subheader">Industries</h3>
                    <span class="description__job-criteria-text">Banking</span>
                </li>
            </ul>"#;
        let details = parse_job_detail(html);
        assert_eq!(details.experience_level, "Associate");
        assert_eq!(details.sector, "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let html = r#"<div class="top-card-layout__entity-info">
            <a href="https://in.linkedin.com/company/acme">Acme</a>
        </div>"#;
        let details = parse_job_detail(html);
        assert_eq!(details, JobDetails::default());
        assert_eq!(details.apply_type, ApplyType::Unknown);
    }
}
