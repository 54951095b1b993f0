// src/linkedin/list_parser.rs
//! Job cards from one page of guest search results

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{ApplyType, JobRecord};
use crate::utils::{element_text, selector};

/// Label used when a card carries no applicant count
const DEFAULT_APPLICATIONS_LABEL: &str = "0 applicants";

static JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)\?").expect("valid job id pattern"));
static COMPANY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/company/(\d+)").expect("valid company id pattern"));

struct CardSelectors {
    card: Selector,
    base_card: Selector,
    link: Selector,
    title: Selector,
    company: Selector,
    anchor: Selector,
    location: Selector,
    list_date: Selector,
    applicant_count: Selector,
    new_label: Selector,
    easy_apply: Selector,
}

static SELECTORS: LazyLock<CardSelectors> = LazyLock::new(|| CardSelectors {
    card: selector("li"),
    base_card: selector("div.base-card"),
    link: selector("a.base-card__full-link"),
    title: selector("h3.base-search-card__title"),
    company: selector("h4.base-search-card__subtitle"),
    anchor: selector("a"),
    location: selector("span.job-search-card__location"),
    list_date: selector("time.job-search-card__listdate, time.job-search-card__listdate--new"),
    applicant_count: selector("span.job-search-card__applicant-count"),
    new_label: selector("span.job-search-card__listdate--new"),
    easy_apply: selector("span.job-card-list__easy-apply-label"),
});

/// Numeric posting id embedded in a job URL (`...-3812345678?...`)
pub fn extract_job_id(job_url: &str) -> Option<&str> {
    JOB_ID
        .captures(job_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn parse_card(card: ElementRef<'_>) -> Option<JobRecord> {
    let s = &*SELECTORS;

    let base_card = card.select(&s.base_card).next()?;
    let job_url = base_card
        .select(&s.link)
        .next()?
        .value()
        .attr("href")
        .unwrap_or_default()
        .to_string();
    extract_job_id(&job_url)?;

    let company = base_card.select(&s.company).next();
    let company_url = company
        .and_then(|c| c.select(&s.anchor).next())
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();
    let company_id = COMPANY_ID
        .captures(&company_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let time = base_card.select(&s.list_date).next();

    let applications_count = card
        .select(&s.applicant_count)
        .next()
        .or_else(|| card.select(&s.new_label).next())
        .map(element_text)
        .unwrap_or_else(|| DEFAULT_APPLICATIONS_LABEL.to_string());

    // Unreliable on guest pages; the detail page has the final say.
    let apply_type = if card.select(&s.easy_apply).next().is_some() {
        ApplyType::EasyApply
    } else {
        ApplyType::Unknown
    };

    Some(JobRecord {
        title: first_text(base_card, &s.title),
        location: first_text(base_card, &s.location),
        posted_time: time.map(element_text).unwrap_or_default(),
        published_at: time
            .and_then(|t| t.value().attr("datetime"))
            .unwrap_or_default()
            .to_string(),
        apply_url: job_url.clone(),
        job_url,
        company_name: company.map(element_text).unwrap_or_default(),
        company_url,
        company_id,
        applications_count,
        apply_type,
        ..Default::default()
    })
}

/// Parse one search-result page. Cards without a base container, a link or
/// a numeric job id are skipped.
pub fn parse_job_list(html: &str) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let cards: Vec<ElementRef<'_>> = document.select(&SELECTORS.card).collect();

    let jobs: Vec<JobRecord> = cards.iter().filter_map(|card| parse_card(*card)).collect();
    debug!("Parsed {} job cards out of {} list items", jobs.len(), cards.len());
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = include_str!("../../tests/fixtures/search_page.html");

    #[test]
    fn test_parses_valid_cards_and_skips_malformed() {
        let jobs = parse_job_list(PAGE);
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_first_card_fields() {
        let jobs = parse_job_list(PAGE);
        let job = &jobs[0];

        assert_eq!(job.title, "Financial Analyst");
        assert_eq!(job.company_name, "Acme Corp");
        assert_eq!(job.company_id, "1234567");
        assert!(job.company_url.starts_with("https://in.linkedin.com/company/1234567"));
        assert_eq!(job.location, "Pune, Maharashtra, India");
        assert_eq!(job.posted_time, "2 days ago");
        assert_eq!(job.published_at, "2026-10-12");
        assert_eq!(job.applications_count, "Be among the first 25 applicants");
        assert_eq!(job.apply_url, job.job_url);
        assert_eq!(job.apply_type, ApplyType::Unknown);
        assert_eq!(extract_job_id(&job.job_url), Some("3812345678"));
        assert!(job.description.is_empty());
    }

    #[test]
    fn test_new_listing_card() {
        let jobs = parse_job_list(PAGE);
        let job = &jobs[1];

        assert_eq!(job.title, "FP&A Manager");
        assert_eq!(job.company_id, "");
        assert_eq!(job.posted_time, "3 hours ago");
        assert_eq!(job.applications_count, "New");
        assert_eq!(job.apply_type, ApplyType::EasyApply);
    }

    #[test]
    fn test_page_without_cards_is_empty() {
        assert!(parse_job_list("<html><body><p>No results</p></body></html>").is_empty());
        assert!(parse_job_list("").is_empty());
    }

    #[test]
    fn test_missing_applicant_label_defaults() {
        let html = r#"<li><div class="base-card">
            <a class="base-card__full-link" href="https://x.test/jobs/view/a-42?p=1"></a>
        </div></li>"#;
        let jobs = parse_job_list(html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].applications_count, "0 applicants");
        assert_eq!(jobs[0].title, "");
    }

    #[test]
    fn test_extract_job_id_requires_query() {
        assert_eq!(extract_job_id("https://x.test/jobs/view/a-42?p=1"), Some("42"));
        assert_eq!(extract_job_id("https://x.test/jobs/view/a-42"), None);
    }
}
