use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rates::RateTable;
use crate::types::{AuthorPayout, ContentType};
use crate::{Error, Result};

pub const REPORT_TITLE: &str = "Author Payout Report";
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

const CSV_HEADER: [&str; 5] = ["Author", "News Articles", "Blog Articles", "Total Articles", "Total Payout"];

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Render payouts as CSV, one row per author, in the order given.
pub fn payouts_to_csv(payouts: &[AuthorPayout]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for payout in payouts {
        writer.write_record([
            payout.author.clone(),
            payout.breakdown.news.to_string(),
            payout.breakdown.blog.to_string(),
            payout.articles.to_string(),
            format_currency(payout.total_payout),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub author: String,
    pub news: usize,
    pub blogs: usize,
    pub total_articles: usize,
    pub total_payout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub number: usize,
    pub rows: Vec<ReportRow>,
    pub generated: String,
    pub page_label: String,
}

/// Paginated payout report, ready for an external document renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutReport {
    pub title: String,
    pub news_rate: String,
    pub blog_rate: String,
    pub pages: Vec<ReportPage>,
}

pub fn build_report(
    payouts: &[AuthorPayout],
    rates: &RateTable,
    generated_on: NaiveDate,
    rows_per_page: usize,
) -> PayoutReport {
    let rows: Vec<ReportRow> = payouts
        .iter()
        .map(|p| ReportRow {
            author: p.author.clone(),
            news: p.breakdown.news,
            blogs: p.breakdown.blog,
            total_articles: p.articles,
            total_payout: format_currency(p.total_payout),
        })
        .collect();

    let mut chunks: Vec<Vec<ReportRow>> = rows
        .chunks(rows_per_page.max(1))
        .map(|chunk| chunk.to_vec())
        .collect();
    if chunks.is_empty() {
        chunks.push(Vec::new());
    }

    let page_count = chunks.len();
    let generated = format!("Generated: {}", generated_on.format("%-m/%-d/%Y"));
    let pages = chunks
        .into_iter()
        .enumerate()
        .map(|(i, rows)| ReportPage {
            number: i + 1,
            rows,
            generated: generated.clone(),
            page_label: format!("Page {} of {}", i + 1, page_count),
        })
        .collect();

    PayoutReport {
        title: REPORT_TITLE.to_string(),
        news_rate: format!("News Rate: {}", format_rate(rates.rate(ContentType::News))),
        blog_rate: format!("Blog Rate: {}", format_rate(rates.rate(ContentType::Blog))),
        pages,
    }
}

fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("${}", rate as i64)
    } else {
        format!("${}", rate)
    }
}
