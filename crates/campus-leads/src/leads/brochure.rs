use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::{FeeRange, Institution};

const RUPEE_PREFIX: &str = "₹ ";

/// Plain-text brochure ready to be handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brochure {
    pub filename: String,
    pub content: String,
}

impl Brochure {
    pub fn for_institution(institution: &Institution) -> Self {
        Self {
            filename: institution.brochure_filename(),
            content: render_brochure(institution),
        }
    }
}

/// Renders the institution's brochure. The output depends only on `institution`.
pub fn render_brochure(institution: &Institution) -> String {
    let mut text = String::new();

    writeln!(text, "# BROCHURE: {}", institution.name.to_uppercase()).expect("write title");
    text.push('\n');
    text.push_str("## About Us\n");
    writeln!(text, "Location: {}", institution.location).expect("write location");
    writeln!(text, "{}", institution.overview).expect("write overview");
    text.push_str("\n---\n\n## Courses Offered\n\n");

    let course_blocks: Vec<String> = institution
        .courses
        .iter()
        .map(|course| {
            format!(
                "### {}\n- **Duration:** {}\n- **Description:** {}\n- **Estimated Total Fee:** {}",
                course.name,
                course.duration,
                course.description,
                format_fee_range(&course.fee_range)
            )
        })
        .collect();
    text.push_str(&course_blocks.join("\n\n"));
    text.push_str("\n\n---\n\n");

    writeln!(text, "## Placements at {}", institution.name).expect("write placements heading");
    let placements = &institution.placements;
    writeln!(text, "- **Highest Package:** {}", placements.highest_package)
        .expect("write highest package");
    writeln!(text, "- **Average Package:** {}", placements.average_package)
        .expect("write average package");
    writeln!(
        text,
        "- **Our Top Recruiters:** {}",
        placements.top_recruiters.join(", ")
    )
    .expect("write recruiters");
    text.push_str("\n---\n\n## Our Facilities\n");

    for facility in &institution.facilities {
        writeln!(text, "- {facility}").expect("write facility");
    }

    text.push_str("\n---\n\n");
    writeln!(text, "Thank you for your interest in {}!", institution.name)
        .expect("write closing");
    text.push_str("Our admissions team will be in touch with you shortly.");

    text
}

pub fn format_fee_range(range: &FeeRange) -> String {
    format!("{} - {}", format_inr(range.min), format_inr(range.max))
}

/// Whole-rupee amount with en-IN grouping: `₹ 12,00,000`.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("{RUPEE_PREFIX}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{RUPEE_PREFIX}{},{tail}", groups.join(","))
}
