use serde::{Deserialize, Serialize};

/// Total programme fee band in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRange {
    pub min: u64,
    pub max: u64,
}

/// One programme offered by an institution. Names are unique per institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub duration: String,
    pub description: String,
    pub fee_range: FeeRange,
}

/// Placement figures are display strings as published by the institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStats {
    pub highest_package: String,
    pub average_package: String,
    pub top_recruiters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub location: String,
    pub logo_url: String,
    pub hero_image_url: String,
    pub overview: String,
    pub courses: Vec<Course>,
    pub placements: PlacementStats,
    pub facilities: Vec<String>,
}

impl Institution {
    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name == name)
    }

    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|course| course.name.as_str())
    }

    pub fn default_course(&self) -> Option<&str> {
        self.courses.first().map(|course| course.name.as_str())
    }

    pub fn brochure_filename(&self) -> String {
        format!("{}-brochure.txt", self.slug)
    }

    pub fn summary(&self) -> InstitutionSummary {
        InstitutionSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            logo_url: self.logo_url.clone(),
            course_count: self.courses.len(),
        }
    }
}

/// Navigation entry for listing institutions without their full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub location: String,
    pub logo_url: String,
    pub course_count: usize,
}
