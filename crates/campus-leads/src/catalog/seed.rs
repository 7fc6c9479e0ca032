use super::domain::{Course, FeeRange, Institution, PlacementStats};

/// States and union territories offered in the lead form.
pub const INDIAN_STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

fn course(name: &str, duration: &str, description: &str, min: u64, max: u64) -> Course {
    Course {
        name: name.to_string(),
        duration: duration.to_string(),
        description: description.to_string(),
        fee_range: FeeRange { min, max },
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(crate) fn standard_institutions() -> Vec<Institution> {
    vec![apex_university(), stellar_arts_university()]
}

fn apex_university() -> Institution {
    Institution {
        id: "apex".to_string(),
        slug: "apex-university".to_string(),
        name: "Apex University of Technology".to_string(),
        location: "Bangalore, Karnataka".to_string(),
        logo_url: "https://picsum.photos/seed/apexlogo/200/50".to_string(),
        hero_image_url: "https://picsum.photos/seed/apex-campus/1600/900".to_string(),
        overview: "Apex University of Technology is a premier institution dedicated to excellence in engineering, science, and management. With state-of-the-art infrastructure and a world-class faculty, we provide a dynamic learning environment that fosters innovation and critical thinking. Our graduates are industry-ready and poised to become leaders in their respective fields.".to_string(),
        courses: vec![
            course(
                "B.Tech in Computer Science",
                "4 Years",
                "A comprehensive program covering software development, AI, and data science.",
                800_000,
                1_200_000,
            ),
            course(
                "B.Tech in Electronics & Communication",
                "4 Years",
                "Focuses on circuit design, communication systems, and embedded systems.",
                750_000,
                1_100_000,
            ),
            course(
                "MBA in Digital Marketing",
                "2 Years",
                "Specialized MBA for the modern marketing landscape.",
                1_000_000,
                1_500_000,
            ),
            course(
                "B.Sc in Data Science",
                "3 Years",
                "Hands-on training in data analysis, machine learning, and big data technologies.",
                600_000,
                900_000,
            ),
        ],
        placements: PlacementStats {
            highest_package: "₹45 LPA".to_string(),
            average_package: "₹12 LPA".to_string(),
            top_recruiters: strings(&["Google", "Microsoft", "Amazon", "Intel", "Samsung"]),
        },
        facilities: strings(&[
            "Advanced Robotics Lab",
            "High-Performance Computing Center",
            "Digital Library",
            "On-campus Hostel",
            "Sports Complex",
            "24/7 Medical Services",
        ]),
    }
}

fn stellar_arts_university() -> Institution {
    Institution {
        id: "stellar".to_string(),
        slug: "stellar-arts-university".to_string(),
        name: "Stellar Arts University".to_string(),
        location: "Pune, Maharashtra".to_string(),
        logo_url: "https://picsum.photos/seed/stellarlogo/200/50".to_string(),
        hero_image_url: "https://picsum.photos/seed/stellar-campus/1600/900".to_string(),
        overview: "Stellar Arts University is a leading creative institution, nurturing the next generation of artists, designers, and storytellers. Our curriculum blends classical techniques with modern technology, taught by renowned artists and industry professionals. We encourage students to find their unique voice and push the boundaries of creative expression.".to_string(),
        courses: vec![
            course(
                "B.A. in Fine Arts",
                "3 Years",
                "Explore painting, sculpture, and printmaking.",
                500_000,
                800_000,
            ),
            course(
                "B.Des in Graphic Design",
                "4 Years",
                "Master visual communication, branding, and UI/UX design.",
                900_000,
                1_400_000,
            ),
            course(
                "B.A. in Film Making",
                "3 Years",
                "A hands-on program in direction, cinematography, and post-production.",
                1_200_000,
                1_800_000,
            ),
            course(
                "M.A. in Creative Writing",
                "2 Years",
                "Hone your skills in fiction, poetry, and screenwriting.",
                400_000,
                600_000,
            ),
        ],
        placements: PlacementStats {
            highest_package: "₹25 LPA".to_string(),
            average_package: "₹8 LPA".to_string(),
            top_recruiters: strings(&[
                "Disney",
                "Pixar",
                "Penguin Random House",
                "Ogilvy",
                "Ubisoft",
            ]),
        },
        facilities: strings(&[
            "Professional Film Studio",
            "Digital Design Labs",
            "Art Gallery & Exhibition Space",
            "Pottery & Sculpture Workshop",
            "Library of Arts",
            "Creative Coworking Spaces",
        ]),
    }
}
