//! Career timeline shown on the home page.
//!
//! The data is compiled in. `fetch_timeline` mimics a backend round-trip so the
//! front end can exercise its loading state; the site serves the same data
//! without delay at `/data/timeline.json`.

use std::time::Duration;

use crate::models::timeline::TimelineEntry;

pub const DEFAULT_TIMELINE_DELAY: Duration = Duration::from_millis(300);

struct Stop {
    id: u32,
    company: &'static str,
    logo: &'static str,
    role: &'static str,
    dates: &'static str,
    stack: &'static [&'static str],
    summary: &'static str,
    details: &'static [&'static str],
}

const BNSF_LOGO: &str = "/images/bnsf.png";
const BLOCK_M_LOGO: &str = "/images/block-m.png";
const EY_LOGO: &str = "/images/ey.jpg";
const GM_LOGO: &str = "/images/gm.png";

const TIMELINE: &[Stop] = &[
    Stop {
        id: 1,
        company: "BNSF Railway",
        logo: BNSF_LOGO,
        role: "Train Conductor",
        dates: "2014 – 2019",
        stack: &["Safety", "Operations", "Logistics", "Crew Leadership"],
        summary: "Operated freight trains safely and efficiently on a Tier 1 railroad network, \
                  ensuring compliance with federal regulations and company policies. Coordinated \
                  with engineers, dispatchers, and yard crews to manage train movements, perform \
                  inspections, and oversee switching operations. Maintained accurate documentation \
                  and upheld strict safety standards while working in fast-paced, \
                  high-responsibility environments.",
        details: &["Williston, ND", "Topeka, KS", "Vancouver, WA", "Seattle, WA"],
    },
    Stop {
        id: 2,
        company: "University of Michigan",
        logo: BLOCK_M_LOGO,
        role: "Student : Bachelor of Science in Computer Science",
        dates: "2020 – 2022",
        stack: &[
            "C++",
            "SQL",
            "Python",
            "Computer Science",
            "Data Structures",
            "Algorithms",
        ],
        summary: "Studied core areas of computer science including software development, \
                  algorithms, databases, and systems design. Gained hands-on experience through \
                  coursework and projects using languages such as Java, C#, and Python, as well as \
                  web technologies. Built a strong foundation in problem-solving, programming, and \
                  applied computing that prepared me for professional software engineering roles.",
        details: &[
            "Graduated with a Bachelor of Science in Computer Science",
            "Dean's List all semesters",
            "Completed Magna Cume Laude",
        ],
    },
    Stop {
        id: 3,
        company: "University of Michigan",
        logo: BLOCK_M_LOGO,
        role: "Research Assistant",
        dates: "2021 – 2022",
        stack: &["SQL", "Python"],
        summary: "Collected, cleaned, and analyzed large datasets from Reddit to study echo \
                  chamber effects, primarily using Python. Developed scripts to efficiently scrape \
                  and process data, performed data analysis to identify trends and insights, and \
                  presented findings to the research team to inform ongoing studies.",
        details: &[],
    },
    Stop {
        id: 4,
        company: "EY",
        logo: EY_LOGO,
        role: "Technology Consulting Intern",
        dates: "Summer 2022",
        stack: &["SQL", "Python"],
        summary: "",
        details: &[],
    },
    Stop {
        id: 5,
        company: "General Motors",
        logo: GM_LOGO,
        role: "Software Engineer",
        dates: "2023 – 2025",
        stack: &["SQL", "Python"],
        summary: "",
        details: &[],
    },
    Stop {
        id: 6,
        company: "University of Michigan",
        logo: BLOCK_M_LOGO,
        role: "Grad Student: Master of Science in Artificial Intelligence",
        dates: "Current",
        stack: &[],
        summary: "",
        details: &[],
    },
];

impl Stop {
    fn to_entry(&self) -> TimelineEntry {
        TimelineEntry {
            id: self.id,
            company: self.company.to_string(),
            logo: self.logo.to_string(),
            role: self.role.to_string(),
            dates: self.dates.to_string(),
            stack: self.stack.iter().map(|s| s.to_string()).collect(),
            summary: self.summary.to_string(),
            details: self.details.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An owned copy of the timeline, oldest first.
pub fn timeline_entries() -> Vec<TimelineEntry> {
    TIMELINE.iter().map(Stop::to_entry).collect()
}

/// Resolves to an owned copy of the timeline after `delay`.
pub async fn fetch_timeline(delay: Duration) -> Vec<TimelineEntry> {
    tokio::time::sleep(delay).await;
    timeline_entries()
}
