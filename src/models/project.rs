/// An approved project citizens can follow and comment on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovedProject {
    pub id: u32,
    pub title: &'static str,
    pub summary: &'static str,
    pub status: &'static str,
    pub location: &'static str,
    pub budget: &'static str,
    pub completion: u8,
    pub start_date: &'static str,
    pub end_date: &'static str,
}

pub static APPROVED_PROJECTS: [ApprovedProject; 4] = [
    ApprovedProject {
        id: 1,
        title: "Rural Road Development",
        summary: "Construction of 5km rural road connecting village to main highway with proper drainage system.",
        status: "In Progress",
        location: "Village Rampur, District East",
        budget: "₹25 Lakhs",
        completion: 65,
        start_date: "2025-01-15",
        end_date: "2025-12-30",
    },
    ApprovedProject {
        id: 2,
        title: "Primary School Building",
        summary: "New 3-story building with 12 classrooms, library, and computer lab for government primary school.",
        status: "In Progress",
        location: "Sector 15, District North",
        budget: "₹45 Lakhs",
        completion: 40,
        start_date: "2025-02-01",
        end_date: "2026-01-31",
    },
    ApprovedProject {
        id: 3,
        title: "Water Supply System",
        summary: "Installation of overhead water tank and pipeline network covering 500 households.",
        status: "Completed",
        location: "Ward 7, Municipal Area",
        budget: "₹18 Lakhs",
        completion: 100,
        start_date: "2024-08-01",
        end_date: "2025-03-31",
    },
    ApprovedProject {
        id: 4,
        title: "Community Health Center",
        summary: "Renovation and expansion of existing health center with new equipment and ambulance facility.",
        status: "In Progress",
        location: "Block Hospital Road",
        budget: "₹32 Lakhs",
        completion: 75,
        start_date: "2024-11-01",
        end_date: "2025-06-30",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Completed,
    InProgress,
    Pending,
}

impl PhaseStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            PhaseStatus::Completed => "phase-completed",
            PhaseStatus::InProgress => "phase-in-progress",
            PhaseStatus::Pending => "phase-pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub name: &'static str,
    pub status: PhaseStatus,
    pub date: &'static str,
}

pub static PROGRESS_TIMELINE: [Phase; 6] = [
    Phase { name: "Planning & Approval", status: PhaseStatus::Completed, date: "2025-01-15" },
    Phase { name: "Site Preparation", status: PhaseStatus::Completed, date: "2025-02-01" },
    Phase { name: "Foundation Work", status: PhaseStatus::Completed, date: "2025-03-15" },
    Phase { name: "Main Construction", status: PhaseStatus::InProgress, date: "2025-05-01" },
    Phase { name: "Finishing Work", status: PhaseStatus::Pending, date: "2025-08-15" },
    Phase { name: "Final Inspection", status: PhaseStatus::Pending, date: "2025-10-01" },
];

pub fn find_project(title: &str) -> Option<&'static ApprovedProject> {
    APPROVED_PROJECTS.iter().find(|p| p.title == title)
}
